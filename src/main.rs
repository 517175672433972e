#![cfg_attr(all(windows, not(debug_assertions)), windows_subsystem = "windows")]

mod app;
mod build_id;
mod game;
mod paths;
mod util;

use crate::app::*;
use crate::game::GogGame;
use crate::util::*;

fn main() -> eframe::Result {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if std::env::args().any(|arg| arg == "--help") {
        println!("{}", USAGE_TEXT);
        std::process::exit(0);
    }

    let options = load_cfg();

    if std::env::args().any(|arg| arg == "--report") {
        let offline = std::env::args().any(|arg| arg == "--no-check");
        std::process::exit(print_report(&options, offline));
    }

    let native_options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_title("GOG Build Checker")
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([960.0, 600.0]),
        ..Default::default()
    };

    log::info!("GOG Build Checker v{} starting", env!("CARGO_PKG_VERSION"));

    eframe::run_native(
        "GOG Build Checker",
        native_options,
        Box::new(move |_cc| Ok(Box::new(CheckerApp::new(options)))),
    )
}

/// Scans and checks without opening a window. Returns the process exit code:
/// 0 when everything is current, 2 when at least one update is available.
fn print_report(options: &CheckerConfig, skip_check: bool) -> i32 {
    let mut games = scan_games(&scan_roots(&options.extra_scan_dirs));
    if games.is_empty() {
        println!("No GOG games found.");
        return 0;
    }

    let client = GogDbClient::new(CurlFetch, options.request_timeout());
    for (i, game) in games.iter_mut().enumerate() {
        if !skip_check {
            if i > 0 {
                std::thread::sleep(options.request_delay());
            }
            game.check = Some(check_game(game, &client));
        }

        println!("{}", report_line(game));
    }

    let (footer, code) = report_summary(&games);
    println!("\n{footer}");
    code
}

fn report_line(game: &GogGame) -> String {
    let latest = game
        .check
        .as_ref()
        .map(|c| c.latest.display().to_string())
        .unwrap_or_else(|| "-".to_string());
    format!(
        "{:<40} {:<20} {:<20} {}",
        game.name,
        game.installed.display(),
        latest,
        game.status().label()
    )
}

/// Statistics line plus the exit code: 2 when an update is available.
fn report_summary(games: &[GogGame]) -> (String, i32) {
    let stats = CheckStats::from_games(games);
    let footer = format!(
        "Total: {} | Up to Date: {} | Updates Available: {}",
        stats.total, stats.up_to_date, stats.updates
    );
    (footer, if stats.updates > 0 { 2 } else { 0 })
}

static USAGE_TEXT: &str = r#"
Usage: gog-build-checker [OPTIONS]

Options:
    --report      Scan and check from the terminal instead of opening the window
    --no-check    With --report, only list installed games and their build IDs
    --help        Show this message

Set RUST_LOG=debug for verbose scan and network logging.
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build_id::{BuildIdentifier, ComparisonResult};
    use crate::game::{CheckOutcome, UpdateStatus};
    use std::path::PathBuf;

    fn checked(name: &str, installed: &str, latest: &str, result: ComparisonResult) -> GogGame {
        let mut game = GogGame::new(name, PathBuf::from("C:/GOG Games").join(name));
        game.product_id = Some("1207658924".to_string());
        game.installed = BuildIdentifier::classify(installed);
        game.check = Some(CheckOutcome {
            latest: BuildIdentifier::classify(latest),
            latest_version: None,
            status: UpdateStatus::Compared(result),
            changelog: String::new(),
            tags: String::new(),
        });
        game
    }

    #[test]
    fn report_line_lists_both_builds_and_status() {
        let game = checked("Hades", "58465618714994950", "58465618714994951", ComparisonResult::UpdateAvailable);
        let line = report_line(&game);
        assert!(line.starts_with("Hades "));
        assert!(line.contains("58465618714994950"));
        assert!(line.contains("58465618714994951"));
        assert!(line.ends_with("Update Available"));
    }

    #[test]
    fn unchecked_games_show_a_dash_for_latest() {
        let mut game = GogGame::new("Hades", PathBuf::from("C:/GOG Games/Hades"));
        game.installed = BuildIdentifier::classify("58465618714994950");
        let line = report_line(&game);
        let columns: Vec<&str> = line.split_whitespace().collect();
        assert_eq!(columns, ["Hades", "58465618714994950", "-", "Pending"]);
    }

    #[test]
    fn summary_exit_code_flags_updates() {
        let current = checked("A", "12345678", "12345678", ComparisonResult::UpToDate);
        let behind = checked("B", "12345678", "12345679", ComparisonResult::UpdateAvailable);

        let (footer, code) = report_summary(&[current.clone()]);
        assert_eq!(footer, "Total: 1 | Up to Date: 1 | Updates Available: 0");
        assert_eq!(code, 0);

        let (footer, code) = report_summary(&[current, behind]);
        assert_eq!(footer, "Total: 2 | Up to Date: 1 | Updates Available: 1");
        assert_eq!(code, 2);
    }
}
