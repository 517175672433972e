use super::gogdb::{GogDbClient, LatestBuild};
use super::http::{Fetch, FetchError};
use super::scanner::scan_games;
use crate::build_id::{BuildIdentifier, ComparisonResult, compare};
use crate::game::{CheckOutcome, GogGame, UpdateStatus};

use std::path::PathBuf;
use std::sync::mpsc::{Receiver, Sender, channel};
use std::time::Duration;

#[derive(Clone, Copy, Debug)]
pub struct CheckOptions {
    pub request_delay: Duration,
    pub request_timeout: Duration,
}

pub enum ScanEvent {
    Log(String),
    Found(Vec<GogGame>),
}

pub enum CheckEvent {
    Log(String),
    Started { index: usize },
    Progress { index: usize, outcome: CheckOutcome },
    Finished,
}

/// Counts shown in the status bar and the report footer.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct CheckStats {
    pub total: usize,
    pub up_to_date: usize,
    pub updates: usize,
}

impl CheckStats {
    pub fn from_games(games: &[GogGame]) -> Self {
        let mut stats = Self {
            total: games.len(),
            ..Default::default()
        };
        for game in games {
            match game.status() {
                UpdateStatus::Compared(ComparisonResult::UpToDate) => stats.up_to_date += 1,
                UpdateStatus::Compared(ComparisonResult::UpdateAvailable) => stats.updates += 1,
                _ => {}
            }
        }
        stats
    }
}

/// Looks up the newest build for one game and classifies it against the
/// installed identifier. Lookup failures never escape; they become
/// "Not in Database" with an unknown latest identifier.
pub fn check_game<F: Fetch>(game: &GogGame, client: &GogDbClient<F>) -> CheckOutcome {
    let Some(product_id) = game.product_id.as_deref() else {
        return not_in_database("No GOG product id was found for this install.".to_string());
    };

    match client.latest(product_id) {
        Ok(latest) => {
            let status = if game.installed.is_unknown() {
                UpdateStatus::NoInstalledBuild
            } else {
                UpdateStatus::Compared(compare(&game.installed, &latest.identifier))
            };
            CheckOutcome {
                changelog: build_notes(game, &latest),
                latest: latest.identifier,
                latest_version: latest.version,
                status,
                tags: latest.tags,
            }
        }
        Err(err) => {
            log::info!("gogdb lookup for {} ({product_id}) failed: {err}", game.name);
            let reason = match err {
                FetchError::NotFound => format!("GOG ID {product_id} is not listed on gogdb.org."),
                other => format!("Couldn't reach gogdb.org: {other}"),
            };
            not_in_database(reason)
        }
    }
}

fn not_in_database(reason: String) -> CheckOutcome {
    CheckOutcome {
        latest: BuildIdentifier::unknown(),
        latest_version: None,
        status: UpdateStatus::NotInDatabase,
        changelog: format!("Changelog not available.\n\n{reason}"),
        tags: "🎮".to_string(),
    }
}

fn build_notes(game: &GogGame, latest: &LatestBuild) -> String {
    let mut notes = format!(
        "Latest {}: {}",
        latest.identifier.kind_label(),
        latest.identifier.display()
    );
    if let Some(version) = &latest.version {
        notes.push_str(&format!("\nVersion: {version}"));
    }
    notes.push_str(&format!(
        "\nInstalled {}: {}",
        game.installed.kind_label(),
        game.installed.display()
    ));
    notes.push_str(&format!("\nBuilds listed on gogdb.org: {}", latest.build_count));
    if game.is_dlc() {
        notes.push_str(&format!(
            "\n\nNote: this DLC/Expansion shares its build ID with the base game '{}'.",
            game.base_game_name()
        ));
    }
    if let Some(id) = &game.product_id {
        notes.push_str(&format!("\n\nhttps://www.gogdb.org/product/{id}"));
    }
    notes
}

pub fn spawn_scan(roots: Vec<PathBuf>) -> Receiver<ScanEvent> {
    let (tx, rx) = channel();
    std::thread::spawn(move || {
        let _ = tx.send(ScanEvent::Log(format!(
            "Scanning {} folders for GOG games...",
            roots.len()
        )));
        let games = scan_games(&roots);
        let _ = tx.send(ScanEvent::Log(format!(
            "Scan completed, found {} games",
            games.len()
        )));
        let _ = tx.send(ScanEvent::Found(games));
    });
    rx
}

/// Checks every game on a worker thread, one at a time, pausing between
/// requests. Stops early when the receiving side goes away.
pub fn spawn_check<F>(games: Vec<GogGame>, fetch: F, options: CheckOptions) -> Receiver<CheckEvent>
where
    F: Fetch + Send + 'static,
{
    let (tx, rx) = channel();
    std::thread::spawn(move || {
        let client = GogDbClient::new(fetch, options.request_timeout);
        run_checks(&games, &client, options.request_delay, &tx);
        let _ = tx.send(CheckEvent::Finished);
    });
    rx
}

fn run_checks<F: Fetch>(
    games: &[GogGame],
    client: &GogDbClient<F>,
    delay: Duration,
    tx: &Sender<CheckEvent>,
) {
    let log = |line: String| tx.send(CheckEvent::Log(line)).is_ok();

    if !log("Starting version check...".to_string()) {
        return;
    }
    for (index, game) in games.iter().enumerate() {
        if index > 0 && !delay.is_zero() {
            std::thread::sleep(delay);
        }
        if tx.send(CheckEvent::Started { index }).is_err() {
            return;
        }
        log(format!(
            "Checking {} (installed {}: {})",
            game.name,
            game.installed.kind_label(),
            game.installed.display()
        ));

        let outcome = check_game(game, client);
        log(format!(
            "   {} -> latest {} [{}]",
            game.name,
            outcome.latest.display(),
            outcome.status.label()
        ));
        if tx.send(CheckEvent::Progress { index, outcome }).is_err() {
            return;
        }
    }
    log("Version check completed".to_string());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::http::HttpResponse;
    use std::collections::HashMap;

    /// Serves canned bodies keyed by product id; anything else is a 404.
    struct StubGogDb(HashMap<&'static str, &'static str>);

    impl Fetch for StubGogDb {
        fn get(&self, url: &str, _accept: &str, _timeout: Duration) -> Result<HttpResponse, FetchError> {
            let hit = self
                .0
                .iter()
                .find(|(id, _)| url.contains(&format!("/{id}/")));
            Ok(match hit {
                Some((_, body)) => HttpResponse { status: 200, body: body.to_string() },
                None => HttpResponse { status: 404, body: String::new() },
            })
        }
    }

    fn stub() -> StubGogDb {
        StubGogDb(HashMap::from([
            ("100", r#"{"builds": [{"id": 58465618714994951, "version": "1.1"}]}"#),
            ("200", r#"{"builds": [{"id": "51111111", "version": "2.0"}]}"#),
        ]))
    }

    fn game(name: &str, product_id: Option<&str>, installed: BuildIdentifier) -> GogGame {
        let mut game = GogGame::new(name, PathBuf::from("/games").join(name));
        game.product_id = product_id.map(str::to_string);
        game.installed = installed;
        game
    }

    #[test]
    fn older_install_reports_update() {
        let client = GogDbClient::new(stub(), Duration::from_secs(1));
        let g = game("A", Some("100"), BuildIdentifier::classify("58465618714994950"));
        let outcome = check_game(&g, &client);
        assert_eq!(outcome.status, UpdateStatus::Compared(ComparisonResult::UpdateAvailable));
        assert_eq!(outcome.latest_version.as_deref(), Some("1.1"));
        assert!(outcome.changelog.contains("58465618714994951"));
    }

    #[test]
    fn matching_build_is_up_to_date() {
        let client = GogDbClient::new(stub(), Duration::from_secs(1));
        let g = game("B", Some("200"), BuildIdentifier::classify("51111111"));
        assert_eq!(
            check_game(&g, &client).status,
            UpdateStatus::Compared(ComparisonResult::UpToDate)
        );
    }

    #[test]
    fn product_id_fallback_is_indeterminate() {
        let client = GogDbClient::new(stub(), Duration::from_secs(1));
        let g = game("C", Some("100"), BuildIdentifier::opaque("100"));
        assert_eq!(
            check_game(&g, &client).status,
            UpdateStatus::Compared(ComparisonResult::Indeterminate)
        );
    }

    #[test]
    fn missing_product_is_not_in_database() {
        let client = GogDbClient::new(stub(), Duration::from_secs(1));
        let g = game("D", Some("999"), BuildIdentifier::classify("51111111"));
        let outcome = check_game(&g, &client);
        assert_eq!(outcome.status, UpdateStatus::NotInDatabase);
        assert!(outcome.latest.is_unknown());

        let g = game("E", None, BuildIdentifier::classify("51111111"));
        assert_eq!(check_game(&g, &client).status, UpdateStatus::NotInDatabase);
    }

    #[test]
    fn unknown_install_cannot_be_checked() {
        let client = GogDbClient::new(stub(), Duration::from_secs(1));
        let g = game("F", Some("200"), BuildIdentifier::unknown());
        assert_eq!(check_game(&g, &client).status, UpdateStatus::NoInstalledBuild);
    }

    #[test]
    fn dlc_notes_mention_base_game() {
        let client = GogDbClient::new(stub(), Duration::from_secs(1));
        let g = game("Base - Extra Pack", Some("200"), BuildIdentifier::classify("51111111"));
        assert!(check_game(&g, &client).changelog.contains("'Base'"));
    }

    #[test]
    fn worker_reports_every_game_then_finishes() {
        let games = vec![
            game("A", Some("100"), BuildIdentifier::classify("58465618714994951")),
            game("B", Some("999"), BuildIdentifier::classify("1.0")),
        ];
        let rx = spawn_check(
            games,
            stub(),
            CheckOptions {
                request_delay: Duration::ZERO,
                request_timeout: Duration::from_secs(1),
            },
        );

        let mut progress = Vec::new();
        let mut finished = false;
        for event in rx.iter() {
            match event {
                CheckEvent::Progress { index, outcome } => progress.push((index, outcome.status)),
                CheckEvent::Finished => finished = true,
                _ => {}
            }
        }
        assert!(finished);
        assert_eq!(
            progress,
            vec![
                (0, UpdateStatus::Compared(ComparisonResult::UpToDate)),
                (1, UpdateStatus::NotInDatabase),
            ]
        );
    }

    #[test]
    fn stats_count_statuses() {
        let mut up = game("A", None, BuildIdentifier::unknown());
        let mut update = game("B", None, BuildIdentifier::unknown());
        let pending = game("C", None, BuildIdentifier::unknown());
        let client = GogDbClient::new(stub(), Duration::from_secs(1));
        let mut outcome = check_game(&up, &client);
        outcome.status = UpdateStatus::Compared(ComparisonResult::UpToDate);
        up.check = Some(outcome.clone());
        outcome.status = UpdateStatus::Compared(ComparisonResult::UpdateAvailable);
        update.check = Some(outcome);

        let stats = CheckStats::from_games(&[up, update, pending]);
        assert_eq!(stats, CheckStats { total: 3, up_to_date: 1, updates: 1 });
    }
}
