use crate::build_id::{BuildIdentifier, ComparisonResult};

use regex::Regex;
use std::path::PathBuf;
use std::sync::LazyLock;

const DLC_MARKERS: [&str; 5] = [" - ", ": ", " dlc", " expansion", " pack"];

const EDITION_SUFFIXES: [&str; 12] = [
    " - Enhanced Edition",
    " Enhanced Edition",
    " - Director's Cut",
    " Director's Cut",
    " - Definitive Edition",
    " Definitive Edition",
    " - Game of the Year Edition",
    " Game of the Year Edition",
    " - Complete Edition",
    " Complete Edition",
    " - Digital Deluxe Edition",
    " Digital Deluxe Edition",
];

static NON_WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\w\s]").unwrap());
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// An installed GOG title as found on disk, plus the result of the last
/// update check once one has run.
#[derive(Clone, Debug)]
pub struct GogGame {
    pub name: String,
    pub install_path: PathBuf,
    pub product_id: Option<String>,
    pub installed: BuildIdentifier,
    pub executable: Option<String>,
    pub size_bytes: Option<u64>,
    pub check: Option<CheckOutcome>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum UpdateStatus {
    Pending,
    NoInstalledBuild,
    NotInDatabase,
    Compared(ComparisonResult),
}

impl UpdateStatus {
    pub fn label(&self) -> &'static str {
        match self {
            UpdateStatus::Pending => "Pending",
            UpdateStatus::NoInstalledBuild => "Cannot Check - No Installed Version",
            UpdateStatus::NotInDatabase => "Not in Database",
            UpdateStatus::Compared(result) => result.label(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct CheckOutcome {
    pub latest: BuildIdentifier,
    pub latest_version: Option<String>,
    pub status: UpdateStatus,
    pub changelog: String,
    pub tags: String,
}

impl CheckOutcome {
    /// Hover text for the latest build, including the release version gogdb
    /// lists next to it when there is one.
    pub fn latest_hover(&self) -> String {
        let mut text = format!("Latest {}: {}", self.latest.kind_label(), self.latest.display());
        if let Some(version) = self.latest_version.as_deref().filter(|v| !v.trim().is_empty()) {
            text.push_str(&format!("\nVersion: {}", version.trim()));
        }
        text
    }
}

impl GogGame {
    pub fn new(name: &str, install_path: PathBuf) -> Self {
        Self {
            name: name.to_string(),
            install_path,
            product_id: None,
            installed: BuildIdentifier::unknown(),
            executable: None,
            size_bytes: None,
            check: None,
        }
    }

    pub fn status(&self) -> UpdateStatus {
        self.check
            .as_ref()
            .map(|c| c.status.clone())
            .unwrap_or(UpdateStatus::Pending)
    }

    pub fn is_dlc(&self) -> bool {
        let lower = self.name.to_lowercase();
        DLC_MARKERS.iter().any(|marker| lower.contains(marker))
    }

    /// Name of the game a DLC belongs to, or the full name otherwise.
    pub fn base_game_name(&self) -> &str {
        if !self.is_dlc() {
            return &self.name;
        }
        for separator in [" - ", ": "] {
            if let Some((base, _)) = self.name.split_once(separator) {
                return base;
            }
        }
        &self.name
    }

    pub fn store_url(&self) -> String {
        format!("https://www.gog-games.to/game/{}", store_slug(&self.name))
    }

    /// PCGamingWiki page for full games. DLCs do not get their own page.
    pub fn wiki_url(&self) -> Option<String> {
        if self.is_dlc() {
            return None;
        }
        Some(format!(
            "https://www.pcgamingwiki.com/wiki/{}",
            wiki_slug(&self.name)
        ))
    }

    pub fn size_label(&self) -> String {
        match self.size_bytes {
            Some(bytes) => format_size(bytes),
            None => "Unknown".to_string(),
        }
    }
}

/// `The Witcher 3: Wild Hunt` -> `the_witcher_3_wild_hunt`
pub fn store_slug(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut pending_sep = false;
    for c in name.to_lowercase().chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_sep && !out.is_empty() {
                out.push('_');
            }
            pending_sep = false;
            out.push(c);
        } else {
            pending_sep = true;
        }
    }
    out
}

/// `Baldur's Gate - Enhanced Edition` -> `Baldurs_Gate`
pub fn wiki_slug(name: &str) -> String {
    let mut formatted = name.trim();
    for suffix in EDITION_SUFFIXES {
        if let Some(stripped) = formatted.strip_suffix(suffix) {
            formatted = stripped.trim();
            break;
        }
    }
    let cleaned = NON_WORD.replace_all(formatted, "");
    WHITESPACE.replace_all(cleaned.trim(), "_").into_owned()
}

pub fn format_size(bytes: u64) -> String {
    let mut size = bytes as f64;
    for unit in ["B", "KB", "MB", "GB", "TB"] {
        if size < 1024.0 {
            return format!("{size:.1} {unit}");
        }
        size /= 1024.0;
    }
    format!("{size:.1} PB")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game(name: &str) -> GogGame {
        GogGame::new(name, PathBuf::from("C:/GOG Games/x"))
    }

    #[test]
    fn dlc_detection() {
        assert!(game("Divinity: Original Sin 2 - Definitive Edition").is_dlc());
        assert!(game("Stellaris Expansion Pass").is_dlc());
        assert!(!game("Hollow Knight").is_dlc());
    }

    #[test]
    fn base_game_name_splits_on_first_separator() {
        assert_eq!(game("Pillars of Eternity - The White March").base_game_name(), "Pillars of Eternity");
        assert_eq!(game("Cyberpunk 2077: Phantom Liberty").base_game_name(), "Cyberpunk 2077");
        assert_eq!(game("Some Soundtrack Pack").base_game_name(), "Some Soundtrack Pack");
        assert_eq!(game("Hades").base_game_name(), "Hades");
    }

    #[test]
    fn store_slugs() {
        assert_eq!(store_slug("The Witcher 3: Wild Hunt"), "the_witcher_3_wild_hunt");
        assert_eq!(store_slug("  --Hades!! "), "hades");
        assert_eq!(store_slug("Baldur's Gate 3"), "baldur_s_gate_3");
    }

    #[test]
    fn wiki_slugs_strip_one_edition_suffix() {
        assert_eq!(wiki_slug("Baldur's Gate - Enhanced Edition"), "Baldurs_Gate");
        assert_eq!(wiki_slug("Disco Elysium Director's Cut"), "Disco_Elysium");
        assert_eq!(wiki_slug("Hollow Knight"), "Hollow_Knight");
    }

    #[test]
    fn wiki_url_is_not_offered_for_dlc() {
        assert!(game("Cyberpunk 2077: Phantom Liberty").wiki_url().is_none());
        assert_eq!(
            game("Hollow Knight").wiki_url().as_deref(),
            Some("https://www.pcgamingwiki.com/wiki/Hollow_Knight")
        );
    }

    #[test]
    fn sizes() {
        assert_eq!(format_size(512), "512.0 B");
        assert_eq!(format_size(1536), "1.5 KB");
        assert_eq!(format_size(5 * 1024 * 1024 * 1024), "5.0 GB");
    }

    #[test]
    fn latest_hover_mentions_release_version() {
        let mut outcome = CheckOutcome {
            latest: BuildIdentifier::classify("58465618714994951"),
            latest_version: Some("1.5.78".to_string()),
            status: UpdateStatus::Compared(ComparisonResult::UpdateAvailable),
            changelog: String::new(),
            tags: String::new(),
        };
        assert_eq!(outcome.latest_hover(), "Latest Build ID: 58465618714994951\nVersion: 1.5.78");

        outcome.latest_version = Some("  ".to_string());
        assert_eq!(outcome.latest_hover(), "Latest Build ID: 58465618714994951");
    }

    #[test]
    fn unchecked_games_are_pending() {
        assert_eq!(game("Hades").status(), UpdateStatus::Pending);
        assert_eq!(UpdateStatus::NotInDatabase.label(), "Not in Database");
        assert_eq!(
            UpdateStatus::Compared(ComparisonResult::UpToDate).label(),
            "Up to Date"
        );
    }
}
