use crate::build_id::{BuildIdentifier, extract_identifier};
use crate::game::GogGame;
use crate::paths::PATH_HOME;

use regex::Regex;
use serde_json::Value;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use walkdir::WalkDir;

static INFO_FILE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^goggame-(\d+)\.info$").unwrap());

const SKIPPED_EXE_PREFIXES: [&str; 5] = ["unins", "setup", "install", "crash", "error"];

const DEFAULT_ROOTS: [&str; 17] = [
    "C:\\Program Files (x86)\\GOG Games",
    "C:\\Program Files\\GOG Games",
    "C:\\GOG Games",
    "D:\\GOG Games",
    "E:\\GOG Games",
    "F:\\GOG Games",
    "G:\\GOG Games",
    "C:\\Games\\GOG",
    "D:\\Games\\GOG",
    "E:\\Games\\GOG",
    "D:\\Program Files\\GOG Games",
    "D:\\Program Files (x86)\\GOG Games",
    "C:\\Games",
    "D:\\Games",
    "E:\\Games",
    "D:\\",
    "E:\\",
];

const GALAXY_CANDIDATES: [&str; 2] = [
    "C:\\Program Files (x86)\\GOG Galaxy\\GalaxyClient.exe",
    "C:\\Program Files\\GOG Galaxy\\GalaxyClient.exe",
];

/// Built-in locations GOG installers and Galaxy default to, followed by any
/// user-configured folders.
pub fn scan_roots(extra: &[PathBuf]) -> Vec<PathBuf> {
    let mut roots: Vec<PathBuf> = DEFAULT_ROOTS.iter().map(PathBuf::from).collect();
    roots.push(PATH_HOME.join("Games").join("GOG"));
    roots.push(PATH_HOME.join("Documents").join("GOG Games"));
    roots.push(PATH_HOME.join("GOG Games"));
    roots.extend(extra.iter().cloned());

    let mut seen = HashSet::new();
    roots.retain(|root| seen.insert(root.clone()));
    roots
}

/// Scans every root one level deep and returns the GOG installs found,
/// deduplicated by name and sorted for display.
pub fn scan_games(roots: &[PathBuf]) -> Vec<GogGame> {
    let mut games: Vec<GogGame> = Vec::new();

    for root in roots {
        if !root.is_dir() {
            log::debug!("Skipping missing scan root {}", root.display());
            continue;
        }
        log::debug!("Scanning {}", root.display());

        for entry in WalkDir::new(root).min_depth(1).max_depth(1).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    log::debug!("Can't read entry under {}: {err}", root.display());
                    continue;
                }
            };
            if !entry.file_type().is_dir() {
                continue;
            }
            if let Some(game) = analyze_game_dir(entry.path()) {
                log::info!("Found {} at {}", game.name, game.install_path.display());
                games.push(game);
            }
        }
    }

    let mut seen = HashSet::new();
    games.retain(|game| seen.insert(game.name.to_lowercase()));
    games.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
    log::info!("Scan finished with {} games", games.len());
    games
}

/// Builds a [`GogGame`] from a directory holding a `goggame-<id>.info` file
/// and at least one launchable executable.
pub fn analyze_game_dir(dir: &Path) -> Option<GogGame> {
    let mut info: Option<(String, PathBuf)> = None;
    let mut executable: Option<String> = None;

    let entries = std::fs::read_dir(dir).ok()?;
    let mut names: Vec<(String, PathBuf)> = entries
        .flatten()
        .filter(|e| e.file_type().map(|t| t.is_file()).unwrap_or(false))
        .map(|e| (e.file_name().to_string_lossy().to_string(), e.path()))
        .collect();
    names.sort();

    for (name, path) in names {
        if info.is_none() {
            if let Some(caps) = INFO_FILE.captures(&name) {
                info = Some((caps[1].to_string(), path));
                continue;
            }
        }
        if executable.is_none() && is_launchable_exe(&name) {
            executable = Some(name);
        }
    }

    let (product_id, info_path) = info?;
    let Some(executable) = executable else {
        log::debug!("No executable in {}, skipping", dir.display());
        return None;
    };

    let folder_name = dir.file_name()?.to_string_lossy().to_string();
    let content = match std::fs::read(&info_path) {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(err) => {
            log::warn!("Can't read {}: {err}", info_path.display());
            String::new()
        }
    };

    let mut installed = extract_identifier(&content);
    if installed.is_unknown() {
        installed = BuildIdentifier::opaque(&product_id);
    }

    let name = info_display_name(&content).unwrap_or(folder_name);

    let mut game = GogGame::new(&name, dir.to_path_buf());
    game.product_id = Some(product_id);
    game.installed = installed;
    game.executable = Some(executable);
    game.size_bytes = Some(dir_size(dir));
    Some(game)
}

fn is_launchable_exe(name: &str) -> bool {
    let lower = name.to_lowercase();
    lower.ends_with(".exe") && !SKIPPED_EXE_PREFIXES.iter().any(|p| lower.starts_with(p))
}

/// The `name` field of a well-formed .info file.
fn info_display_name(content: &str) -> Option<String> {
    let json: Value = serde_json::from_str(content).ok()?;
    json["name"]
        .as_str()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
}

pub fn dir_size(path: &Path) -> u64 {
    WalkDir::new(path)
        .into_iter()
        .flatten()
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| entry.metadata().ok())
        .map(|meta| meta.len())
        .sum()
}

pub fn find_gog_galaxy() -> Option<PathBuf> {
    let mut candidates: Vec<PathBuf> = GALAXY_CANDIDATES.iter().map(PathBuf::from).collect();
    if let Some(local) = dirs::data_local_dir() {
        candidates.push(local.join("GOG.com").join("Galaxy").join("GalaxyClient.exe"));
    }
    candidates.into_iter().find(|path| path.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build_id::IdentifierKind;
    use std::fs;

    fn make_game(root: &Path, folder: &str, info: Option<(&str, &str)>, exes: &[&str]) -> PathBuf {
        let dir = root.join(folder);
        fs::create_dir_all(&dir).unwrap();
        if let Some((id, content)) = info {
            fs::write(dir.join(format!("goggame-{id}.info")), content).unwrap();
        }
        for exe in exes {
            fs::write(dir.join(exe), b"MZ").unwrap();
        }
        dir
    }

    #[test]
    fn reads_build_id_and_name_from_info() {
        let root = tempfile::tempdir().unwrap();
        let dir = make_game(
            root.path(),
            "Hollow Knight",
            Some((
                "1308320804",
                r#"{"gameId": "1308320804", "buildId": "58465618714994950", "name": "Hollow Knight (GOG)"}"#,
            )),
            &["unins000.exe", "hollow_knight.exe"],
        );

        let game = analyze_game_dir(&dir).unwrap();
        assert_eq!(game.name, "Hollow Knight (GOG)");
        assert_eq!(game.product_id.as_deref(), Some("1308320804"));
        assert_eq!(game.installed.kind(), IdentifierKind::BuildId);
        assert_eq!(game.executable.as_deref(), Some("hollow_knight.exe"));
        assert!(game.size_bytes.unwrap() > 0);
    }

    #[test]
    fn falls_back_to_product_id_and_folder_name() {
        let root = tempfile::tempdir().unwrap();
        let dir = make_game(
            root.path(),
            "Old Game",
            Some(("1207658924", "{ broken json, no build here")),
            &["game.exe"],
        );

        let game = analyze_game_dir(&dir).unwrap();
        assert_eq!(game.name, "Old Game");
        assert_eq!(game.installed.kind(), IdentifierKind::OpaqueId);
        assert_eq!(game.installed.raw_value(), "1207658924");
    }

    #[test]
    fn info_format_version_is_not_a_game_version() {
        let root = tempfile::tempdir().unwrap();
        let info = r#"{
    "buildId": "",
    "clientId": "50225266424144145",
    "gameId": "1207658924",
    "language": "English",
    "languages": ["en-US"],
    "name": "Unreal Tournament 2004",
    "playTasks": [{"category": "game", "isPrimary": true, "path": "System\\UT2004.exe", "type": "FileTask"}],
    "rootGameId": "1207658924",
    "version": 1
}"#;
        let dir = make_game(root.path(), "UT2004", Some(("1207658924", info)), &["UT2004.exe"]);

        let game = analyze_game_dir(&dir).unwrap();
        assert_eq!(game.name, "Unreal Tournament 2004");
        assert_eq!(game.installed.kind(), IdentifierKind::OpaqueId);
        assert_eq!(game.installed.raw_value(), "1207658924");
    }

    #[test]
    fn requires_info_file_and_launchable_exe() {
        let root = tempfile::tempdir().unwrap();
        let no_info = make_game(root.path(), "NoInfo", None, &["game.exe"]);
        let only_setup = make_game(
            root.path(),
            "OnlySetup",
            Some(("1", r#"{"buildId": "12345678"}"#)),
            &["setup.exe", "UNINS000.EXE", "crashreporter.exe"],
        );
        assert!(analyze_game_dir(&no_info).is_none());
        assert!(analyze_game_dir(&only_setup).is_none());
    }

    #[test]
    fn scan_dedups_and_sorts() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        make_game(first.path(), "Zeta", Some(("2", "{}")), &["z.exe"]);
        make_game(first.path(), "alpha", Some(("3", "{}")), &["a.exe"]);
        make_game(second.path(), "ZETA", Some(("4", "{}")), &["z.exe"]);
        fs::write(first.path().join("stray.txt"), "x").unwrap();

        let roots = vec![
            first.path().to_path_buf(),
            second.path().to_path_buf(),
            first.path().join("missing"),
        ];
        let games = scan_games(&roots);
        let names: Vec<&str> = games.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, ["alpha", "Zeta"]);
    }

    #[test]
    fn roots_include_extras_once() {
        let extra = PathBuf::from("/srv/games");
        let roots = scan_roots(&[extra.clone(), extra.clone()]);
        assert_eq!(roots.iter().filter(|r| **r == extra).count(), 1);
        assert!(roots.contains(&PathBuf::from("C:\\GOG Games")));
    }

    #[test]
    fn dir_size_sums_nested_files() {
        let root = tempfile::tempdir().unwrap();
        fs::create_dir_all(root.path().join("a/b")).unwrap();
        fs::write(root.path().join("a/one"), [0u8; 10]).unwrap();
        fs::write(root.path().join("a/b/two"), [0u8; 32]).unwrap();
        assert_eq!(dir_size(root.path()), 42);
    }
}
