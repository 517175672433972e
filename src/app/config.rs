use crate::paths::PATH_APP;

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::time::Duration;

pub const FONT_SIZE_MIN: u8 = 8;
pub const FONT_SIZE_MAX: u8 = 24;
pub const FONT_SIZE_DEFAULT: u8 = 13;

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub enum ThemeChoice {
    #[default]
    System,
    Dark,
    Light,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckerConfig {
    pub font_size: u8,
    pub theme: ThemeChoice,
    /// Folders scanned in addition to the built-in GOG locations.
    pub extra_scan_dirs: Vec<PathBuf>,
    pub request_delay_ms: u64,
    pub request_timeout_secs: u64,
    pub auto_check_after_scan: bool,
    pub check_self_update: bool,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            font_size: FONT_SIZE_DEFAULT,
            theme: ThemeChoice::System,
            extra_scan_dirs: Vec::new(),
            request_delay_ms: 1000,
            request_timeout_secs: 10,
            auto_check_after_scan: true,
            check_self_update: true,
        }
    }
}

impl CheckerConfig {
    pub fn set_font_size(&mut self, size: i32) {
        self.font_size = size.clamp(FONT_SIZE_MIN as i32, FONT_SIZE_MAX as i32) as u8;
    }

    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    /// Pulls values read from disk back into their valid ranges.
    fn sanitized(mut self) -> Self {
        self.set_font_size(self.font_size as i32);
        self.extra_scan_dirs.dedup();
        self
    }
}

fn cfg_path() -> PathBuf {
    PATH_APP.join("settings.json")
}

pub fn load_cfg() -> CheckerConfig {
    load_cfg_from(&cfg_path())
}

pub fn save_cfg(cfg: &CheckerConfig) -> Result<(), Box<dyn Error>> {
    save_cfg_to(cfg, &cfg_path())
}

fn load_cfg_from(path: &PathBuf) -> CheckerConfig {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(_) => return CheckerConfig::default(),
    };
    match serde_json::from_reader::<_, CheckerConfig>(BufReader::new(file)) {
        Ok(cfg) => cfg.sanitized(),
        Err(err) => {
            log::warn!("Ignoring unreadable settings at {}: {err}", path.display());
            CheckerConfig::default()
        }
    }
}

fn save_cfg_to(cfg: &CheckerConfig, path: &PathBuf) -> Result<(), Box<dyn Error>> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, cfg)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn font_size_is_clamped() {
        let mut cfg = CheckerConfig::default();
        cfg.set_font_size(40);
        assert_eq!(cfg.font_size, FONT_SIZE_MAX);
        cfg.set_font_size(-3);
        assert_eq!(cfg.font_size, FONT_SIZE_MIN);
        cfg.set_font_size(15);
        assert_eq!(cfg.font_size, 15);
    }

    #[test]
    fn missing_fields_take_defaults() {
        let cfg: CheckerConfig =
            serde_json::from_str(r#"{"font_size": 16, "something_else": true}"#).unwrap();
        assert_eq!(cfg.font_size, 16);
        assert_eq!(cfg.theme, ThemeChoice::System);
        assert_eq!(cfg.request_delay_ms, 1000);
        assert!(cfg.auto_check_after_scan);
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/settings.json");
        let mut cfg = CheckerConfig::default();
        cfg.theme = ThemeChoice::Light;
        cfg.extra_scan_dirs.push(PathBuf::from("/games"));
        save_cfg_to(&cfg, &path).unwrap();
        assert_eq!(load_cfg_from(&path), cfg);
    }

    #[test]
    fn broken_or_missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        assert_eq!(load_cfg_from(&path), CheckerConfig::default());

        std::fs::write(&path, "{ not json").unwrap();
        assert_eq!(load_cfg_from(&path), CheckerConfig::default());

        std::fs::write(&path, r#"{"font_size": 200}"#).unwrap();
        assert_eq!(load_cfg_from(&path).font_size, FONT_SIZE_MAX);
    }

    #[test]
    fn timeout_never_zero() {
        let mut cfg = CheckerConfig::default();
        cfg.request_timeout_secs = 0;
        assert_eq!(cfg.request_timeout(), Duration::from_secs(1));
    }
}
