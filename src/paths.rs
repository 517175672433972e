use std::path::PathBuf;
use std::sync::LazyLock;

/// Per-user data directory, e.g. `%APPDATA%\gog-build-checker` on Windows or
/// `~/.config/gog-build-checker` on Linux.
pub static PATH_APP: LazyLock<PathBuf> = LazyLock::new(|| {
    dirs::config_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join("gog-build-checker")
});

pub static PATH_HOME: LazyLock<PathBuf> =
    LazyLock::new(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")));
