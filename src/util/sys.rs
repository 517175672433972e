use rfd::{MessageButtons, MessageDialog, MessageDialogResult, MessageLevel};
use std::error::Error;
use std::path::{Path, PathBuf};
use std::process::Command;

pub fn msg(title: &str, contents: &str) {
    let _ = MessageDialog::new()
        .set_level(MessageLevel::Info)
        .set_title(title)
        .set_description(contents)
        .set_buttons(MessageButtons::Ok)
        .show();
}

pub fn yesno(title: &str, contents: &str) -> bool {
    MessageDialog::new()
        .set_level(MessageLevel::Warning)
        .set_title(title)
        .set_description(contents)
        .set_buttons(MessageButtons::YesNo)
        .show()
        == MessageDialogResult::Yes
}

pub fn pick_folder(title: &str) -> Option<PathBuf> {
    rfd::FileDialog::new().set_title(title).pick_folder()
}

/// Starts an executable detached from the checker.
pub fn launch_detached(path: &Path) -> Result<(), Box<dyn Error>> {
    if !path.is_file() {
        return Err(format!("{} doesn't exist", path.display()).into());
    }
    let mut cmd = Command::new(path);
    if let Some(dir) = path.parent() {
        cmd.current_dir(dir);
    }
    cmd.spawn()?;
    Ok(())
}

/// Opens a folder in the platform file manager.
pub fn open_folder(path: &Path) -> Result<(), Box<dyn Error>> {
    let opener = if cfg!(windows) {
        "explorer"
    } else if cfg!(target_os = "macos") {
        "open"
    } else {
        "xdg-open"
    };
    Command::new(opener).arg(path).spawn()?;
    Ok(())
}

/// Prefixes a log line with the local wall-clock time.
pub fn timestamped(line: &str) -> String {
    format!("[{}] {line}", chrono::Local::now().format("%H:%M:%S"))
}
