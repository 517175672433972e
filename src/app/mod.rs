mod app;
mod config;
mod gui_pages;
mod gui_panels;
mod theme;

pub use app::CheckerApp;
pub use config::{CheckerConfig, load_cfg};
