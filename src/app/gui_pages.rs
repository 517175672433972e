use super::app::CheckerApp;
use super::config::CheckerConfig;
use super::theme::{ACCENT, status_color, status_row_tint};
use crate::build_id::ComparisonResult;
use crate::game::UpdateStatus;
use crate::util::*;

use eframe::egui::RichText;
use eframe::egui::{self, Color32, Ui};
use egui_extras::{Column, TableBuilder};

const COLUMNS: [&str; 8] = [
    "Game Name",
    "Installed Build/Version",
    "Latest Build/Version",
    "Status",
    "Size",
    "Tags",
    "Install Path",
    "📚 Wiki",
];

const PATH_DISPLAY_MAX: usize = 60;

impl CheckerApp {
    pub fn display_page_games(&mut self, ui: &mut Ui) {
        ui.label(RichText::new("📋 Installed GOG Games").strong().color(ACCENT));
        ui.add_space(4.0);

        if self.games.is_empty() {
            ui.label(match self.is_busy() {
                true => "Scanning...",
                false => "No GOG games found. Add extra folders under Settings and rescan.",
            });
            return;
        }

        let dark = ui.visuals().dark_mode;
        let mut clicked_row: Option<usize> = None;
        let mut open_url: Option<String> = None;

        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .sense(egui::Sense::click())
            .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
            .column(Column::initial(240.0).at_least(120.0).clip(true))
            .column(Column::initial(150.0).at_least(80.0).clip(true))
            .column(Column::initial(150.0).at_least(80.0).clip(true))
            .column(Column::initial(170.0).at_least(90.0))
            .column(Column::initial(80.0).at_least(60.0))
            .column(Column::initial(180.0).at_least(60.0).clip(true))
            .column(Column::initial(220.0).at_least(80.0).clip(true))
            .column(Column::remainder().at_least(50.0))
            .min_scrolled_height(0.0)
            .header(24.0, |mut header| {
                for title in COLUMNS {
                    header.col(|ui| {
                        ui.strong(title);
                    });
                }
            })
            .body(|mut body| {
                for (index, game) in self.games.iter().enumerate() {
                    let status = self.status_of(index);
                    let tint = status_row_tint(&status);
                    let latest = match &game.check {
                        Some(check) if !check.latest.is_unknown() => check.latest.display().to_string(),
                        Some(_) => "Unknown".to_string(),
                        None if self.checking == Some(index) => "Checking...".to_string(),
                        None => "-".to_string(),
                    };
                    let latest_hover = game.check.as_ref().map(|c| c.latest_hover());
                    let tags = game.check.as_ref().map(|c| c.tags.as_str()).unwrap_or("🎮");
                    let path = shorten_path(&game.install_path.display().to_string());

                    body.row(26.0, |mut row| {
                        row.set_selected(self.selected == Some(index));

                        row.col(|ui| {
                            tinted(ui, tint);
                            ui.label(game.name.as_str());
                        });
                        row.col(|ui| {
                            tinted(ui, tint);
                            ui.label(game.installed.display())
                                .on_hover_text(game.installed.kind_label());
                        });
                        row.col(|ui| {
                            tinted(ui, tint);
                            let response = ui.label(latest.as_str());
                            if let Some(hover) = &latest_hover {
                                response.on_hover_text(hover.as_str());
                            }
                        });
                        row.col(|ui| {
                            tinted(ui, tint);
                            let mut text = RichText::new(status.label());
                            if let Some(color) = status_color(&status, dark) {
                                text = text.color(color);
                            }
                            if status == UpdateStatus::Compared(ComparisonResult::UpdateAvailable) {
                                if ui
                                    .link(text.strong())
                                    .on_hover_text("🌐 Open this game on gog-games.to")
                                    .clicked()
                                {
                                    open_url = Some(game.store_url());
                                }
                            } else {
                                ui.label(text);
                            }
                        });
                        row.col(|ui| {
                            tinted(ui, tint);
                            ui.label(game.size_label());
                        });
                        row.col(|ui| {
                            tinted(ui, tint);
                            ui.label(tags).on_hover_text(format!("Game Tags: {tags}"));
                        });
                        row.col(|ui| {
                            tinted(ui, tint);
                            ui.label(path.as_str()).on_hover_text(format!(
                                "Install Path: {}",
                                game.install_path.display()
                            ));
                        });
                        row.col(|ui| {
                            tinted(ui, tint);
                            match game.wiki_url() {
                                Some(url) => {
                                    if ui
                                        .link("📚")
                                        .on_hover_text(format!(
                                            "Open PCGamingWiki page for: {}",
                                            game.name
                                        ))
                                        .clicked()
                                    {
                                        open_url = Some(url);
                                    }
                                }
                                None => {
                                    ui.weak("-")
                                        .on_hover_text("Wiki not available for DLC/Expansions");
                                }
                            }
                        });

                        if row.response().clicked() {
                            clicked_row = Some(index);
                        }
                    });
                }
            });

        if let Some(index) = clicked_row {
            self.selected = Some(index);
        }
        if let Some(url) = open_url {
            self.log(&format!("Opening {url}"));
            ui.ctx().open_url(egui::OpenUrl::new_tab(url));
        }
    }

    pub fn display_page_settings(&mut self, ui: &mut Ui) {
        ui.heading("Settings");
        ui.separator();

        ui.label(RichText::new("Extra scan folders").strong());
        ui.label("Game folders are searched one level deep for goggame-*.info files.");
        let mut remove: Option<usize> = None;
        for (i, dir) in self.options.extra_scan_dirs.iter().enumerate() {
            ui.horizontal(|ui| {
                if ui.button("🗑").on_hover_text("Remove folder").clicked() {
                    remove = Some(i);
                }
                ui.label(dir.display().to_string());
            });
        }
        if let Some(i) = remove {
            self.options.extra_scan_dirs.remove(i);
        }
        if ui.button("➕ Add Folder").clicked() {
            if let Some(dir) = pick_folder("Add GOG games folder") {
                if !self.options.extra_scan_dirs.contains(&dir) {
                    self.options.extra_scan_dirs.push(dir);
                }
            }
        }
        ui.add_space(8.0);

        egui::Grid::new("settings_grid")
            .num_columns(2)
            .spacing([16.0, 8.0])
            .show(ui, |ui| {
                ui.label("Delay between requests");
                ui.add(
                    egui::DragValue::new(&mut self.options.request_delay_ms)
                        .range(0..=10_000)
                        .speed(50)
                        .suffix(" ms"),
                );
                ui.end_row();

                ui.label("Request timeout");
                ui.add(
                    egui::DragValue::new(&mut self.options.request_timeout_secs)
                        .range(1..=120)
                        .suffix(" s"),
                );
                ui.end_row();

                ui.label("Check updates after scanning");
                ui.checkbox(&mut self.options.auto_check_after_scan, "");
                ui.end_row();

                ui.label("Check for new checker releases");
                ui.checkbox(&mut self.options.check_self_update, "");
                ui.end_row();
            });

        ui.with_layout(egui::Layout::bottom_up(egui::Align::Center), |ui| {
            ui.horizontal(|ui| {
                if ui.button("Save Settings").clicked() {
                    self.persist_settings();
                    self.status_text = "Settings saved".to_string();
                }
                if ui.button("Restore Defaults").clicked()
                    && yesno("Restore Defaults", "Reset all settings to their defaults?")
                {
                    self.options = CheckerConfig::default();
                    self.persist_settings();
                }
            });
            ui.separator();
        });
    }

    pub fn display_page_help(&mut self, ui: &mut Ui) {
        ui.heading("Help");
        ui.separator();
        egui::ScrollArea::vertical().auto_shrink(false).show(ui, |ui| {
            ui.label(RichText::new("How it works").strong());
            ui.label("The checker looks for GOG installs in the usual GOG Games folders and any extra folders from Settings. Every install carries a goggame-<id>.info file; the build ID inside it is compared with the newest build listed on gogdb.org.");
            ui.add_space(8.0);

            ui.label(RichText::new("Status guide").strong());
            egui::Grid::new("status_guide").num_columns(2).spacing([16.0, 4.0]).show(ui, |ui| {
                let dark = ui.visuals().dark_mode;
                for (status, meaning) in [
                    (UpdateStatus::Compared(ComparisonResult::UpdateAvailable), "A newer build is available. Click the status to open the game page."),
                    (UpdateStatus::Compared(ComparisonResult::UpToDate), "Installed build matches the latest build."),
                    (UpdateStatus::Compared(ComparisonResult::NewerInstalled), "Installed build is newer than anything gogdb.org lists."),
                    (UpdateStatus::Compared(ComparisonResult::Indeterminate), "Identifiers differ but can't be ordered, e.g. a version string against a build ID."),
                    (UpdateStatus::NotInDatabase, "gogdb.org has no data for this product or could not be reached."),
                    (UpdateStatus::NoInstalledBuild, "No build information was found in the install."),
                ] {
                    let mut text = RichText::new(status.label()).strong();
                    if let Some(color) = status_color(&status, dark) {
                        text = text.color(color);
                    }
                    ui.label(text);
                    ui.label(meaning);
                    ui.end_row();
                }
            });
            ui.add_space(8.0);

            ui.label(RichText::new("Keyboard shortcuts").strong());
            egui::Grid::new("shortcuts").num_columns(2).spacing([16.0, 4.0]).show(ui, |ui| {
                for (keys, action) in [
                    ("F1", "Show this help"),
                    ("F5", "Rescan and check again"),
                    ("Ctrl +", "Increase font size"),
                    ("Ctrl -", "Decrease font size"),
                    ("Ctrl 0", "Reset font size"),
                ] {
                    ui.monospace(keys);
                    ui.label(action);
                    ui.end_row();
                }
            });
        });
    }

    pub fn display_page_about(&mut self, ui: &mut Ui) {
        ui.heading("About GOG Build Checker");
        ui.separator();
        ui.label(format!("Version {}", env!("CARGO_PKG_VERSION")));
        ui.label("Checks installed GOG games against the newest builds known to gogdb.org.");
        ui.label("Build data courtesy of gogdb.org. This tool is not affiliated with GOG.");
        ui.hyperlink_to("gogdb.org", "https://www.gogdb.org");
        ui.hyperlink_to("Releases", RELEASES_URL);
        if self.needs_update {
            ui.label(RichText::new("A newer release is available.").color(ACCENT));
        }
    }
}

fn tinted(ui: &mut Ui, tint: Option<Color32>) {
    if let Some(tint) = tint {
        ui.painter().rect_filled(ui.max_rect(), 0.0, tint);
    }
}

/// Keeps the tail of long paths so the game folder stays visible.
fn shorten_path(path: &str) -> String {
    let count = path.chars().count();
    if count <= PATH_DISPLAY_MAX {
        return path.to_string();
    }
    let tail: String = path.chars().skip(count - (PATH_DISPLAY_MAX - 3)).collect();
    format!("...{tail}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_paths_are_kept() {
        assert_eq!(shorten_path("C:\\GOG Games\\Hades"), "C:\\GOG Games\\Hades");
    }

    #[test]
    fn long_paths_keep_their_tail() {
        let long = format!("C:\\{}\\Game", "x".repeat(80));
        let short = shorten_path(&long);
        assert_eq!(short.chars().count(), PATH_DISPLAY_MAX);
        assert!(short.starts_with("..."));
        assert!(short.ends_with("\\Game"));
    }
}
