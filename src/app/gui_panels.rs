use super::app::{BottomTab, CheckerApp, MenuPage};
use super::config::{FONT_SIZE_MAX, FONT_SIZE_MIN, ThemeChoice};
use super::theme::ACCENT;
use crate::util::*;

use eframe::egui::RichText;
use eframe::egui::{self, Ui};

impl CheckerApp {
    pub fn display_panel_top(&mut self, ui: &mut Ui) {
        ui.add_space(4.0);
        ui.horizontal(|ui| {
            ui.label(
                RichText::new("GOG Build Checker")
                    .heading()
                    .color(ui.visuals().strong_text_color()),
            );
            ui.separator();
            ui.selectable_value(&mut self.cur_page, MenuPage::Games, "Games");
            ui.selectable_value(&mut self.cur_page, MenuPage::Settings, "Settings");
            ui.selectable_value(&mut self.cur_page, MenuPage::Help, "Help");
            ui.selectable_value(&mut self.cur_page, MenuPage::About, "About");
            ui.separator();

            let busy = self.is_busy();
            if ui
                .add_enabled(!busy, egui::Button::new("🔄 Rescan"))
                .on_hover_text("Clear results and scan for installed games (F5)")
                .clicked()
            {
                self.refresh_all();
            }
            if ui
                .add_enabled(
                    !busy && !self.games.is_empty(),
                    egui::Button::new("🌐 Check Updates"),
                )
                .on_hover_text("Look up the latest builds on gogdb.org")
                .clicked()
            {
                self.start_check();
            }
            if ui.button("🎮 Open GOG Galaxy").clicked() {
                self.open_gog_galaxy();
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let version_label = match self.needs_update {
                    true => format!("v{} (Update Available)", env!("CARGO_PKG_VERSION")),
                    false => format!("v{}", env!("CARGO_PKG_VERSION")),
                };
                ui.hyperlink_to(version_label, RELEASES_URL);
                ui.separator();

                let before = self.options.theme;
                egui::ComboBox::from_id_salt("theme_choice")
                    .selected_text(theme_label(self.options.theme))
                    .show_ui(ui, |ui| {
                        for choice in [ThemeChoice::System, ThemeChoice::Dark, ThemeChoice::Light] {
                            ui.selectable_value(&mut self.options.theme, choice, theme_label(choice));
                        }
                    });
                if self.options.theme != before {
                    self.persist_settings();
                }

                let size = self.options.font_size;
                if ui
                    .add_enabled(size < FONT_SIZE_MAX, egui::Button::new("A+"))
                    .on_hover_text("Increase font size (Ctrl +)")
                    .clicked()
                {
                    self.change_font_size(1);
                }
                if ui
                    .button(format!("{size}px"))
                    .on_hover_text("Reset font size (Ctrl 0)")
                    .clicked()
                {
                    self.change_font_size(0);
                }
                if ui
                    .add_enabled(size > FONT_SIZE_MIN, egui::Button::new("A-"))
                    .on_hover_text("Decrease font size (Ctrl -)")
                    .clicked()
                {
                    self.change_font_size(-1);
                }
            });
        });
        ui.add_space(4.0);
    }

    pub fn display_panel_status(&mut self, ui: &mut Ui) {
        ui.horizontal(|ui| {
            if self.is_busy() {
                ui.add(egui::Spinner::new());
            }
            ui.label(&self.status_text);
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if self.games.is_empty() {
                    ui.label("No games found");
                    return;
                }
                let stats = CheckStats::from_games(&self.games);
                ui.label(format!(
                    "📊 Total: {} | ✅ Up to Date: {} | 🔄 Updates Available: {}",
                    stats.total, stats.up_to_date, stats.updates
                ));
            });
        });
    }

    pub fn display_panel_details(&mut self, ui: &mut Ui) {
        ui.horizontal(|ui| {
            ui.selectable_value(&mut self.bottom_tab, BottomTab::Details, "📋 Details");
            ui.selectable_value(&mut self.bottom_tab, BottomTab::Log, "📝 Log");
            if self.bottom_tab == BottomTab::Log {
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("Clear").clicked() {
                        self.log_lines.clear();
                    }
                });
            }
        });
        ui.separator();

        match self.bottom_tab {
            BottomTab::Details => self.display_details(ui),
            BottomTab::Log => {
                egui::ScrollArea::vertical()
                    .auto_shrink(false)
                    .stick_to_bottom(true)
                    .show(ui, |ui| {
                        for line in &self.log_lines {
                            ui.label(RichText::new(line).monospace());
                        }
                    });
            }
        }
    }

    fn display_details(&mut self, ui: &mut Ui) {
        let Some(game) = self.selected_game() else {
            ui.label("Select a game to view changelog information");
            return;
        };

        let mut open_dir = None;
        egui::ScrollArea::vertical()
            .auto_shrink(false)
            .show(ui, |ui| {
                ui.label(RichText::new(format!("📋 {}", game.name)).heading().color(ACCENT));
                egui::Grid::new("details_grid")
                    .num_columns(2)
                    .spacing([12.0, 4.0])
                    .show(ui, |ui| {
                        ui.strong("Install Path:");
                        if ui
                            .link(game.install_path.display().to_string())
                            .on_hover_text("Open folder")
                            .clicked()
                        {
                            open_dir = Some(game.install_path.clone());
                        }
                        ui.end_row();

                        if let Some(id) = &game.product_id {
                            ui.strong("GOG ID:");
                            ui.label(id.as_str());
                            ui.end_row();
                        }
                        if let Some(exe) = &game.executable {
                            ui.strong("Executable:");
                            ui.label(exe.as_str());
                            ui.end_row();
                        }
                        ui.strong(format!("Installed {}:", game.installed.kind_label()));
                        ui.label(game.installed.display());
                        ui.end_row();
                        ui.strong("Size:");
                        ui.label(game.size_label());
                        ui.end_row();
                    });
                ui.separator();

                match &game.check {
                    Some(check) => {
                        for line in check.changelog.lines() {
                            if line.starts_with("http://") || line.starts_with("https://") {
                                ui.hyperlink(line);
                            } else {
                                ui.label(line);
                            }
                        }
                    }
                    None => {
                        ui.label("No changelog available yet. Run an update check.");
                    }
                }
            });

        if let Some(dir) = open_dir {
            if let Err(err) = open_folder(&dir) {
                self.log(&format!("Couldn't open {}: {err}", dir.display()));
            }
        }
    }
}

fn theme_label(choice: ThemeChoice) -> &'static str {
    match choice {
        ThemeChoice::System => "🖥 System",
        ThemeChoice::Dark => "🌙 Dark",
        ThemeChoice::Light => "☀ Light",
    }
}
