use super::config::*;
use super::theme::apply_checker_theme;
use crate::game::{GogGame, UpdateStatus};
use crate::util::*;

use eframe::egui::{self, Key};
use std::sync::mpsc::{Receiver, TryRecvError};
use std::time::Duration;

#[derive(Clone, Copy, Eq, PartialEq)]
pub enum MenuPage {
    Games,
    Settings,
    Help,
    About,
}

#[derive(Clone, Copy, Eq, PartialEq)]
pub enum BottomTab {
    Details,
    Log,
}

/// Everything the window renders from. Workers never touch this directly;
/// they report through the channels polled at the start of each frame.
pub struct CheckerApp {
    pub options: CheckerConfig,
    pub cur_page: MenuPage,
    pub bottom_tab: BottomTab,

    pub games: Vec<GogGame>,
    pub selected: Option<usize>,
    pub log_lines: Vec<String>,
    pub status_text: String,

    pub scan_rx: Option<Receiver<ScanEvent>>,
    pub check_rx: Option<Receiver<CheckEvent>>,
    pub update_rx: Option<Receiver<bool>>,
    /// Game currently being looked up by the check worker.
    pub checking: Option<usize>,
    pub needs_update: bool,

    applied_style: Option<(u8, ThemeChoice)>,
}

impl CheckerApp {
    pub fn new(options: CheckerConfig) -> Self {
        let mut app = Self {
            options,
            cur_page: MenuPage::Games,
            bottom_tab: BottomTab::Details,
            games: Vec::new(),
            selected: None,
            log_lines: Vec::new(),
            status_text: "Ready".to_string(),
            scan_rx: None,
            check_rx: None,
            update_rx: None,
            checking: None,
            needs_update: false,
            applied_style: None,
        };

        if app.options.check_self_update {
            let (tx, rx) = std::sync::mpsc::channel();
            std::thread::spawn(move || {
                let _ = tx.send(check_for_checker_update(&CurlFetch));
            });
            app.update_rx = Some(rx);
        }

        app.start_scan();
        app
    }

    pub fn is_busy(&self) -> bool {
        self.scan_rx.is_some() || self.check_rx.is_some()
    }

    pub fn log(&mut self, line: &str) {
        log::info!("{line}");
        self.log_lines.push(timestamped(line));
    }

    pub fn start_scan(&mut self) {
        if self.is_busy() {
            return;
        }
        let roots = scan_roots(&self.options.extra_scan_dirs);
        self.status_text = "Scanning for games...".to_string();
        self.scan_rx = Some(spawn_scan(roots));
    }

    pub fn start_check(&mut self) {
        if self.is_busy() {
            return;
        }
        if self.games.is_empty() {
            msg("No Games", "No games found to check for updates.");
            return;
        }
        for game in &mut self.games {
            game.check = None;
        }
        let options = CheckOptions {
            request_delay: self.options.request_delay(),
            request_timeout: self.options.request_timeout(),
        };
        self.status_text = "Checking for updates...".to_string();
        self.check_rx = Some(spawn_check(self.games.clone(), CurlFetch, options));
    }

    /// Clears results and the log, then scans again.
    pub fn refresh_all(&mut self) {
        if self.is_busy() {
            return;
        }
        self.games.clear();
        self.selected = None;
        self.log_lines.clear();
        self.start_scan();
    }

    pub fn open_gog_galaxy(&mut self) {
        match find_gog_galaxy() {
            Some(path) => match launch_detached(&path) {
                Ok(()) => {
                    self.log("GOG Galaxy launched");
                    self.status_text = "GOG Galaxy opened".to_string();
                }
                Err(err) => {
                    self.log(&format!("Failed to open GOG Galaxy: {err}"));
                    msg("Error", &format!("Failed to open GOG Galaxy:\n{err}"));
                }
            },
            None => {
                self.log("GOG Galaxy not found");
                msg(
                    "GOG Galaxy Not Found",
                    "GOG Galaxy is not installed or could not be found.",
                );
            }
        }
    }

    pub fn change_font_size(&mut self, delta: i32) {
        let size = match delta {
            0 => FONT_SIZE_DEFAULT as i32,
            d => self.options.font_size as i32 + d,
        };
        self.options.set_font_size(size);
        self.status_text = format!("Font size set to {}px", self.options.font_size);
        self.persist_settings();
    }

    pub fn persist_settings(&mut self) {
        if let Err(err) = save_cfg(&self.options) {
            log::warn!("Couldn't save settings: {err}");
            msg("Error", &format!("Couldn't save settings: {err}"));
        }
    }

    pub fn selected_game(&self) -> Option<&GogGame> {
        self.selected.and_then(|i| self.games.get(i))
    }

    fn poll_workers(&mut self) {
        if let Some(rx) = self.update_rx.take() {
            match rx.try_recv() {
                Ok(needs_update) => self.needs_update = needs_update,
                Err(TryRecvError::Empty) => self.update_rx = Some(rx),
                Err(TryRecvError::Disconnected) => {}
            }
        }

        if let Some(rx) = self.scan_rx.take() {
            let mut done = false;
            loop {
                match rx.try_recv() {
                    Ok(ScanEvent::Log(line)) => self.log(&line),
                    Ok(ScanEvent::Found(games)) => {
                        self.games = games;
                        self.selected = None;
                        done = true;
                    }
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => {
                        done = true;
                        break;
                    }
                }
            }
            if done {
                self.status_text = "Scan completed".to_string();
                if self.options.auto_check_after_scan && !self.games.is_empty() {
                    self.start_check();
                }
            } else {
                self.scan_rx = Some(rx);
            }
        }

        if let Some(rx) = self.check_rx.take() {
            let mut done = false;
            loop {
                match rx.try_recv() {
                    Ok(CheckEvent::Log(line)) => self.log(&line),
                    Ok(CheckEvent::Started { index }) => {
                        self.checking = Some(index);
                        if let Some(game) = self.games.get(index) {
                            self.status_text = format!("Checking {}...", game.name);
                        }
                    }
                    Ok(CheckEvent::Progress { index, outcome }) => {
                        if let Some(game) = self.games.get_mut(index) {
                            game.check = Some(outcome);
                        }
                    }
                    Ok(CheckEvent::Finished) | Err(TryRecvError::Disconnected) => {
                        done = true;
                        break;
                    }
                    Err(TryRecvError::Empty) => break,
                }
            }
            if done {
                self.checking = None;
                self.status_text = "Update check completed".to_string();
            } else {
                self.check_rx = Some(rx);
            }
        }
    }

    fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        let (help, rescan, bigger, smaller, reset) = ctx.input(|i| {
            let cmd = i.modifiers.command;
            (
                i.key_pressed(Key::F1),
                i.key_pressed(Key::F5),
                cmd && (i.key_pressed(Key::Plus) || i.key_pressed(Key::Equals)),
                cmd && i.key_pressed(Key::Minus),
                cmd && i.key_pressed(Key::Num0),
            )
        });
        if help {
            self.cur_page = MenuPage::Help;
        }
        if rescan {
            self.refresh_all();
        }
        if bigger {
            self.change_font_size(1);
        }
        if smaller {
            self.change_font_size(-1);
        }
        if reset {
            self.change_font_size(0);
        }
    }

    pub fn status_of(&self, index: usize) -> UpdateStatus {
        if self.checking == Some(index) {
            return UpdateStatus::Pending;
        }
        self.games
            .get(index)
            .map(GogGame::status)
            .unwrap_or(UpdateStatus::Pending)
    }
}

impl eframe::App for CheckerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let wanted_style = (self.options.font_size, self.options.theme);
        if self.applied_style != Some(wanted_style) {
            apply_checker_theme(ctx, &self.options);
            self.applied_style = Some(wanted_style);
        }

        self.poll_workers();
        self.handle_shortcuts(ctx);

        egui::TopBottomPanel::top("menu_nav_panel").show(ctx, |ui| {
            self.display_panel_top(ui);
        });

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            self.display_panel_status(ui);
        });

        if self.cur_page == MenuPage::Games {
            egui::TopBottomPanel::bottom("details_panel")
                .resizable(true)
                .default_height(220.0)
                .min_height(120.0)
                .show(ctx, |ui| {
                    self.display_panel_details(ui);
                });
        }

        egui::CentralPanel::default().show(ctx, |ui| match self.cur_page {
            MenuPage::Games => self.display_page_games(ui),
            MenuPage::Settings => self.display_page_settings(ui),
            MenuPage::Help => self.display_page_help(ui),
            MenuPage::About => self.display_page_about(ui),
        });

        if self.is_busy() || self.update_rx.is_some() {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }
}
