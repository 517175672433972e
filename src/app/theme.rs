use super::config::{CheckerConfig, FONT_SIZE_DEFAULT, ThemeChoice};
use crate::build_id::ComparisonResult;
use crate::game::UpdateStatus;

use eframe::egui::{self, Color32, FontFamily, FontId, TextStyle, Theme, ThemePreference};

pub const ACCENT: Color32 = Color32::from_rgb(52, 152, 219);

/// Installs dark and light styles sized for the configured font and selects
/// which one is active. Called again whenever either setting changes.
pub fn apply_checker_theme(ctx: &egui::Context, cfg: &CheckerConfig) {
    let scale = cfg.font_size as f32 / FONT_SIZE_DEFAULT as f32;
    ctx.set_style_of(Theme::Dark, checker_style(dark_visuals(), scale));
    ctx.set_style_of(Theme::Light, checker_style(light_visuals(), scale));
    ctx.set_theme(match cfg.theme {
        ThemeChoice::System => ThemePreference::System,
        ThemeChoice::Dark => ThemePreference::Dark,
        ThemeChoice::Light => ThemePreference::Light,
    });
}

// Slate blues with a bright blue accent.
fn dark_visuals() -> egui::Visuals {
    let mut visuals = egui::Visuals::dark();
    visuals.window_fill = Color32::from_rgb(44, 62, 80);
    visuals.panel_fill = Color32::from_rgb(44, 62, 80);
    visuals.extreme_bg_color = Color32::from_rgb(52, 73, 94);
    visuals.faint_bg_color = Color32::from_rgb(58, 80, 103);
    visuals.hyperlink_color = ACCENT;
    visuals.widgets.inactive.bg_fill = Color32::from_rgb(52, 73, 94);
    visuals.widgets.hovered.bg_fill = Color32::from_rgb(74, 95, 122);
    visuals.widgets.active.bg_fill = Color32::from_rgb(41, 128, 185);
    visuals.selection.bg_fill = ACCENT;
    visuals
}

fn light_visuals() -> egui::Visuals {
    let mut visuals = egui::Visuals::light();
    visuals.hyperlink_color = Color32::from_rgb(59, 130, 246);
    visuals.selection.bg_fill = Color32::from_rgb(147, 197, 253);
    visuals
}

fn checker_style(visuals: egui::Visuals, scale: f32) -> egui::Style {
    let mut style = egui::Style {
        visuals,
        ..Default::default()
    };
    style.spacing.item_spacing = egui::vec2(8.0, 6.0);
    style.spacing.button_padding = egui::vec2(8.0, 4.0);

    for (text_style, size, family) in [
        (TextStyle::Heading, 22.0, FontFamily::Proportional),
        (TextStyle::Body, 14.0, FontFamily::Proportional),
        (TextStyle::Button, 14.0, FontFamily::Proportional),
        (TextStyle::Small, 11.0, FontFamily::Proportional),
        (TextStyle::Monospace, 13.0, FontFamily::Monospace),
    ] {
        style
            .text_styles
            .insert(text_style, FontId::new(size * scale, family));
    }
    style
}

/// Text color for a status cell, `None` keeps the default.
pub fn status_color(status: &UpdateStatus, dark: bool) -> Option<Color32> {
    match status {
        UpdateStatus::Compared(ComparisonResult::UpdateAvailable) => Some(if dark {
            Color32::from_rgb(231, 76, 60)
        } else {
            Color32::from_rgb(185, 28, 28)
        }),
        UpdateStatus::Compared(ComparisonResult::UpToDate) => Some(if dark {
            Color32::from_rgb(46, 204, 113)
        } else {
            Color32::from_rgb(22, 101, 52)
        }),
        UpdateStatus::Compared(ComparisonResult::NewerInstalled) => Some(ACCENT),
        UpdateStatus::NoInstalledBuild | UpdateStatus::NotInDatabase => Some(if dark {
            Color32::from_rgb(241, 196, 15)
        } else {
            Color32::from_rgb(161, 98, 7)
        }),
        _ => None,
    }
}

/// Translucent row tint matching [`status_color`].
pub fn status_row_tint(status: &UpdateStatus) -> Option<Color32> {
    match status {
        UpdateStatus::Compared(ComparisonResult::UpdateAvailable) => {
            Some(Color32::from_rgba_unmultiplied(231, 76, 60, 30))
        }
        UpdateStatus::Compared(ComparisonResult::UpToDate) => {
            Some(Color32::from_rgba_unmultiplied(46, 204, 113, 30))
        }
        UpdateStatus::NoInstalledBuild => Some(Color32::from_rgba_unmultiplied(241, 196, 15, 30)),
        _ => None,
    }
}
