//! Color palette and style constants for the concert TUI.

use ratatui::style::{Color, Modifier, Style};

// ── Color palette ─────────────────────────────────────────────────────────────

pub const C_BG: Color = Color::Rgb(16, 18, 24);
pub const C_ACCENT: Color = Color::Rgb(90, 130, 255); // brand blue from the web client
pub const C_UPCOMING: Color = Color::Rgb(80, 200, 120);
pub const C_PAST: Color = Color::Rgb(130, 130, 150);
pub const C_ERROR: Color = Color::Rgb(255, 95, 95);
pub const C_MUTED: Color = Color::Rgb(72, 72, 88);
pub const C_SECONDARY: Color = Color::Rgb(115, 115, 138);
pub const C_PRIMARY: Color = Color::Rgb(210, 210, 225);
pub const C_SELECTION_BG: Color = Color::Rgb(28, 30, 44);
pub const C_PANEL_BORDER: Color = Color::Rgb(40, 40, 52);
pub const C_GENRE: Color = Color::Rgb(80, 140, 200);
pub const C_LOCATION: Color = Color::Rgb(100, 160, 130);
pub const C_PRICE: Color = Color::Rgb(220, 180, 90);
pub const C_CART: Color = Color::Rgb(255, 150, 90);
pub const C_FAVORITE: Color = Color::Rgb(255, 210, 50);
pub const C_STATUS_OK: Color = Color::Rgb(80, 200, 120);
pub const C_FIELD_LABEL: Color = Color::Rgb(150, 150, 175);

// ── Predefined styles ─────────────────────────────────────────────────────────

pub fn style_default() -> Style {
    Style::default().fg(C_PRIMARY)
}

pub fn style_secondary() -> Style {
    Style::default().fg(C_SECONDARY)
}

pub fn style_accent() -> Style {
    Style::default().fg(C_ACCENT)
}

pub fn style_error() -> Style {
    Style::default().fg(C_ERROR)
}

pub fn style_muted() -> Style {
    Style::default().fg(C_MUTED)
}

pub fn style_selected() -> Style {
    Style::default().bg(C_SELECTION_BG).fg(C_PRIMARY)
}

pub fn style_selected_bold() -> Style {
    Style::default()
        .bg(C_SELECTION_BG)
        .fg(C_PRIMARY)
        .add_modifier(Modifier::BOLD)
}

pub fn style_border() -> Style {
    Style::default().fg(C_PANEL_BORDER)
}
