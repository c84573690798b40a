//! Palette and semantic styling for the dashboard.

use chainpulse_core::{Network, Trend};
use ratatui::style::{Color, Modifier, Style};

// ── Core Palette ──────────────────────────────────────────────────────

pub const CYAN: Color = Color::Rgb(128, 255, 234); // #80ffea
pub const SUCCESS_GREEN: Color = Color::Rgb(80, 250, 123); // #50fa7b
pub const ERROR_RED: Color = Color::Rgb(255, 99, 99); // #ff6363

// ── Extended Palette ──────────────────────────────────────────────────

pub const DIM_WHITE: Color = Color::Rgb(189, 193, 207); // #bdc1cf
pub const BORDER_GRAY: Color = Color::Rgb(98, 114, 164); // #6272a4
pub const BG_HIGHLIGHT: Color = Color::Rgb(40, 42, 54); // #282a36

// ── Semantic Styles ───────────────────────────────────────────────────

/// The selected network's accent, from the core's raw RGB contract.
pub fn network_accent(network: Network) -> Color {
    let (r, g, b) = network.accent_rgb();
    Color::Rgb(r, g, b)
}

/// Title text for blocks/panels.
pub fn title_style() -> Style {
    Style::default().fg(CYAN).add_modifier(Modifier::BOLD)
}

/// Border for panels.
pub fn border_default() -> Style {
    Style::default().fg(BORDER_GRAY)
}

/// Trend indicator color: green rising, red falling.
pub fn trend_style(trend: Trend) -> Style {
    match trend {
        Trend::Up => Style::default().fg(SUCCESS_GREEN),
        Trend::Down => Style::default().fg(ERROR_RED),
    }
}

/// Big metric value inside a card.
pub fn card_value() -> Style {
    Style::default().fg(DIM_WHITE).add_modifier(Modifier::BOLD)
}

/// Card label text.
pub fn card_label() -> Style {
    Style::default().fg(BORDER_GRAY)
}

/// Active tab in a tab bar.
pub fn tab_active(accent: Color) -> Style {
    Style::default()
        .fg(accent)
        .bg(BG_HIGHLIGHT)
        .add_modifier(Modifier::BOLD)
}

/// Inactive tab in a tab bar.
pub fn tab_inactive() -> Style {
    Style::default().fg(DIM_WHITE)
}

/// Error pane text.
pub fn error_style() -> Style {
    Style::default().fg(ERROR_RED).add_modifier(Modifier::BOLD)
}

/// Key hint text (e.g., "q quit  r retry").
pub fn key_hint() -> Style {
    Style::default().fg(BORDER_GRAY)
}

/// Key hint key character.
pub fn key_hint_key() -> Style {
    Style::default().fg(CYAN).add_modifier(Modifier::BOLD)
}
