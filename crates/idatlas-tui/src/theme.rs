//! Harbor palette and semantic styling for the TUI.

use ratatui::style::{Color, Modifier, Style};

use idatlas_core::CountryStyle;

// ── Core Palette ──────────────────────────────────────────────────────

pub const AEGEAN_BLUE: Color = Color::Rgb(97, 175, 239); // #61afef
pub const SEAFOAM: Color = Color::Rgb(102, 217, 178); // #66d9b2
pub const AMBER: Color = Color::Rgb(255, 196, 84); // #ffc454
pub const CORAL: Color = Color::Rgb(239, 119, 109); // #ef776d

// ── Extended Palette ──────────────────────────────────────────────────

pub const DIM_WHITE: Color = Color::Rgb(189, 193, 207); // #bdc1cf
pub const BORDER_GRAY: Color = Color::Rgb(92, 99, 112); // #5c6370
pub const MUTED_GRAY: Color = Color::Rgb(76, 82, 99); // #4c5263
pub const BG_HIGHLIGHT: Color = Color::Rgb(44, 49, 60); // #2c313c
pub const BG_DARK: Color = Color::Rgb(30, 34, 42); // #1e222a

// ── Semantic Styles ───────────────────────────────────────────────────

/// Title text for blocks/panels.
pub fn title_style() -> Style {
    Style::default().fg(AEGEAN_BLUE).add_modifier(Modifier::BOLD)
}

/// Border for a focused panel.
pub fn border_focused() -> Style {
    Style::default().fg(AEGEAN_BLUE)
}

/// Border for an unfocused panel.
pub fn border_default() -> Style {
    Style::default().fg(BORDER_GRAY)
}

/// Table header row.
pub fn table_header() -> Style {
    Style::default()
        .fg(AEGEAN_BLUE)
        .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
}

/// Normal table row text.
pub fn table_row() -> Style {
    Style::default().fg(DIM_WHITE)
}

/// Selected / highlighted table row.
pub fn table_selected() -> Style {
    Style::default()
        .fg(AMBER)
        .bg(BG_HIGHLIGHT)
        .add_modifier(Modifier::BOLD)
}

/// Active tab in the tab bar.
pub fn tab_active() -> Style {
    Style::default().fg(AMBER).add_modifier(Modifier::BOLD)
}

/// Inactive tab in the tab bar.
pub fn tab_inactive() -> Style {
    Style::default().fg(DIM_WHITE)
}

/// Key hint text (e.g., "q quit  ? help").
pub fn key_hint() -> Style {
    Style::default().fg(BORDER_GRAY)
}

/// Key hint key character.
pub fn key_hint_key() -> Style {
    Style::default().fg(AEGEAN_BLUE).add_modifier(Modifier::BOLD)
}

/// Region heading on the map grid.
pub fn region_heading() -> Style {
    Style::default().fg(AEGEAN_BLUE).add_modifier(Modifier::BOLD)
}

/// Tri-state map cell style: selected beats active beats inactive.
pub fn country_cell(style: CountryStyle) -> Style {
    match style {
        CountryStyle::Selected => Style::default()
            .fg(BG_DARK)
            .bg(AMBER)
            .add_modifier(Modifier::BOLD),
        CountryStyle::Active => Style::default().fg(SEAFOAM),
        CountryStyle::Inactive => Style::default().fg(MUTED_GRAY),
    }
}

/// The map cursor on top of the tri-state cell style.
pub fn country_cursor(style: CountryStyle) -> Style {
    country_cell(style)
        .bg(BG_HIGHLIGHT)
        .add_modifier(Modifier::REVERSED)
}
