use ratatui::style::{Color, Modifier, Style};

use aisat_admin_core::theme::Theme;

/// Colour set for one theme
pub struct Palette {
    pub primary: Color,
    pub secondary: Color,
    pub accent: Color,
    pub error: Color,
    pub muted: Color,
    pub highlight: Color,
    pub text: Color,
    pub background: Color,
    pub status_bar: Color,
}

// AISAT blue on white
const LIGHT: Palette = Palette {
    primary: Color::Rgb(0, 86, 179),
    secondary: Color::Rgb(40, 140, 70),
    accent: Color::Rgb(170, 120, 0),
    error: Color::Rgb(190, 40, 40),
    muted: Color::Rgb(110, 110, 120),
    highlight: Color::Rgb(214, 228, 245),
    text: Color::Rgb(20, 20, 30),
    background: Color::Rgb(248, 249, 251),
    status_bar: Color::Rgb(226, 230, 236),
};

const DARK: Palette = Palette {
    primary: Color::Rgb(64, 128, 192),
    secondary: Color::Rgb(96, 160, 96),
    accent: Color::Rgb(192, 160, 64),
    error: Color::Rgb(192, 64, 64),
    muted: Color::Rgb(128, 128, 128),
    highlight: Color::Rgb(48, 48, 64),
    text: Color::White,
    background: Color::Rgb(24, 24, 30),
    status_bar: Color::Rgb(32, 32, 40),
};

pub fn palette(theme: Theme) -> &'static Palette {
    match theme {
        Theme::Light => &LIGHT,
        Theme::Dark => &DARK,
    }
}

// Styles
pub fn base_style(theme: Theme) -> Style {
    let p = palette(theme);
    Style::default().fg(p.text).bg(p.background)
}

pub fn title_style(theme: Theme) -> Style {
    Style::default()
        .fg(palette(theme).primary)
        .add_modifier(Modifier::BOLD)
}

pub fn selected_style(theme: Theme) -> Style {
    Style::default()
        .bg(palette(theme).highlight)
        .add_modifier(Modifier::BOLD)
}

pub fn list_item_style(theme: Theme) -> Style {
    Style::default().fg(palette(theme).text)
}

pub fn muted_style(theme: Theme) -> Style {
    Style::default().fg(palette(theme).muted)
}

pub fn highlight_style(theme: Theme) -> Style {
    Style::default().fg(palette(theme).accent)
}

pub fn success_style(theme: Theme) -> Style {
    Style::default().fg(palette(theme).secondary)
}

pub fn error_style(theme: Theme) -> Style {
    Style::default().fg(palette(theme).error)
}

pub fn border_style(theme: Theme, focused: bool) -> Style {
    let p = palette(theme);
    if focused {
        Style::default().fg(p.primary)
    } else {
        Style::default().fg(p.muted)
    }
}

pub fn status_bar_style(theme: Theme) -> Style {
    let p = palette(theme);
    Style::default().bg(p.status_bar).fg(p.text)
}

pub fn help_key_style(theme: Theme) -> Style {
    Style::default()
        .fg(palette(theme).accent)
        .add_modifier(Modifier::BOLD)
}

pub fn help_desc_style(theme: Theme) -> Style {
    Style::default().fg(palette(theme).text)
}
