//! Color theme for the preview layout.
//!
//! The theme is an explicit value handed to [`crate::Preview::with_theme`];
//! nothing here touches process-wide styling state.

use ratatui::style::{Color, Modifier, Style};
use serde::Deserialize;

use crate::colors;

/// Colors used by the preview panes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub background: Color,
    pub text: Color,
    pub subtext: Color,
    pub border: Color,
    pub border_focused: Color,
    pub highlight: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background: colors::BG,
            text: colors::ON_SURFACE,
            subtext: colors::SUBTEXT,
            border: colors::OUTLINE,
            border_focused: colors::PRIMARY,
            highlight: colors::SURFACE_HIGH,
        }
    }
}

impl Theme {
    #[must_use]
    pub fn base(&self) -> Style {
        Style::default().fg(self.text).bg(self.background)
    }

    #[must_use]
    pub fn header(&self) -> Style {
        self.base().add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn muted(&self) -> Style {
        Style::default().fg(self.subtext).bg(self.background)
    }

    #[must_use]
    pub fn border(&self, focused: bool) -> Style {
        let fg = if focused {
            self.border_focused
        } else {
            self.border
        };
        Style::default().fg(fg).bg(self.background)
    }

    /// Style of the selected row. Unfocused panes keep a dimmer highlight so
    /// the selection stays visible while the other pane has the keyboard.
    #[must_use]
    pub fn selection(&self, focused: bool) -> Style {
        if focused {
            Style::default()
                .bg(self.highlight)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().bg(self.highlight)
        }
    }
}

/// Theme overrides as read from a manifest. Colors are hex strings
/// (`#RRGGBB` or `#RGB`); missing or invalid values keep the default.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeConfig {
    #[serde(default)]
    pub background: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub subtext: Option<String>,
    #[serde(default)]
    pub border: Option<String>,
    #[serde(default)]
    pub border_focused: Option<String>,
    #[serde(default)]
    pub highlight: Option<String>,
}

impl ThemeConfig {
    #[must_use]
    pub fn resolve(&self) -> Theme {
        let defaults = Theme::default();
        Theme {
            background: pick(self.background.as_deref(), defaults.background),
            text: pick(self.text.as_deref(), defaults.text),
            subtext: pick(self.subtext.as_deref(), defaults.subtext),
            border: pick(self.border.as_deref(), defaults.border),
            border_focused: pick(self.border_focused.as_deref(), defaults.border_focused),
            highlight: pick(self.highlight.as_deref(), defaults.highlight),
        }
    }
}

fn pick(value: Option<&str>, fallback: Color) -> Color {
    let Some(value) = value else {
        return fallback;
    };
    parse_hex_color(value).unwrap_or_else(|| {
        tracing::warn!("Ignoring invalid theme color: {value}");
        fallback
    })
}

/// Parse a hex color string into a ratatui Color.
///
/// Supports:
/// - 6-digit hex: "#FF5500"
/// - 3-digit shorthand: "#F50" (expands to #FF5500)
///
/// Returns None if the hex string is invalid.
#[must_use]
pub fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.trim_start_matches('#');
    // from_str_radix alone would also take a leading '+'.
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }

    match hex.len() {
        6 => {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            Some(Color::Rgb(r, g, b))
        }
        3 => {
            let r = u8::from_str_radix(&hex[0..1].repeat(2), 16).ok()?;
            let g = u8::from_str_radix(&hex[1..2].repeat(2), 16).ok()?;
            let b = u8::from_str_radix(&hex[2..3].repeat(2), 16).ok()?;
            Some(Color::Rgb(r, g, b))
        }
        _ => None,
    }
}
