use ratatui::style::Color;

use crate::config::ThemeConfig;

/// Colours used by the renderer, resolved from `ThemeConfig`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub page: Color,
    pub accent: Color,
    pub error: Color,
    pub text: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self::from_config(&ThemeConfig::default())
    }
}

impl Palette {
    pub fn from_config(config: &ThemeConfig) -> Self {
        Self {
            page: parse_color(&config.page),
            accent: parse_color(&config.accent),
            error: parse_color(&config.error),
            text: parse_color(&config.text),
        }
    }
}

/// Parse `#RRGGBB`, `#RRGGBBAA` (alpha ignored) or anything ratatui's
/// `Color::from_str` accepts. Unparsable input yields `Color::Reset`.
pub fn parse_color(value: &str) -> Color {
    if let Ok(c) = value.parse::<Color>() {
        return c;
    }

    match parse_hex(value.trim_start_matches('#')) {
        Some(color) => color,
        None => {
            tracing::warn!("Unrecognised colour '{}', using terminal default", value);
            Color::Reset
        }
    }
}

fn parse_hex(hex: &str) -> Option<Color> {
    if !matches!(hex.len(), 6 | 8) || !hex.is_ascii() {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
    if hex.len() == 8 {
        channel(6..8)?;
    }
    Some(Color::Rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
}
