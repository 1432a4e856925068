use qrpro_config::render::{RenderConfig, ThemeColors};
use qrpro_types::{Color, EcLevel, Theme};

use crate::error::RenderError;

/// Turns raw RGBA pixels into a payload
pub trait Decoder: Send + Sync {
    /// Returns `None` when no code is found
    fn decode(&self, pixels: &[u8], width: u32, height: u32) -> Option<String>;
}

/// Turns a payload into a visual code
pub trait Encoder: Send + Sync {
    fn render(&self, payload: &str, options: &RenderOptions) -> Result<RenderedCode, RenderError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    pub width: u32,
    pub height: u32,
    pub foreground: Color,
    pub background: Color,
    pub ec_level: EcLevel,
}

impl RenderOptions {
    /// Fixed rendering parameters keyed to the active theme
    pub fn for_theme(theme: Theme, config: &RenderConfig) -> Result<Self, RenderError> {
        let colors = match theme {
            Theme::Light => &config.light,
            Theme::Dark => &config.dark,
        };
        let (foreground, background) = parse_colors(colors)?;

        Ok(Self {
            width: config.size,
            height: config.size,
            foreground,
            background,
            ec_level: config.ec_level,
        })
    }
}

fn parse_colors(colors: &ThemeColors) -> Result<(Color, Color), RenderError> {
    let fg = Color::from_hex(&colors.foreground)
        .ok_or_else(|| RenderError::InvalidColor(colors.foreground.clone()))?;
    let bg = Color::from_hex(&colors.background)
        .ok_or_else(|| RenderError::InvalidColor(colors.background.clone()))?;
    Ok((fg, bg))
}

/// Rasterized code plus a text rendering for terminals
#[derive(Clone)]
pub struct RenderedCode {
    pub width: u32,
    pub height: u32,
    /// RGBA8, row-major
    pub pixels: Vec<u8>,
    pub preview: String,
}

impl std::fmt::Debug for RenderedCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderedCode")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dark_theme_uses_dark_colors() {
        let options = RenderOptions::for_theme(Theme::Dark, &RenderConfig::default()).unwrap();
        assert_eq!(options.foreground, Color::WHITE);
        assert_eq!(options.background, Color([0x1e, 0x29, 0x3b]));
        assert_eq!(options.width, 280);
        assert_eq!(options.height, 280);
        assert_eq!(options.ec_level, EcLevel::H);
    }

    #[test]
    fn light_theme_uses_black_on_white() {
        let options = RenderOptions::for_theme(Theme::Light, &RenderConfig::default()).unwrap();
        assert_eq!(options.foreground, Color::BLACK);
        assert_eq!(options.background, Color::WHITE);
    }

    #[test]
    fn bad_color_is_rejected() {
        let mut config = RenderConfig::default();
        config.light.foreground = "black".to_string();
        assert!(matches!(
            RenderOptions::for_theme(Theme::Light, &config),
            Err(RenderError::InvalidColor(_))
        ));
    }
}
