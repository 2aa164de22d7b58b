use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Lighten, Srgb};

use crate::config::ColorConfig;
use crate::error::ChartError;

// ---------------------------------------------------------------------------
// Hex colour parsing
// ---------------------------------------------------------------------------

/// Parse `#rrggbb` (or `rrggbb`, or the three-digit short form) into a colour.
pub fn parse_hex(hex: &str) -> Result<Color32, ChartError> {
    let rgb: Srgb<u8> = hex
        .trim()
        .parse()
        .map_err(|e| ChartError::config(format!("invalid colour '{hex}': {e}")))?;
    Ok(Color32::from_rgb(rgb.red, rgb.green, rgb.blue))
}

/// A lighter variant of `color`, used to highlight the hovered marker.
pub fn lighten(color: Color32, amount: f32) -> Color32 {
    let rgb = Srgb::new(color.r(), color.g(), color.b()).into_format::<f32>();
    let hsl: Hsl = rgb.into_color();
    let lighter: Srgb = hsl.lighten(amount).into_color();
    let lighter = lighter.into_format::<u8>();
    Color32::from_rgb(lighter.red, lighter.green, lighter.blue)
}

// ---------------------------------------------------------------------------
// Resolved chart colours
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartColors {
    pub line: Color32,
    pub marker: Color32,
    pub hover: Color32,
    /// Fill of the marker under the pointer.
    pub hover_highlight: Color32,
}

impl ChartColors {
    pub fn from_config(cfg: &ColorConfig) -> Result<Self, ChartError> {
        let hover = parse_hex(&cfg.hover)?;
        Ok(Self {
            line: parse_hex(&cfg.line)?,
            marker: parse_hex(&cfg.marker)?,
            hover,
            hover_highlight: lighten(hover, 0.25),
        })
    }
}

impl Default for ChartColors {
    fn default() -> Self {
        let hover = Color32::from_rgb(0x76, 0x39, 0xe9);
        Self {
            line: Color32::BLACK,
            marker: Color32::from_rgb(0x10, 0x4e, 0x8b),
            hover,
            hover_highlight: lighten(hover, 0.25),
        }
    }
}
