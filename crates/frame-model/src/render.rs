//! Render configuration snapshot consumed once per frame.
//!
//! The configuration collaborator owns and mutates this; the pipeline only
//! ever reads a snapshot, so every field has a safe default and
//! [`RenderConfiguration::sanitized`] repairs out-of-range values instead
//! of failing a frame.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::geometry::Size2D;

/// Upper bound for the zoom strength setting.
pub const MAX_ZOOM_STRENGTH: f64 = 4.0;

/// Errors from loading a render configuration document.
#[derive(Debug, thiserror::Error)]
pub enum RenderConfigError {
    #[error("failed to read render config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid render config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Layout, background, and zoom parameters for composition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfiguration {
    /// Output canvas size in pixels.
    pub canvas: CanvasSize,

    /// Gap between the canvas edge and the source card, in canvas pixels.
    pub padding: f64,

    /// Corner radius of the source card, in canvas pixels.
    pub corner_radius: f64,

    /// Blur radius of the drop shadow, in canvas pixels. Zero disables it.
    pub shadow_radius: f64,

    pub background: BackgroundSpec,

    pub cursor_highlight: CursorHighlight,

    pub zoom: ZoomSettings,
}

/// Canvas pixel dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanvasSize {
    pub width: u32,
    pub height: u32,
}

impl CanvasSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn to_size(self) -> Size2D {
        Size2D::from_pixels(self.width, self.height)
    }
}

/// How the canvas behind the source card is filled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BackgroundSpec {
    Solid { color: Rgba8 },
    /// Two-stop linear gradient from the top-left to the bottom-right corner.
    Gradient { start: Rgba8, end: Rgba8 },
    /// Image scaled to fill the canvas and center-cropped.
    Image { path: PathBuf },
}

/// Radial halo drawn under the live cursor position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CursorHighlight {
    pub enabled: bool,
    /// Halo radius in canvas pixels.
    pub radius: f64,
    /// Center color; alpha fades to zero at the radius.
    pub color: Rgba8,
}

/// Zoom behavior.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoomSettings {
    pub enabled: bool,
    pub mode: ZoomMode,
    /// Maximum zoom scale relative to the wide framing.
    pub strength: f64,
    /// Dwell delay before a stationary cursor triggers a zoom (seconds).
    pub idle_delay_secs: f64,
    /// Key code that triggers a zoom in manual mode (evdev code on Linux).
    pub trigger_key_code: u32,
}

/// Which gestures may trigger a zoom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoomMode {
    /// Left clicks and cursor dwell.
    #[default]
    Auto,
    /// Only the configured trigger key.
    Manual,
}

/// 8-bit straight-alpha color, serialized as `#RRGGBB` or `#RRGGBBAA`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const BLACK: Rgba8 = Rgba8::new(0, 0, 0, 255);
    pub const WHITE: Rgba8 = Rgba8::new(255, 255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Parse `#RRGGBB` or `#RRGGBBAA` (leading `#` optional).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim().trim_start_matches('#');
        if !(hex.len() == 6 || hex.len() == 8) || !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        let a = if hex.len() == 8 { channel(6)? } else { 255 };
        Some(Self::new(channel(0)?, channel(2)?, channel(4)?, a))
    }

    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl fmt::Display for Rgba8 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{:02x}{:02x}{:02x}{:02x}",
            self.r, self.g, self.b, self.a
        )
    }
}

impl TryFrom<String> for Rgba8 {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Rgba8::from_hex(&value).ok_or_else(|| format!("invalid color '{value}'"))
    }
}

impl From<Rgba8> for String {
    fn from(value: Rgba8) -> Self {
        value.to_string()
    }
}

impl Default for RenderConfiguration {
    fn default() -> Self {
        Self {
            canvas: CanvasSize::new(1920, 1080),
            padding: 50.0,
            corner_radius: 12.0,
            shadow_radius: 24.0,
            background: BackgroundSpec::default(),
            cursor_highlight: CursorHighlight::default(),
            zoom: ZoomSettings::default(),
        }
    }
}

impl Default for BackgroundSpec {
    fn default() -> Self {
        Self::Gradient {
            start: Rgba8::opaque(0x4f, 0x46, 0xe5),
            end: Rgba8::opaque(0xdb, 0x27, 0x77),
        }
    }
}

impl Default for CursorHighlight {
    fn default() -> Self {
        Self {
            enabled: false,
            radius: 36.0,
            color: Rgba8::new(255, 214, 10, 110),
        }
    }
}

impl Default for ZoomSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            mode: ZoomMode::Auto,
            strength: 1.25,
            idle_delay_secs: 0.7,
            trigger_key_code: 66, // KEY_F8
        }
    }
}

impl RenderConfiguration {
    /// Load a configuration document; missing fields take defaults.
    pub fn load(path: &Path) -> Result<Self, RenderConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| RenderConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self =
            serde_json::from_str(&content).map_err(|source| RenderConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(config.sanitized())
    }

    /// A copy with every numeric field forced into its valid range.
    pub fn sanitized(&self) -> Self {
        let mut out = self.clone();
        out.canvas.width = out.canvas.width.max(1);
        out.canvas.height = out.canvas.height.max(1);
        out.padding = non_negative(out.padding);
        out.corner_radius = non_negative(out.corner_radius);
        out.shadow_radius = non_negative(out.shadow_radius);
        out.cursor_highlight.radius = non_negative(out.cursor_highlight.radius);
        out.zoom.strength = if out.zoom.strength.is_finite() {
            out.zoom.strength.clamp(1.0, MAX_ZOOM_STRENGTH)
        } else {
            ZoomSettings::default().strength
        };
        out.zoom.idle_delay_secs = if out.zoom.idle_delay_secs.is_finite() {
            out.zoom.idle_delay_secs.max(0.0)
        } else {
            ZoomSettings::default().idle_delay_secs
        };
        out
    }
}

fn non_negative(value: f64) -> f64 {
    if value.is_finite() {
        value.max(0.0)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_hex_roundtrip() {
        let c = Rgba8::from_hex("#1e1e2e").unwrap();
        assert_eq!(c, Rgba8::opaque(0x1e, 0x1e, 0x2e));
        assert_eq!(c.to_string(), "#1e1e2eff");
        assert_eq!(Rgba8::from_hex("ff000080").unwrap().a, 0x80);
        assert!(Rgba8::from_hex("#12345").is_none());
        assert!(Rgba8::from_hex("#zzzzzz").is_none());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let json = r##"{
            "padding": 80,
            "background": {"kind": "solid", "color": "#101010"},
            "zoom": {"mode": "manual", "trigger_key_code": 30}
        }"##;
        let config: RenderConfiguration = serde_json::from_str(json).unwrap();
        assert_eq!(config.padding, 80.0);
        assert_eq!(config.canvas, CanvasSize::new(1920, 1080));
        assert_eq!(
            config.background,
            BackgroundSpec::Solid {
                color: Rgba8::opaque(0x10, 0x10, 0x10)
            }
        );
        assert_eq!(config.zoom.mode, ZoomMode::Manual);
        assert_eq!(config.zoom.trigger_key_code, 30);
        assert!((config.zoom.idle_delay_secs - 0.7).abs() < 1e-12);
    }

    #[test]
    fn test_invalid_color_is_a_parse_error() {
        let json = r#"{"background": {"kind": "solid", "color": "blue"}}"#;
        assert!(serde_json::from_str::<RenderConfiguration>(json).is_err());
    }

    #[test]
    fn test_sanitized_repairs_out_of_range_values() {
        let mut config = RenderConfiguration::default();
        config.canvas = CanvasSize::new(0, 0);
        config.padding = -4.0;
        config.shadow_radius = f64::NAN;
        config.zoom.strength = 40.0;
        config.zoom.idle_delay_secs = -1.0;

        let fixed = config.sanitized();
        assert_eq!(fixed.canvas, CanvasSize::new(1, 1));
        assert_eq!(fixed.padding, 0.0);
        assert_eq!(fixed.shadow_radius, 0.0);
        assert_eq!(fixed.zoom.strength, MAX_ZOOM_STRENGTH);
        assert_eq!(fixed.zoom.idle_delay_secs, 0.0);
    }

    #[test]
    fn test_default_document_roundtrips() {
        let config = RenderConfiguration::default();
        let json = serde_json::to_string_pretty(&config).unwrap();
        let parsed: RenderConfiguration = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }
}
