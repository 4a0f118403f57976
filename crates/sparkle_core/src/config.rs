//! Sparkle configuration
//!
//! Every field has a default, so an empty file (or no file at all) yields the
//! stock behavior: a 2° rotation per frame over the eight-stop sparkle
//! palette, and a 200 ms delay before a blurred selector closes.
//!
//! ```toml
//! [accent]
//! step_degrees = 3
//! colors = ["#BC82F3", "#8D9FFF", "#BC82F3"]
//!
//! [[accent.glow]]
//! color = "#BC82F359"
//! blur_radius = 8.0
//!
//! [selector]
//! blur_close_delay_ms = 150
//! ```

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::error::{ConfigError, Result};

/// Default accent sweep, first and last stops equal so the sweep is seamless
pub const SPARKLE_PALETTE: [u32; 8] = [
    0xBC82F3, 0xF5B9EA, 0x8D9FFF, 0xAA6EEE, 0xFF6778, 0xFFBA71, 0xC686FF, 0xBC82F3,
];

/// Default glow shadows as `(0xRRGGBBAA, blur_radius)`
pub const SPARKLE_GLOW: [(u32, f32); 2] = [(0xBC82F359, 8.0), (0x8D9FFF26, 20.0)];

/// Top-level configuration shared by all widget variants
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SparkleConfig {
    pub accent: AccentConfig,
    pub selector: SelectorConfig,
}

impl SparkleConfig {
    /// Parse and validate configuration from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: SparkleConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!("Loaded sparkle config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.accent.validate()
    }
}

/// Progress accent settings
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AccentConfig {
    /// Degrees the sweep advances per frame
    pub step_degrees: u16,
    /// Gradient stops around the sweep, `#RRGGBB` or `#RRGGBBAA`
    pub colors: Vec<String>,
    /// Glow shadows drawn around the accented border
    pub glow: Vec<GlowConfig>,
}

impl Default for AccentConfig {
    fn default() -> Self {
        Self {
            step_degrees: 2,
            colors: SPARKLE_PALETTE
                .iter()
                .map(|hex| format!("#{:06X}", hex))
                .collect(),
            glow: SPARKLE_GLOW
                .iter()
                .map(|&(hex, blur_radius)| GlowConfig {
                    color: format!("#{:08X}", hex),
                    blur_radius,
                })
                .collect(),
        }
    }
}

impl AccentConfig {
    pub fn validate(&self) -> Result<()> {
        if !(1..360).contains(&self.step_degrees) {
            return Err(ConfigError::InvalidStep(self.step_degrees));
        }
        if self.colors.len() < 2 {
            return Err(ConfigError::TooFewColors(self.colors.len()));
        }
        self.palette()?;
        self.glow_colors()?;
        Ok(())
    }

    /// Parsed gradient stops
    pub fn palette(&self) -> Result<Vec<Color>> {
        self.colors.iter().map(String::as_str).map(parse_color).collect()
    }

    /// Parsed glow shadows as `(color, blur_radius)` pairs
    pub fn glow_colors(&self) -> Result<Vec<(Color, f32)>> {
        self.glow
            .iter()
            .map(|g| parse_color(&g.color).map(|color| (color, g.blur_radius)))
            .collect()
    }
}

/// One glow shadow around the accented border
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct GlowConfig {
    pub color: String,
    pub blur_radius: f32,
}

/// Selector (combobox) settings
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SelectorConfig {
    /// Delay between losing focus and closing the dropdown
    pub blur_close_delay_ms: u64,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            blur_close_delay_ms: 200,
        }
    }
}

impl SelectorConfig {
    pub fn blur_close_delay(&self) -> Duration {
        Duration::from_millis(self.blur_close_delay_ms)
    }
}

fn parse_color(text: &str) -> Result<Color> {
    Color::parse_hex(text).ok_or_else(|| ConfigError::InvalidColor(text.to_string()))
}
