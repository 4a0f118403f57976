//! Error types for Sparkle

use std::path::PathBuf;

use thiserror::Error;

/// Failure reported by a host generation callback
///
/// Widgets never surface this to the host: a failed generation is logged and
/// the widget returns to idle with its value unchanged.
#[derive(Error, Debug)]
pub enum GenerationError {
    /// The generation backend reported a failure
    #[error("generation failed: {0}")]
    Failed(String),

    /// The widget's pending request was dropped before the callback settled
    #[error("generation abandoned before completion")]
    Abandoned,

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl GenerationError {
    pub fn failed(reason: impl Into<String>) -> Self {
        GenerationError::Failed(reason.into())
    }
}

impl From<anyhow::Error> for GenerationError {
    fn from(err: anyhow::Error) -> Self {
        GenerationError::Other(err.to_string())
    }
}

/// Errors loading or validating a [`SparkleConfig`](crate::SparkleConfig)
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The config file could not be read
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The config text is not valid TOML for the schema
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A palette or glow color is not `#RRGGBB` / `#RRGGBBAA`
    #[error("invalid color {0:?}")]
    InvalidColor(String),

    /// The accent sweep needs at least two stops
    #[error("accent palette needs at least two colors, got {0}")]
    TooFewColors(usize),

    /// The per-frame rotation step is out of range
    #[error("accent step must be between 1 and 359 degrees, got {0}")]
    InvalidStep(u16),
}

/// Result type for Sparkle configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;
