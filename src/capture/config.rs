//! Runtime configuration.
//!
//! Detection tolerances and classification margins are compile-time
//! constants in their modules; this file only carries the knobs an
//! operator may reasonably change between machines: poll cadence, pixel
//! density, click emulation, and the corpus directory.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Capture loop configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureConfig {
    /// Delay between loop ticks, in milliseconds.
    pub poll_ms: u64,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self { poll_ms: 50 }
    }
}

/// Action translation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActConfig {
    /// Emit two clicks per queens target instead of one.
    pub double_click: bool,
    /// Halve captured coordinates before clicking. Required when the
    /// capture is taken at twice the display's logical pixel density.
    pub hidpi: bool,
    /// Pixel inset from a cell's origin for queens targets.
    pub click_inset: i32,
}

impl Default for ActConfig {
    fn default() -> Self {
        Self {
            double_click: true,
            hidpi: false,
            click_inset: 10,
        }
    }
}

/// Solution corpus storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorpusConfig {
    /// Directory holding `queens_<N>.txt` and `duet.bin`.
    pub dir: PathBuf,
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
        }
    }
}

/// Full configuration file format.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FileConfig {
    /// Capture loop settings.
    #[serde(default)]
    pub capture: CaptureConfig,
    /// Click emulation settings.
    #[serde(default)]
    pub act: ActConfig,
    /// Corpus storage settings.
    #[serde(default)]
    pub corpus: CorpusConfig,
}

/// Configuration validation and loading errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    /// The poll interval is zero.
    #[error("poll interval must be non-zero")]
    InvalidPollInterval,
    /// The config file could not be read.
    #[error("failed to read config file: {0}")]
    FileReadError(String),
    /// The config file could not be parsed as TOML.
    #[error("failed to parse config file: {0}")]
    ParseError(String),
}

impl FileConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::FileReadError(e.to_string()))?;
        let config: FileConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capture.poll_ms == 0 {
            return Err(ConfigError::InvalidPollInterval);
        }
        Ok(())
    }
}
