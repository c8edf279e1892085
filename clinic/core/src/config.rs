//! TOML Configuration File Support
//!
//! Centralized configuration loading for the Clinic, supporting a TOML file
//! at `~/.config/ayurclinic/clinic.toml`.
//!
//! # Configuration Priority
//!
//! Values are loaded with the following priority (highest first):
//! 1. Environment variables (`CLINIC_*`)
//! 2. TOML configuration file
//! 3. Default values
//!
//! The defaults reproduce the demo's fixed timings (composing delay
//! 1000-3000 ms, carousel period 4000 ms); the file exists as plumbing for
//! deployments, not as a way to change demo behavior.
//!
//! # Example Configuration
//!
//! ```toml
//! [chat]
//! composing_delay_min_ms = 1000
//! composing_delay_max_ms = 3000
//! max_transcript_entries = 200
//!
//! [decor]
//! carousel_interval_ms = 4000
//! carousel_slide_count = 3
//! particle_count = 20
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::clinic::ClinicConfig;

/// Errors that can occur when loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the config file
    #[error("failed to read config file at {path}: {source}")]
    ReadError {
        /// The path that was attempted
        path: PathBuf,
        /// The underlying IO error
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("failed to parse TOML config: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Chat section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatToml {
    /// Lower bound of the composing delay, inclusive (ms)
    pub composing_delay_min_ms: Option<u64>,
    /// Upper bound of the composing delay, exclusive (ms)
    pub composing_delay_max_ms: Option<u64>,
    /// Maximum chat transcript entries to keep
    pub max_transcript_entries: Option<usize>,
}

/// Decoration section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DecorToml {
    /// Carousel auto-advance period (ms)
    pub carousel_interval_ms: Option<u64>,
    /// Number of carousel slides
    pub carousel_slide_count: Option<usize>,
    /// Number of decorative particles
    pub particle_count: Option<usize>,
}

/// Top-level TOML configuration structure
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClinicToml {
    /// Chat configuration section
    pub chat: ChatToml,
    /// Decoration configuration section
    pub decor: DecorToml,
}

impl ClinicToml {
    /// Overlay the file's values onto a config
    fn apply_to(&self, config: &mut ClinicConfig) {
        if let Some(v) = self.chat.composing_delay_min_ms {
            config.composing_delay_min_ms = v;
        }
        if let Some(v) = self.chat.composing_delay_max_ms {
            config.composing_delay_max_ms = v;
        }
        if let Some(v) = self.chat.max_transcript_entries {
            config.max_transcript_entries = v;
        }
        if let Some(v) = self.decor.carousel_interval_ms {
            config.carousel_interval_ms = v;
        }
        if let Some(v) = self.decor.carousel_slide_count {
            config.carousel_slide_count = v;
        }
        if let Some(v) = self.decor.particle_count {
            config.particle_count = v;
        }
    }
}

/// The default config file path (`~/.config/ayurclinic/clinic.toml`)
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("ayurclinic").join("clinic.toml"))
}

/// Parse a TOML configuration file
///
/// # Errors
///
/// Returns [`ConfigError`] when the file cannot be read or parsed.
pub fn load_config_from_path(path: &Path) -> Result<ClinicToml, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadError {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(toml::from_str(&content)?)
}

/// Load the effective configuration: defaults, then file, then environment
///
/// A missing config file is not an error; an unreadable or malformed one is
/// logged and skipped so a bad file never takes the app down.
#[must_use]
pub fn load_config() -> ClinicConfig {
    let mut config = ClinicConfig::default();

    if let Some(path) = default_config_path() {
        if path.exists() {
            match load_config_from_path(&path) {
                Ok(file) => file.apply_to(&mut config),
                Err(err) => {
                    tracing::warn!(path = %path.display(), "ignoring config file: {err}");
                }
            }
        }
    }

    apply_env(&mut config);
    config
}

/// Overlay `CLINIC_*` environment variables onto a config
fn apply_env(config: &mut ClinicConfig) {
    let env = ClinicConfig::from_env();
    let defaults = ClinicConfig::default();

    // from_env falls back to defaults, so only values that differ from the
    // defaults were actually set in the environment
    if env.composing_delay_min_ms != defaults.composing_delay_min_ms {
        config.composing_delay_min_ms = env.composing_delay_min_ms;
    }
    if env.composing_delay_max_ms != defaults.composing_delay_max_ms {
        config.composing_delay_max_ms = env.composing_delay_max_ms;
    }
    if env.carousel_interval_ms != defaults.carousel_interval_ms {
        config.carousel_interval_ms = env.carousel_interval_ms;
    }
    if env.carousel_slide_count != defaults.carousel_slide_count {
        config.carousel_slide_count = env.carousel_slide_count;
    }
    if env.particle_count != defaults.particle_count {
        config.particle_count = env.particle_count;
    }
    if env.max_transcript_entries != defaults.max_transcript_entries {
        config.max_transcript_entries = env.max_transcript_entries;
    }
}
