//! Settings consulted when a split image does not override a value
//!
//! These are the defaults the user configures globally. A split image may pin
//! its own values through its filename; everything else falls back here.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::CompareError;

/// Global comparison defaults, usually loaded from the settings TOML file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Delay before splitting, in milliseconds
    pub default_delay_time: u64,
    /// Comparison method index used by images that don't pin one
    pub default_comparison_method: i64,
    /// Pause after splitting, in seconds
    pub default_pause_time: f64,
    /// Score a comparison must reach to count as a match
    pub default_similarity_threshold: f64,
    /// Maximum comparisons per second
    pub fps_limit: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_delay_time: 0,
            default_comparison_method: 0,
            default_pause_time: 10.0,
            default_similarity_threshold: 0.95,
            fps_limit: 60,
        }
    }
}

impl Settings {
    /// Parse settings from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }

    /// Load settings from a TOML file
    pub fn load(path: &Path) -> Result<Self, CompareError> {
        let content = std::fs::read_to_string(path).map_err(|source| CompareError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content).map_err(|source| CompareError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Resolve a per-image value: the image's own override wins, then an explicit
/// default from the caller, then the named settings field.
pub fn resolve<T>(image_value: Option<T>, default: Option<T>, fallback: T) -> T {
    image_value.or(default).unwrap_or(fallback)
}
