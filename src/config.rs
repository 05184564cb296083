//! Engine configuration

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Configuration for gesture recognition, immutable per engine instance
///
/// Distances are in the input surface's units, delays in engine-clock
/// milliseconds. The tap and jitter tolerances are fixed constants of the
/// engine, not configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Minimum axis displacement to classify a swipe
    pub swipe_threshold: f64,

    /// Reserved for two-contact pinch support, unused by current logic
    pub pinch_threshold: f64,

    /// Delay before long-press fires (ms)
    pub long_press_delay_ms: u64,

    /// Maximum gap between two contact starts to count as a double-tap (ms)
    pub double_tap_delay_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            swipe_threshold: 50.0,
            pinch_threshold: 0.1,
            long_press_delay_ms: 500,
            double_tap_delay_ms: 300,
        }
    }
}

/// Failure to load a configuration file
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl EngineConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_documented_values() {
        let config = EngineConfig::default();
        assert_eq!(config.swipe_threshold, 50.0);
        assert_eq!(config.pinch_threshold, 0.1);
        assert_eq!(config.long_press_delay_ms, 500);
        assert_eq!(config.double_tap_delay_ms, 300);
    }

    #[test]
    fn test_partial_toml_overrides_defaults() {
        let config: EngineConfig =
            toml::from_str("swipe_threshold = 80.0\nlong_press_delay_ms = 700\n").unwrap();
        assert_eq!(config.swipe_threshold, 80.0);
        assert_eq!(config.long_press_delay_ms, 700);
        assert_eq!(config.double_tap_delay_ms, 300);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let err = EngineConfig::load(Path::new("/nonexistent/swish.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
