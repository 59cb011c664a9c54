//! Configuration for the gesture lock.

use crate::acquisition::{AcquisitionSettings, SAMPLE_INTERVAL};
use crate::core::decision::{DecisionPolicy, DTW_THRESHOLD, MIN_LENGTH};
use crate::core::signature::MAX_SIZE;
use crate::core::smoothing::{SmoothingMode, WINDOW_SIZE};
use crate::sensor::types::NORMALIZE_FACTOR;
use crate::storage::{encoded_len, DEFAULT_BASE_ADDR, DEFAULT_MEDIUM_SIZE};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default delay before a button press is re-checked.
pub const DEBOUNCE: Duration = Duration::from_millis(5);

/// Main configuration for the gesture lock.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// DTW distance below which an attempt unlocks
    pub dtw_threshold: f32,

    /// Minimum number of attempt samples
    pub min_length: usize,

    /// Moving-average window
    pub window_size: usize,

    /// Whether smoothing keeps or drops the unsmoothed tail
    pub smoothing_mode: SmoothingMode,

    /// Divisor applied to acceleration magnitudes
    pub normalize_factor: f32,

    /// Interval between samples
    #[serde(with = "millis_serde")]
    pub sample_interval: Duration,

    /// Delay before a button press is confirmed
    #[serde(with = "millis_serde")]
    pub debounce: Duration,

    /// Byte address of the reference signature on the medium
    pub base_addr: usize,

    /// Size of the persistent medium image in bytes
    pub medium_size: usize,

    /// Path for the medium image and audit log
    pub data_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("gesture-lock");

        Self {
            dtw_threshold: DTW_THRESHOLD,
            min_length: MIN_LENGTH,
            window_size: WINDOW_SIZE,
            smoothing_mode: SmoothingMode::default(),
            normalize_factor: NORMALIZE_FACTOR,
            sample_interval: SAMPLE_INTERVAL,
            debounce: DEBOUNCE,
            base_addr: DEFAULT_BASE_ADDR,
            medium_size: DEFAULT_MEDIUM_SIZE,
            data_path: data_dir,
        }
    }
}

impl Config {
    /// Load configuration from the default location.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from `config_path`, or defaults if it is missing.
    pub fn load_from(config_path: &Path) -> Result<Self, ConfigError> {
        if config_path.exists() {
            let content = std::fs::read_to_string(config_path)
                .map_err(|e| ConfigError::IoError(e.to_string()))?;
            let config: Config = serde_json::from_str(&content)
                .map_err(|e| ConfigError::ParseError(e.to_string()))?;
            config.validate()?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::config_path())
    }

    /// Save configuration to `config_path`.
    pub fn save_to(&self, config_path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::IoError(e.to_string()))?;
        }

        let content = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializeError(e.to_string()))?;

        std::fs::write(config_path, content).map_err(|e| ConfigError::IoError(e.to_string()))?;

        Ok(())
    }

    /// Get the path to the configuration file.
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("gesture-lock")
            .join("config.json")
    }

    /// Ensure the data directory exists.
    pub fn ensure_directories(&self) -> Result<(), ConfigError> {
        std::fs::create_dir_all(&self.data_path)
            .map_err(|e| ConfigError::IoError(e.to_string()))?;
        Ok(())
    }

    /// Path of the persistent medium image.
    pub fn medium_path(&self) -> PathBuf {
        self.data_path.join("eeprom.bin")
    }

    /// Path of the persisted audit counters.
    pub fn audit_path(&self) -> PathBuf {
        self.data_path.join("audit.json")
    }

    /// Check that the values describe a usable lock.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window_size == 0 || self.window_size > MAX_SIZE {
            return Err(ConfigError::Invalid(format!(
                "window_size must be in 1..={MAX_SIZE}, got {}",
                self.window_size
            )));
        }
        if self.normalize_factor.is_nan() || self.normalize_factor <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "normalize_factor must be positive, got {}",
                self.normalize_factor
            )));
        }
        if self.dtw_threshold.is_nan() {
            return Err(ConfigError::Invalid("dtw_threshold is NaN".to_string()));
        }
        let needed = self.base_addr.saturating_add(encoded_len(MAX_SIZE));
        if needed > self.medium_size {
            return Err(ConfigError::Invalid(format!(
                "a full signature at address {} needs {needed} bytes, medium has {}",
                self.base_addr, self.medium_size
            )));
        }
        Ok(())
    }

    /// Runtime settings derived from this configuration.
    pub fn settings(&self) -> LockSettings {
        LockSettings {
            policy: DecisionPolicy::new(self.dtw_threshold, self.min_length),
            acquisition: AcquisitionSettings {
                normalize_factor: self.normalize_factor,
                sample_interval: self.sample_interval,
            },
            window_size: self.window_size,
            smoothing_mode: self.smoothing_mode,
            debounce: self.debounce,
        }
    }
}

/// Everything the lock needs at runtime, independent of file locations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LockSettings {
    pub policy: DecisionPolicy,
    pub acquisition: AcquisitionSettings,
    pub window_size: usize,
    pub smoothing_mode: SmoothingMode,
    pub debounce: Duration,
}

impl Default for LockSettings {
    fn default() -> Self {
        Self {
            policy: DecisionPolicy::default(),
            acquisition: AcquisitionSettings::default(),
            window_size: WINDOW_SIZE,
            smoothing_mode: SmoothingMode::default(),
            debounce: DEBOUNCE,
        }
    }
}

/// Configuration errors.
#[derive(Debug)]
pub enum ConfigError {
    IoError(String),
    ParseError(String),
    SerializeError(String),
    Invalid(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError(e) => write!(f, "IO error: {e}"),
            ConfigError::ParseError(e) => write!(f, "Parse error: {e}"),
            ConfigError::SerializeError(e) => write!(f, "Serialize error: {e}"),
            ConfigError::Invalid(e) => write!(f, "Invalid configuration: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Serde support for Duration as whole milliseconds.
mod millis_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        (duration.as_millis() as u64).serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.dtw_threshold, 8.0);
        assert_eq!(config.min_length, 5);
        assert_eq!(config.window_size, 5);
        assert_eq!(config.sample_interval, Duration::from_millis(30));
        assert_eq!(config.smoothing_mode, SmoothingMode::TailPreserving);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_json_round_trip() {
        let config = Config {
            sample_interval: Duration::from_millis(20),
            smoothing_mode: SmoothingMode::Truncating,
            ..Config::default()
        };

        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"sample_interval\":20"));
        assert!(json.contains("\"truncating\""));

        let back: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(back.sample_interval, Duration::from_millis(20));
        assert_eq!(back.smoothing_mode, SmoothingMode::Truncating);
    }

    #[test]
    fn test_save_then_load() {
        let path = std::env::temp_dir()
            .join("gesture-lock-test")
            .join(format!("config-{}.json", uuid::Uuid::new_v4()));

        assert_eq!(Config::load_from(&path).unwrap().dtw_threshold, 8.0);

        let config = Config {
            dtw_threshold: 6.5,
            min_length: 7,
            ..Config::default()
        };
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.dtw_threshold, 6.5);
        assert_eq!(loaded.min_length, 7);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_invalid_file_rejected() {
        let path = std::env::temp_dir()
            .join("gesture-lock-test")
            .join(format!("config-{}.json", uuid::Uuid::new_v4()));

        Config {
            window_size: 0,
            ..Config::default()
        }
        .save_to(&path)
        .unwrap();

        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::Invalid(_))
        ));

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let zero_window = Config {
            window_size: 0,
            ..Config::default()
        };
        assert!(matches!(zero_window.validate(), Err(ConfigError::Invalid(_))));

        let bad_factor = Config {
            normalize_factor: 0.0,
            ..Config::default()
        };
        assert!(bad_factor.validate().is_err());

        let no_room = Config {
            base_addr: DEFAULT_MEDIUM_SIZE - 8,
            ..Config::default()
        };
        assert!(no_room.validate().is_err());
    }

    #[test]
    fn test_settings_carry_policy() {
        let config = Config {
            dtw_threshold: 4.5,
            min_length: 12,
            ..Config::default()
        };
        let settings = config.settings();
        assert_eq!(settings.policy.threshold, 4.5);
        assert_eq!(settings.policy.min_length, 12);
    }
}
