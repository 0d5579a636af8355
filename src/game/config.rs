use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::{ConfigError, Result};

/// Configuration for the game, fixed once a session is built
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Side length of the square grid
    pub grid_size: usize,
    /// How often the timer loop wakes up to poll the engine
    pub poll_interval_ms: u64,
    /// Minimum time between two snake moves
    pub move_interval_ms: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_size: 16,
            poll_interval_ms: 50,
            move_interval_ms: 300,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with custom grid size
    pub fn new(grid_size: usize) -> Self {
        Self {
            grid_size,
            ..Default::default()
        }
    }

    /// Create a small grid for testing
    pub fn small() -> Self {
        Self::new(8)
    }

    /// Load and validate a configuration from a JSON file
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let config = Self::read_json_file(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a JSON file without validating it; absent fields keep their defaults
    pub fn read_json_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    pub fn validate(&self) -> Result<()> {
        if self.grid_size < 2 {
            return Err(ConfigError::Validation(format!(
                "grid_size must be at least 2, got {}",
                self.grid_size
            )));
        }
        if i32::try_from(self.grid_size).is_err() {
            return Err(ConfigError::Validation(format!(
                "grid_size {} does not fit grid coordinates",
                self.grid_size
            )));
        }
        if self.poll_interval_ms == 0 || self.move_interval_ms == 0 {
            return Err(ConfigError::Validation(
                "intervals must be greater than zero".to_string(),
            ));
        }
        if self.poll_interval_ms > self.move_interval_ms {
            return Err(ConfigError::Validation(format!(
                "poll interval ({}ms) must not exceed move interval ({}ms)",
                self.poll_interval_ms, self.move_interval_ms
            )));
        }
        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn move_interval(&self) -> Duration {
        Duration::from_millis(self.move_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = GameConfig::default();
        assert_eq!(config.grid_size, 16);
        assert_eq!(config.poll_interval(), Duration::from_millis(50));
        assert_eq!(config.move_interval(), Duration::from_millis(300));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_custom_config() {
        let config = GameConfig::new(12);
        assert_eq!(config.grid_size, 12);
        assert_eq!(config.move_interval_ms, 300);
        assert!(GameConfig::small().validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        assert!(GameConfig::new(1).validate().is_err());

        let zero_poll = GameConfig {
            poll_interval_ms: 0,
            ..Default::default()
        };
        assert!(zero_poll.validate().is_err());

        let slow_poll = GameConfig {
            poll_interval_ms: 500,
            move_interval_ms: 300,
            ..Default::default()
        };
        assert!(matches!(
            slow_poll.validate(),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_load_partial_json() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{ "grid_size": 10, "move_interval_ms": 200 }}"#).unwrap();

        let config = GameConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.grid_size, 10);
        assert_eq!(config.move_interval_ms, 200);
        assert_eq!(config.poll_interval_ms, 50);
    }

    #[test]
    fn test_read_skips_validation() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{ "grid_size": 1 }}"#).unwrap();

        let config = GameConfig::read_json_file(file.path()).unwrap();
        assert_eq!(config.grid_size, 1);
        assert!(matches!(
            GameConfig::from_json_file(file.path()),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_load_invalid_json() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let err = GameConfig::from_json_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Serialization(_)));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = GameConfig::from_json_file(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
