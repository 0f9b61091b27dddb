use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::error::{JotzError, Result};

const CONFIG_FILENAME: &str = "config.json";
const DEFAULT_DEBOUNCE_MS: u64 = 1000;
const DEFAULT_FILE_EXT: &str = ".md";

/// Configuration for jotz, stored as config.json in the data directory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JotzConfig {
    /// Idle time before a buffered edit is written back, in milliseconds
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// File extension for note body files (e.g., ".md", ".txt")
    #[serde(default = "default_file_ext")]
    pub file_ext: String,
}

fn default_debounce_ms() -> u64 {
    DEFAULT_DEBOUNCE_MS
}

fn default_file_ext() -> String {
    DEFAULT_FILE_EXT.to_string()
}

impl Default for JotzConfig {
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            file_ext: DEFAULT_FILE_EXT.to_string(),
        }
    }
}

impl JotzConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(JotzError::Io)?;
        let config: JotzConfig =
            serde_json::from_str(&content).map_err(JotzError::Serialization)?;
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir).map_err(JotzError::Io)?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self).map_err(JotzError::Serialization)?;
        fs::write(config_path, content).map_err(JotzError::Io)?;
        Ok(())
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Get the file extension (always starts with a dot)
    pub fn get_file_ext(&self) -> &str {
        &self.file_ext
    }

    /// Set the file extension (normalizes to start with a dot)
    pub fn set_file_ext(&mut self, ext: &str) {
        if ext.starts_with('.') {
            self.file_ext = ext.to_string();
        } else {
            self.file_ext = format!(".{}", ext);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = JotzConfig::default();
        assert_eq!(config.debounce_ms, 1000);
        assert_eq!(config.file_ext, ".md");
    }

    #[test]
    fn test_set_file_ext_normalizes() {
        let mut config = JotzConfig::default();
        config.set_file_ext("txt");
        assert_eq!(config.file_ext, ".txt");
        config.set_file_ext(".markdown");
        assert_eq!(config.file_ext, ".markdown");
    }

    #[test]
    fn test_load_missing_config() {
        let temp = TempDir::new().unwrap();
        let config = JotzConfig::load(temp.path().join("nope")).unwrap();
        assert_eq!(config, JotzConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let temp = TempDir::new().unwrap();

        let mut config = JotzConfig::default();
        config.debounce_ms = 250;
        config.set_file_ext(".txt");
        config.save(temp.path()).unwrap();

        let loaded = JotzConfig::load(temp.path()).unwrap();
        assert_eq!(loaded, config);
        assert_eq!(loaded.debounce(), Duration::from_millis(250));
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(CONFIG_FILENAME), r#"{"debounce_ms": 500}"#).unwrap();

        let loaded = JotzConfig::load(temp.path()).unwrap();
        assert_eq!(loaded.debounce_ms, 500);
        assert_eq!(loaded.file_ext, ".md");
    }
}
