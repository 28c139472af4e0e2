use std::env;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use self::import::ImportConfig;
use self::log::LogConfig;
use self::store::StoreConfig;

pub mod import;
pub mod log;
pub mod store;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub import: ImportConfig,
    pub store: StoreConfig,
    pub log: LogConfig,
}

impl Config {
    /// Configuration from the environment, falling back to defaults
    pub fn new() -> Self {
        Config {
            import: ImportConfig::new(),
            store: StoreConfig::new(),
            log: LogConfig::new(),
        }
    }

    /// Read a JSON config file. Keys it leaves out keep their environment
    /// or default values.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let file = File::open(path).map_err(|source| ConfigError::Open {
            path: path.display().to_string(),
            source,
        })?;
        let config = serde_json::from_reader(BufReader::new(file))?;
        Ok(config)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Cannot open config file {path}: {source}")]
    Open {
        path: String,
        source: std::io::Error,
    },

    #[error("Invalid config file: {0}")]
    Parse(#[from] serde_json::Error),
}

pub(crate) fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

pub(crate) fn env_flag(key: &str, default: bool) -> bool {
    env::var(key)
        .ok()
        .and_then(|v| match v.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Some(true),
            "0" | "false" | "no" | "off" => Some(false),
            _ => None,
        })
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("glosa.config.json");
        std::fs::write(&path, r#"{ "import": { "fail_fast": true } }"#).unwrap();

        let config = Config::load(&path).unwrap();
        let defaults = Config::new();

        assert!(config.import.fail_fast);
        assert_eq!(config.import.extension, defaults.import.extension);
        assert_eq!(config.store.path, defaults.store.path);
        assert_eq!(config.log.filter, defaults.log.filter);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Open { .. }));
    }

    #[test]
    fn test_load_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(Config::load(&path), Err(ConfigError::Parse(_))));
    }
}
