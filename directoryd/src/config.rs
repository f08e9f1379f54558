//! Daemon configuration

use identity::AppInfo;
use serde::{Deserialize, Serialize};
use sim_network::SimNetworkConfig;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Daemon configuration
///
/// Loaded from a JSON file; every field is optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DaemonConfig {
    /// `tracing` filter directive, overridden by `RUST_LOG`
    pub log_filter: String,
    /// Simulated network settings
    pub network: SimNetworkConfig,
    /// Application used for requests that name none
    pub default_app: AppInfo,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            log_filter: "info".to_string(),
            network: SimNetworkConfig::default(),
            default_app: AppInfo::new("directoryd", "directoryd", "local"),
        }
    }
}

impl DaemonConfig {
    /// Loads configuration from a JSON file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_partial_config() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"log_filter": "debug", "network": {{"latency_ms": 3}}}}"#
        )
        .unwrap();

        let config = DaemonConfig::load(file.path()).unwrap();
        assert_eq!(config.log_filter, "debug");
        assert_eq!(config.network.latency_ms, 3);
        assert_eq!(config.network.failed_library_loads, 0);
        assert_eq!(config.default_app, DaemonConfig::default().default_app);
    }

    #[test]
    fn test_load_default_app() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"default_app": {{"id": "a1", "name": "Notes", "vendor": "me"}}}}"#
        )
        .unwrap();

        let config = DaemonConfig::load(file.path()).unwrap();
        assert_eq!(config.default_app.root_dir_name(), "Notes-Root-Dir");
        assert_eq!(config.log_filter, "info");
    }

    #[test]
    fn test_load_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        assert!(matches!(
            DaemonConfig::load(&missing),
            Err(ConfigError::Read { .. })
        ));

        let mut file = NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(matches!(
            DaemonConfig::load(file.path()),
            Err(ConfigError::Parse { .. })
        ));
    }
}
