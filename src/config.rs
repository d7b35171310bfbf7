//! Server configuration.
//!
//! Loaded from a YAML file when one exists, with every field optional
//! and falling back to built-in defaults. CLI flags override the file.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_BIND: &str = "127.0.0.1";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub bind: Option<String>,
    pub port: Option<u16>,
    pub database_path: Option<PathBuf>,
}

/// Resolved configuration after merging file and defaults.
#[derive(Debug, Clone)]
pub struct Config {
    pub bind: String,
    pub port: u16,
    pub database_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
            port: DEFAULT_PORT,
            database_path: default_database_path(),
        }
    }
}

impl Config {
    /// Load configuration, merging an optional YAML file over defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("reading config file {}", path.display()))?;
                serde_yaml::from_str::<ConfigFile>(&text)
                    .with_context(|| format!("parsing config file {}", path.display()))?
            }
            None => match default_config_path() {
                Some(path) if path.exists() => {
                    let text = std::fs::read_to_string(&path)
                        .with_context(|| format!("reading config file {}", path.display()))?;
                    serde_yaml::from_str::<ConfigFile>(&text)
                        .with_context(|| format!("parsing config file {}", path.display()))?
                }
                _ => ConfigFile::default(),
            },
        };

        let defaults = Config::default();
        Ok(Config {
            bind: file.bind.unwrap_or(defaults.bind),
            port: file.port.unwrap_or(defaults.port),
            database_path: file.database_path.unwrap_or(defaults.database_path),
        })
    }
}

/// Default config file location: `~/.config/corkboard/config.yaml`.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("corkboard").join("config.yaml"))
}

/// Default database location: `~/.local/share/corkboard/corkboard.db`,
/// or the working directory when no data dir is available.
pub fn default_database_path() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("corkboard").join("corkboard.db"))
        .unwrap_or_else(|| PathBuf::from("corkboard.db"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let config = Config::load(None).unwrap();
        assert!(!config.bind.is_empty());
    }

    #[test]
    fn file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "port: 9000\n").unwrap();
        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.bind, DEFAULT_BIND);
    }
}
