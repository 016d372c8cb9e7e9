// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Runtime configuration loaded from TOML.
//!
//! Priority: explicit `--config` path > `TRAVELCRM_CONFIG` > user config
//! (`<config dir>/travelcrm/config.toml`) > defaults. `TRAVELCRM_DATA_DIR`
//! overrides the data directory of whichever file was loaded.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub const CONFIG_ENV: &str = "TRAVELCRM_CONFIG";
pub const DATA_DIR_ENV: &str = "TRAVELCRM_DATA_DIR";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding one JSON file per collection.
    pub data_dir: PathBuf,
    /// Default log level; `RUST_LOG` still takes precedence.
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: "info".to_string(),
        }
    }
}

/// `<data dir>/travelcrm`, or `./travelcrm-data` when the platform has none.
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|p| p.join("travelcrm"))
        .unwrap_or_else(|| PathBuf::from("travelcrm-data"))
}

impl Config {
    /// User-level config file location.
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("travelcrm").join("config.toml"))
    }

    /// Parse a config file. Unlike [`Config::load`], a missing or invalid file is an error.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        toml::from_str(&content).with_context(|| format!("Invalid config file {:?}", path))
    }

    /// Resolve the effective configuration.
    ///
    /// An explicitly requested file (argument or env var) must exist and parse;
    /// the user config file is optional.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let env_path = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
        let mut config = match explicit.map(Path::to_path_buf).or(env_path) {
            Some(path) => Self::from_file(&path)?,
            None => match Self::user_config_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                _ => Self::default(),
            },
        };

        if let Some(dir) = std::env::var_os(DATA_DIR_ENV)
            && !dir.is_empty()
        {
            config.data_dir = PathBuf::from(dir);
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn partial_file_keeps_defaults_for_missing_keys() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(&path, "log_level = \"debug\"\n").unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.data_dir, default_data_dir());
    }

    #[test]
    fn data_dir_is_read_from_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(&path, "data_dir = \"/srv/crm\"\n").unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/srv/crm"));
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn missing_or_invalid_explicit_file_is_an_error() {
        let tmp = TempDir::new().unwrap();
        assert!(Config::from_file(&tmp.path().join("nope.toml")).is_err());

        let bad = tmp.path().join("bad.toml");
        fs::write(&bad, "log_level = [").unwrap();
        assert!(Config::from_file(&bad).is_err());
    }

    #[test]
    fn config_serializes_back_to_toml() {
        let config = Config {
            data_dir: PathBuf::from("/tmp/crm"),
            log_level: "warn".into(),
        };
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }
}
