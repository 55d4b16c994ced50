//! CLI configuration

use std::fmt;
use std::path::PathBuf;

use anyhow::Context;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::output::OutputFormat;

/// Overrides the config file location
pub const CONFIG_ENV: &str = "LARDER_CONFIG";

/// Get default data directory
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("larder")
}

/// Location of `config.toml`
pub fn config_file_path() -> PathBuf {
    if let Some(path) = std::env::var_os(CONFIG_ENV) {
        return PathBuf::from(path);
    }
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("larder")
        .join("config.toml")
}

/// Storage engine behind the graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    #[default]
    Redb,
    Sqlite,
    Memory,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Redb => "redb",
            Self::Sqlite => "sqlite",
            Self::Memory => "memory",
        };
        f.write_str(name)
    }
}

/// Configuration for the CLI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub data_dir: PathBuf,
    pub backend: BackendKind,
    pub output: OutputFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            backend: BackendKind::default(),
            output: OutputFormat::Table,
        }
    }
}

impl Config {
    /// Load the config file, falling back to defaults when it is missing or unreadable
    pub fn load() -> Self {
        let path = config_file_path();
        match Self::load_from(&path) {
            Ok(Some(config)) => config,
            Ok(None) => Self::default(),
            Err(e) => {
                tracing::warn!("Ignoring config file {}: {:#}", path.display(), e);
                Self::default()
            }
        }
    }

    fn load_from(path: &std::path::Path) -> anyhow::Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config = toml::from_str(&content)?;
        Ok(Some(config))
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let path = config_file_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(&path, content).with_context(|| format!("writing {}", path.display()))?;
        tracing::debug!("Saved config to {}", path.display());
        Ok(())
    }

    pub fn keys() -> &'static [&'static str] {
        &["data_dir", "backend", "output"]
    }

    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "data_dir" => Some(self.data_dir.display().to_string()),
            "backend" => Some(self.backend.to_string()),
            "output" => Some(self.output.to_string()),
            _ => None,
        }
    }

    pub fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        match key {
            "data_dir" => self.data_dir = PathBuf::from(value),
            "backend" => {
                self.backend = BackendKind::from_str(value, true)
                    .map_err(|_| anyhow::anyhow!("Unknown backend '{}' (redb, sqlite, memory)", value))?
            }
            "output" => {
                self.output = OutputFormat::from_str(value, true)
                    .map_err(|_| anyhow::anyhow!("Unknown output format '{}' (table, json)", value))?
            }
            _ => anyhow::bail!(
                "Unknown config key: {}. Available keys: {}",
                key,
                Self::keys().join(", ")
            ),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_and_set() {
        let mut config = Config::default();
        config.set("backend", "SQLite").unwrap();
        config.set("output", "json").unwrap();
        config.set("data_dir", "/tmp/larder").unwrap();

        assert_eq!(config.get("backend").as_deref(), Some("sqlite"));
        assert_eq!(config.get("output").as_deref(), Some("json"));
        assert_eq!(config.get("data_dir").as_deref(), Some("/tmp/larder"));
        assert!(config.get("colour").is_none());

        assert!(config.set("backend", "postgres").is_err());
        assert!(config.set("colour", "red").is_err());
    }

    #[test]
    fn test_toml_round_trip_with_missing_keys() {
        let config: Config = toml::from_str("backend = \"memory\"").unwrap();
        assert_eq!(config.backend, BackendKind::Memory);
        assert_eq!(config.output, OutputFormat::Table);

        let text = toml::to_string_pretty(&config).unwrap();
        assert_eq!(toml::from_str::<Config>(&text).unwrap(), config);
    }
}
