//! Configuration management for pob CLI

use anyhow::{Context, Result};
use pob::trade::{TradeStatus, DEFAULT_LEAGUE};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const APP_DIR: &str = "pob-trade";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    /// Default trade league
    pub league: Option<String>,
    /// Default seller status for trade searches
    pub trade_status: Option<TradeStatus>,
    /// Saved builds database
    pub db_path: Option<PathBuf>,
}

impl Config {
    /// Get the path to the config file
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?
            .join(APP_DIR);

        Ok(config_dir.join("config.toml"))
    }

    /// Load configuration from file, or create default if it doesn't exist
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        toml::from_str(&contents).context("Failed to parse config file")
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory at {}", parent.display())
            })?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(path, contents)
            .with_context(|| format!("Failed to write config to {}", path.display()))?;

        Ok(())
    }

    /// Configured league, or the default one
    pub fn league(&self) -> &str {
        self.league.as_deref().unwrap_or(DEFAULT_LEAGUE)
    }

    pub fn trade_status(&self) -> TradeStatus {
        self.trade_status.unwrap_or_default()
    }

    /// Configured database path, or one in the user data directory
    pub fn db_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.db_path {
            return Ok(path.clone());
        }
        let data_dir = dirs::data_dir().context("Could not determine data directory")?;
        Ok(data_dir.join(APP_DIR).join(pob_builds::DEFAULT_DB_FILE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.league(), "Standard");
        assert_eq!(config.trade_status(), TradeStatus::Online);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = Config {
            league: Some("Hardcore".to_string()),
            trade_status: Some(TradeStatus::OnlineLeague),
            db_path: Some(PathBuf::from("/tmp/builds.db")),
        };
        config.save_to(&path).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.contains("trade_status = \"onlineleague\""));

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);
        assert_eq!(loaded.db_path().unwrap(), PathBuf::from("/tmp/builds.db"));
    }

    #[test]
    fn test_invalid_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "trade_status = \"sometimes\"").unwrap();
        assert!(Config::load_from(&path).is_err());
    }
}
