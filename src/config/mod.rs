//! Configuration module

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::agent::AgentSettings;
use crate::core::fuzzy;

/// Directory holding config.toml and data.db
pub const APP_DIR: &str = ".pharmabot";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub agent: AgentConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StoreConfig {
    /// Explicit database file; overrides local/global discovery
    #[serde(default)]
    pub database: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Minimum fuzzy score (0-100) for a "did you mean" suggestion
    #[serde(default = "default_fuzzy_threshold")]
    pub fuzzy_threshold: u8,

    #[serde(default = "default_true")]
    pub suggest_on_miss: bool,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            fuzzy_threshold: default_fuzzy_threshold(),
            suggest_on_miss: true,
        }
    }
}

fn default_fuzzy_threshold() -> u8 {
    fuzzy::DEFAULT_THRESHOLD
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// "pretty" or "json"
    #[serde(default = "default_format")]
    pub format: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
        }
    }
}

fn default_format() -> String {
    "pretty".to_string()
}

impl Config {
    /// Load config from default locations
    pub fn load() -> Result<Self> {
        // Try local config first, then global
        if let Some(local) = Self::find_local_config() {
            return Self::load_from(&local);
        }

        if let Some(global) = Self::global_config_path() {
            if global.exists() {
                return Self::load_from(&global);
            }
        }

        Ok(Self::default())
    }

    /// Load from an explicit path if given, else from default locations
    pub fn load_with(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from(path),
            None => Self::load(),
        }
    }

    /// Load config from a specific file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Invalid config {}", path.display()))?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Save config to a file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn agent_settings(&self) -> AgentSettings {
        AgentSettings {
            fuzzy_threshold: self.agent.fuzzy_threshold.min(100),
            suggest_on_miss: self.agent.suggest_on_miss,
        }
    }

    /// Find local .pharmabot/config.toml walking up directories
    pub fn find_local_config() -> Option<PathBuf> {
        find_upwards("config.toml")
    }

    /// Find local .pharmabot/data.db walking up directories
    pub fn find_local_db() -> Option<PathBuf> {
        find_upwards("data.db")
    }

    /// Get global config path (~/.pharmabot/config.toml)
    pub fn global_config_path() -> Option<PathBuf> {
        home_dir().map(|h| h.join(APP_DIR).join("config.toml"))
    }

    /// Get global database path (~/.pharmabot/data.db)
    pub fn global_db_path() -> Option<PathBuf> {
        home_dir().map(|h| h.join(APP_DIR).join("data.db"))
    }

    /// Get database path with priority:
    /// 1. PHARMABOT_DATABASE env var
    /// 2. `[store].database` from config
    /// 3. Local .pharmabot/data.db (walking up from CWD)
    /// 4. Global ~/.pharmabot/data.db
    pub fn database_path(&self) -> PathBuf {
        if let Ok(env_path) = std::env::var("PHARMABOT_DATABASE") {
            return PathBuf::from(env_path);
        }

        if let Some(path) = &self.store.database {
            return path.clone();
        }

        if let Some(local_db) = Self::find_local_db() {
            return local_db;
        }

        // Local .pharmabot/ directory exists (even without data.db yet)
        if let Some(local_dir) = Self::find_local_config().and_then(|c| c.parent().map(Path::to_path_buf)) {
            return local_dir.join("data.db");
        }

        if let Some(global) = Self::global_db_path() {
            return global;
        }

        PathBuf::from(APP_DIR).join("data.db")
    }
}

/// User home directory
pub fn home_dir() -> Option<PathBuf> {
    directories::UserDirs::new().map(|u| u.home_dir().to_path_buf())
}

fn find_upwards(file: &str) -> Option<PathBuf> {
    let mut current = std::env::current_dir().ok()?;

    loop {
        let candidate = current.join(APP_DIR).join(file);
        if candidate.exists() {
            return Some(candidate);
        }

        if !current.pop() {
            break;
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_file() -> Result<()> {
        let config: Config = toml::from_str("")?;
        assert_eq!(config.agent.fuzzy_threshold, 60);
        assert!(config.agent.suggest_on_miss);
        assert_eq!(config.output.format, "pretty");
        assert!(config.store.database.is_none());
        Ok(())
    }

    #[test]
    fn test_partial_sections() -> Result<()> {
        let config: Config = toml::from_str(
            r#"
            [agent]
            fuzzy_threshold = 75

            [store]
            database = "/tmp/shop.db"
            "#,
        )?;
        assert_eq!(config.agent_settings().fuzzy_threshold, 75);
        assert!(config.agent_settings().suggest_on_miss);
        assert_eq!(config.store.database, Some(PathBuf::from("/tmp/shop.db")));
        Ok(())
    }

    #[test]
    fn test_save_and_reload() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join(APP_DIR).join("config.toml");

        let mut config = Config::default();
        config.agent.suggest_on_miss = false;
        config.save_to(&path)?;

        let loaded = Config::load_with(Some(&path))?;
        assert!(!loaded.agent.suggest_on_miss);
        Ok(())
    }
}
