//! `pharmabot config` command
//!
//! Get or set configuration values.
//!
//! # Usage
//! ```bash
//! pharmabot config                           # Show all config
//! pharmabot config agent.fuzzy_threshold     # Get specific value
//! pharmabot config agent.fuzzy_threshold 70  # Set value
//! pharmabot config store.database /srv/pharmabot.db --global
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Args;
use toml_edit::{value, DocumentMut};

use crate::config::{home_dir, Config, APP_DIR};

#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Config key (e.g., agent.fuzzy_threshold, output.format)
    pub key: Option<String>,

    /// Value to set
    pub value: Option<String>,

    /// List all config values
    #[arg(long)]
    pub list: bool,

    /// Show config file path
    #[arg(long)]
    pub path: bool,

    /// Use global config (~/.pharmabot/config.toml) instead of local
    #[arg(short, long)]
    pub global: bool,
}

fn get_config_path(global: bool) -> PathBuf {
    if global {
        home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
            .join("config.toml")
    } else {
        Config::find_local_config().unwrap_or_else(|| PathBuf::from(APP_DIR).join("config.toml"))
    }
}

pub fn run(args: ConfigArgs) -> Result<()> {
    let config_path = get_config_path(args.global);

    if args.path {
        println!("Global: {}", get_config_path(true).display());
        println!("Local:  {}", get_config_path(false).display());
        println!();
        if config_path.exists() {
            println!("✓ Active: {}", config_path.display());
        } else {
            println!("⚠ No config file found at {}", config_path.display());
        }
        return Ok(());
    }

    if args.list || (args.key.is_none() && args.value.is_none()) {
        if config_path.exists() {
            let content = fs::read_to_string(&config_path)?;
            println!("📋 Configuration ({}):\n", config_path.display());
            println!("{}", content);
        } else {
            println!("📋 No config file at {}", config_path.display());
            println!();
            println!("Create one with:");
            println!("  pharmabot init");
            println!("  pharmabot config agent.fuzzy_threshold 70");
        }
        return Ok(());
    }

    if let Some(key) = &args.key {
        if let Some(val) = &args.value {
            set_config_value(&config_path, key, val)?;
            println!("✅ Set {} = {} (in {})", key, val, config_path.display());
        } else {
            match get_config_value(&config_path, key)? {
                Some(v) => println!("{}", v),
                None => println!("(not set)"),
            }
        }
    }

    Ok(())
}

/// Set a nested config value using dot notation (e.g., "agent.fuzzy_threshold").
/// The edited file must still load as a [`Config`].
fn set_config_value(path: &Path, key: &str, val: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let content = if path.exists() {
        fs::read_to_string(path)?
    } else {
        String::new()
    };

    let mut doc: DocumentMut = content.parse().context("Failed to parse config.toml")?;

    let parts: Vec<&str> = key.split('.').collect();
    match parts.as_slice() {
        [section, field] => {
            if doc.get(section).is_none() {
                doc[*section] = toml_edit::table();
            }
            doc[*section][*field] = value(parse_toml_value(val));
        }
        _ => bail!("Expected section.key, got: {}", key),
    }

    let updated = doc.to_string();
    toml::from_str::<Config>(&updated)
        .with_context(|| format!("Invalid value for {}: {}", key, val))?;

    fs::write(path, updated)?;
    Ok(())
}

/// Get a config value by dot notation key
fn get_config_value(path: &Path, key: &str) -> Result<Option<String>> {
    if !path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(path)?;
    let doc: toml::Table = content.parse().context("Failed to parse config.toml")?;

    let val = match key.split('.').collect::<Vec<_>>().as_slice() {
        [section, field] => doc.get(*section).and_then(|t| t.get(*field)),
        [top] => doc.get(*top),
        _ => None,
    };

    Ok(val.map(|v| match v {
        toml::Value::String(s) => s.clone(),
        other => other.to_string(),
    }))
}

/// Parse string value to appropriate TOML type
fn parse_toml_value(s: &str) -> toml_edit::Value {
    if let Ok(b) = s.parse::<bool>() {
        return b.into();
    }
    if let Ok(i) = s.parse::<i64>() {
        return i.into();
    }
    s.into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_then_get() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("config.toml");

        set_config_value(&path, "agent.fuzzy_threshold", "75")?;
        set_config_value(&path, "output.format", "json")?;

        assert_eq!(get_config_value(&path, "agent.fuzzy_threshold")?, Some("75".to_string()));
        assert_eq!(get_config_value(&path, "output.format")?, Some("json".to_string()));
        assert_eq!(get_config_value(&path, "agent.missing")?, None);

        let config = Config::load_from(&path)?;
        assert_eq!(config.agent.fuzzy_threshold, 75);
        Ok(())
    }

    #[test]
    fn test_set_rejects_bad_values() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("config.toml");

        assert!(set_config_value(&path, "agent.fuzzy_threshold", "lots").is_err());
        assert!(set_config_value(&path, "threshold", "1").is_err());
        assert!(!path.exists());
        Ok(())
    }
}
