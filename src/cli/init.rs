//! `pharmabot init` command
//!
//! Initializes a new pharmabot directory.
//!
//! # Usage
//! ```bash
//! pharmabot init                    # Initialize in current directory
//! pharmabot init /path/to/pharmacy  # Initialize in specific path
//! pharmabot init --global           # Initialize global ~/.pharmabot
//! ```

use anyhow::{bail, Result};
use clap::Args;
use std::fs;
use std::path::PathBuf;

use crate::config::{home_dir, Config, APP_DIR};
use crate::core::store::Store;

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path to initialize (default: current directory)
    pub path: Option<PathBuf>,

    /// Initialize global config (~/.pharmabot)
    #[arg(long)]
    pub global: bool,

    /// Force re-initialization
    #[arg(short, long)]
    pub force: bool,
}

pub fn run(args: InitArgs) -> Result<()> {
    // 1. Determine target path
    let base_path = if args.global {
        home_dir().unwrap_or_else(|| PathBuf::from("."))
    } else {
        args.path.unwrap_or_else(|| PathBuf::from("."))
    };

    let app_dir = base_path.join(APP_DIR);

    // 2. Check if already initialized
    if app_dir.exists() && !args.force {
        bail!(
            "Directory {} is already initialized. Use --force to reinitialize.",
            base_path.display()
        );
    }

    println!("🚀 Initializing pharmabot in: {}", base_path.display());

    // 3. Config file (existing stock data is kept on --force)
    fs::create_dir_all(&app_dir)?;
    let config_path = app_dir.join("config.toml");
    Config::default().save_to(&config_path)?;

    // 4. Database with schema
    let db_path = app_dir.join("data.db");
    let _store = Store::open(&db_path)?;

    println!("\n✅ Initialized pharmabot");
    println!("   Config: {}", config_path.display());
    println!("   Database: {}", db_path.display());
    println!("\nNext steps:");
    println!("  pharmabot register \"My Pharmacy\" admin");
    println!("  pharmabot ask --user admin \"Add 10 Aspirin to Shelf A\"");
    println!("  pharmabot chat --user admin");

    Ok(())
}
