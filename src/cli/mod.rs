//! CLI module - Command definitions and handlers
//!
//! Every shop-scoped command authenticates first and hands only the
//! resulting shop id to the core.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::config::Config;

pub mod ask;
pub mod chat;
pub mod config;
pub mod init;
pub mod inventory;
pub mod register;
pub mod stats;
pub mod stock;
pub mod utils;

/// pharmabot - natural-language inventory for pharmacies
///
/// "Add 10 Aspirin to Shelf A", "Where is Crocin?", "list".
#[derive(Parser, Debug)]
#[command(name = "pharmabot")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file path
    #[arg(short, long, global = true, env = "PHARMABOT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format (overrides [output].format)
    #[arg(long, global = true, value_enum)]
    pub format: Option<OutputFormat>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a pharmabot directory (.pharmabot/)
    Init(init::InitArgs),

    /// Register a new shop with its admin user
    Register(register::RegisterArgs),

    /// Run one natural-language command
    Ask(ask::AskArgs),

    /// Interactive session: one command per line
    Chat(chat::ChatArgs),

    /// Apply a signed stock delta directly
    Stock(stock::StockArgs),

    /// Show the inventory table
    Inventory(inventory::InventoryArgs),

    /// Show shop statistics
    Stats(stats::StatsArgs),

    /// Get or set configuration
    Config(config::ConfigArgs),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Pretty,
    Json,
}

impl OutputFormat {
    /// The flag wins; otherwise `[output].format`, defaulting to pretty
    pub fn resolve(flag: Option<Self>, config: &Config) -> Self {
        flag.unwrap_or_else(|| match config.output.format.as_str() {
            "json" => OutputFormat::Json,
            _ => OutputFormat::Pretty,
        })
    }
}
