//! pharmabot CLI - Entry point
//!
//! Usage: pharmabot <command> [options]

use std::path::Path;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use pharmabot::cli::{Cli, Commands, OutputFormat};
use pharmabot::config::Config;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so replies on stdout stay clean
    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();

    let config_path = cli.config.as_deref();
    let format = cli.format;

    match cli.command {
        Commands::Init(args) => pharmabot::cli::init::run(args),
        Commands::Config(args) => pharmabot::cli::config::run(args),
        Commands::Register(args) => {
            let (config, _) = load_config(config_path, format)?;
            pharmabot::cli::register::run(args, &config)
        }
        Commands::Ask(args) => {
            let (config, format) = load_config(config_path, format)?;
            pharmabot::cli::ask::run(args, &config, format)
        }
        Commands::Chat(args) => {
            let (config, format) = load_config(config_path, format)?;
            pharmabot::cli::chat::run(args, &config, format)
        }
        Commands::Stock(args) => {
            let (config, format) = load_config(config_path, format)?;
            pharmabot::cli::stock::run(args, &config, format)
        }
        Commands::Inventory(args) => {
            let (config, format) = load_config(config_path, format)?;
            pharmabot::cli::inventory::run(args, &config, format)
        }
        Commands::Stats(args) => {
            let (config, format) = load_config(config_path, format)?;
            pharmabot::cli::stats::execute(args, &config, format)
        }
    }
}

fn load_config(path: Option<&Path>, format: Option<OutputFormat>) -> Result<(Config, OutputFormat)> {
    let config = Config::load_with(path)?;
    let format = OutputFormat::resolve(format, &config);
    Ok((config, format))
}
