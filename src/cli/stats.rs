//! Stats command - Show shop statistics

use clap::Args;

use super::utils::{authenticate, open_store, AuthArgs};
use super::OutputFormat;
use crate::config::Config;

/// Stats command arguments
#[derive(Args, Debug)]
pub struct StatsArgs {
    #[command(flatten)]
    pub auth: AuthArgs,
}

/// Execute stats command
pub fn execute(args: StatsArgs, config: &Config, format: OutputFormat) -> anyhow::Result<()> {
    let store = open_store(config)?;
    let session = authenticate(&store, &args.auth)?;
    let stats = store.stats(session.shop_id)?;

    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    let shop = store.get_shop(session.shop_id)?;
    let shop_name = shop.as_ref().map(|s| s.name.as_str()).unwrap_or_default();

    println!("📊 Inventory Statistics: {}\n", shop_name);
    if let Some(shop) = &shop {
        println!("  Registered:       {}", shop.created_at);
    }
    println!("  Medicines:        {}", stats.medicines);
    println!("  Locations:        {}", stats.locations);
    println!("  Stock entries:    {}", stats.entries);
    println!("  └── Total units:  {}", stats.total_units);

    if let Some(path) = store.path() {
        println!("\n📁 Database: {}", path.display());
    }

    Ok(())
}
