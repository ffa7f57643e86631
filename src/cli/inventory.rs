//! `pharmabot inventory` command
//!
//! Shows the shop's inventory as a table, optionally filtered by medicine
//! name.

use anyhow::Result;
use clap::Args;

use super::utils::{authenticate, inventory_table, open_store, AuthArgs};
use super::OutputFormat;
use crate::config::Config;
use crate::core::query::find_medicine;

#[derive(Args, Debug)]
pub struct InventoryArgs {
    #[command(flatten)]
    pub auth: AuthArgs,

    /// Only rows whose medicine name contains this text
    #[arg(short, long)]
    pub search: Option<String>,
}

pub fn run(args: InventoryArgs, config: &Config, format: OutputFormat) -> Result<()> {
    let store = open_store(config)?;
    let session = authenticate(&store, &args.auth)?;

    let rows = match &args.search {
        Some(term) => find_medicine(&store, session.shop_id, term)?,
        None => store.list_inventory(session.shop_id)?,
    };

    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    if rows.is_empty() {
        println!("Inventory is empty.");
    } else {
        println!("{}", inventory_table(&rows));
    }
    Ok(())
}
