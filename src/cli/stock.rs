//! `pharmabot stock` command
//!
//! Applies a signed delta without going through the text parser. Negative
//! deltas remove stock; the result never drops below zero.
//!
//! # Usage
//! ```bash
//! pharmabot stock --user admin Aspirin "Shelf A" 10
//! pharmabot stock --user admin Aspirin "Shelf A" -3
//! pharmabot stock --user admin Crocin "Box 1" 24 --expiry 2027-06-30
//! ```

use anyhow::Result;
use chrono::NaiveDate;
use clap::Args;

use super::utils::{authenticate, open_store, AuthArgs};
use super::OutputFormat;
use crate::config::Config;
use crate::core::stock::update_stock;

#[derive(Args, Debug)]
pub struct StockArgs {
    #[command(flatten)]
    pub auth: AuthArgs,

    /// Medicine name
    pub medicine: String,

    /// Location name
    pub location: String,

    /// Quantity change (may be negative)
    #[arg(allow_negative_numbers = true)]
    pub delta: i64,

    /// Expiry date (YYYY-MM-DD)
    #[arg(short, long, value_parser = parse_date)]
    pub expiry: Option<NaiveDate>,
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| format!("expected YYYY-MM-DD: {}", e))
}

pub fn run(args: StockArgs, config: &Config, format: OutputFormat) -> Result<()> {
    let mut store = open_store(config)?;
    let session = authenticate(&store, &args.auth)?;

    let update = update_stock(
        &mut store,
        session.shop_id,
        &args.medicine,
        &args.location,
        args.delta,
        args.expiry,
    )?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&update)?),
        OutputFormat::Pretty => println!("✅ {}", update),
    }
    Ok(())
}
