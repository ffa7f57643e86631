//! CLI utility functions
//!
//! Common helpers shared across CLI commands:
//! - Opening the store from config (open_store)
//! - Turning credentials into a session (authenticate)
//! - Rendering agent replies (print_reply, inventory_table)

use anyhow::{bail, Context, Result};
use clap::Args;
use colored::Colorize;
use dialoguer::{Input, Password};
use tabled::settings::Style;
use tabled::{Table, Tabled};

use super::OutputFormat;
use crate::config::Config;
use crate::core::agent::Reply;
use crate::core::auth::{login_user, Session};
use crate::core::store::{InventoryRow, Store};

/// Credentials for shop-scoped commands
#[derive(Args, Debug, Clone)]
pub struct AuthArgs {
    /// Username (prompted if missing)
    #[arg(short, long, env = "PHARMABOT_USER")]
    pub user: Option<String>,

    /// Password (prompted if missing)
    #[arg(long, env = "PHARMABOT_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

/// Open the store the config points at, creating its directory if needed
pub fn open_store(config: &Config) -> Result<Store> {
    let db_path = config.database_path();

    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
    }

    Store::open(&db_path).with_context(|| format!("Failed to open database {}", db_path.display()))
}

/// Read a password from the flag/env or prompt for it
pub fn password_or_prompt(password: Option<String>, prompt: &str) -> Result<String> {
    match password {
        Some(p) => Ok(p),
        None => Ok(Password::new().with_prompt(prompt).interact()?),
    }
}

/// Log in with the given credentials, prompting for anything missing
pub fn authenticate(store: &Store, auth: &AuthArgs) -> Result<Session> {
    let username = match &auth.user {
        Some(u) => u.clone(),
        None => Input::<String>::new()
            .with_prompt("Username")
            .interact_text()?,
    };
    let password = password_or_prompt(auth.password.clone(), "Password")?;

    match login_user(store, &username, &password)? {
        Some(session) => {
            tracing::debug!(username = %session.username, shop = %session.shop_id, "authenticated");
            Ok(session)
        }
        None => bail!("Invalid username or password"),
    }
}

#[derive(Tabled)]
struct InventoryView {
    #[tabled(rename = "Medicine")]
    medicine: String,
    #[tabled(rename = "Location")]
    location: String,
    #[tabled(rename = "Quantity")]
    quantity: i64,
    #[tabled(rename = "Expiry")]
    expiry: String,
}

impl From<&InventoryRow> for InventoryView {
    fn from(row: &InventoryRow) -> Self {
        Self {
            medicine: row.medicine.clone(),
            location: row.location.clone(),
            quantity: row.quantity,
            expiry: row
                .expiry
                .map(|d| d.to_string())
                .unwrap_or_else(|| "-".to_string()),
        }
    }
}

/// Render inventory rows as a table
pub fn inventory_table(rows: &[InventoryRow]) -> String {
    let mut table = Table::new(rows.iter().map(InventoryView::from));
    table.with(Style::rounded());
    table.to_string()
}

pub fn print_reply(reply: &Reply, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(reply)?),
        OutputFormat::Pretty => match reply {
            Reply::Text(text) => println!("{}", text.trim_end()),
            Reply::Table(rows) => {
                println!("{}", "📦 Here is the inventory list:".bold());
                println!("{}", inventory_table(rows));
            }
        },
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_inventory_table_columns() {
        let rows = vec![
            InventoryRow {
                medicine: "Crocin".to_string(),
                location: "Box 1".to_string(),
                quantity: 5,
                expiry: NaiveDate::from_ymd_opt(2027, 1, 31),
            },
            InventoryRow {
                medicine: "Aspirin".to_string(),
                location: "Shelf A".to_string(),
                quantity: 10,
                expiry: None,
            },
        ];

        let table = inventory_table(&rows);
        for needle in ["Medicine", "Location", "Quantity", "Expiry", "Crocin", "2027-01-31", "Shelf A"] {
            assert!(table.contains(needle), "missing {needle} in\n{table}");
        }
    }
}
