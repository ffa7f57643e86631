//! `pharmabot register` command
//!
//! Creates a shop and its admin user.
//!
//! # Usage
//! ```bash
//! pharmabot register "Test Shop" testadmin            # prompts for password
//! pharmabot register "Test Shop" testadmin --password secret
//! ```

use anyhow::{bail, Result};
use clap::Args;
use colored::Colorize;

use super::utils::{open_store, password_or_prompt};
use crate::config::Config;
use crate::core::auth::{register_shop, Registration};

#[derive(Args, Debug)]
pub struct RegisterArgs {
    /// Shop name (unique)
    pub shop: String,

    /// Admin username (unique)
    pub username: String,

    /// Admin password (prompted if missing)
    #[arg(long, env = "PHARMABOT_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

pub fn run(args: RegisterArgs, config: &Config) -> Result<()> {
    let mut store = open_store(config)?;
    let password = password_or_prompt(args.password, "Admin password")?;

    match register_shop(&mut store, &args.shop, &args.username, &password)? {
        Registration::Created { shop_id } => {
            println!("{}", "✅ Registration successful!".green());
            println!("   Shop: {} (id {})", args.shop, shop_id);
            println!("   Admin: {}", args.username);
            Ok(())
        }
        Registration::Rejected { reason } => bail!("Registration failed: {}", reason),
    }
}
