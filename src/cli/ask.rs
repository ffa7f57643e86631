//! `pharmabot ask` command
//!
//! Runs a single natural-language command for the logged-in shop.
//!
//! # Usage
//! ```bash
//! pharmabot ask --user admin "Add 10 Aspirin to Shelf A"
//! pharmabot ask --user admin where is aspirin
//! pharmabot ask --user admin --format json "list"
//! ```

use anyhow::Result;
use clap::Args;

use super::utils::{authenticate, open_store, print_reply, AuthArgs};
use super::OutputFormat;
use crate::config::Config;
use crate::core::agent::Agent;

#[derive(Args, Debug)]
pub struct AskArgs {
    #[command(flatten)]
    pub auth: AuthArgs,

    /// The command text (words are joined with spaces)
    #[arg(required = true, num_args = 1..)]
    pub text: Vec<String>,
}

pub fn run(args: AskArgs, config: &Config, format: OutputFormat) -> Result<()> {
    let mut store = open_store(config)?;
    let session = authenticate(&store, &args.auth)?;

    let text = args.text.join(" ");
    let mut agent = Agent::new(&mut store, session.shop_id, config.agent_settings());
    let reply = agent.process_query(&text)?;

    print_reply(&reply, format)
}
