//! `pharmabot chat` command
//!
//! Line-oriented session: each input line goes through the agent and the
//! reply is printed before the next line is read. Ends on `exit`, `quit`
//! or end of input.

use std::io::{self, BufRead, IsTerminal, Write};

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use super::utils::{authenticate, open_store, print_reply, AuthArgs};
use super::OutputFormat;
use crate::config::Config;
use crate::core::agent::Agent;

#[derive(Args, Debug)]
pub struct ChatArgs {
    #[command(flatten)]
    pub auth: AuthArgs,
}

pub fn run(args: ChatArgs, config: &Config, format: OutputFormat) -> Result<()> {
    let mut store = open_store(config)?;
    let session = authenticate(&store, &args.auth)?;

    let shop_name = store
        .get_shop(session.shop_id)?
        .map(|s| s.name)
        .unwrap_or_else(|| session.shop_id.to_string());

    let interactive = io::stdin().is_terminal();
    if interactive {
        println!("{}", format!("🏥 {} @ {}", session.username, shop_name).bold());
        println!("I can help you find medicines or update stock.");
        println!("Try: 'Where is Crocin?' or 'Add 10 Aspirin to Shelf A'. Type 'exit' to leave.\n");
    }

    let mut agent = Agent::new(&mut store, session.shop_id, config.agent_settings());
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        if interactive {
            print!("{} ", ">".cyan());
            io::stdout().flush()?;
        }

        let Some(line) = lines.next() else { break };
        let line = line?;
        let input = line.trim();

        if input.is_empty() {
            continue;
        }
        if matches!(input.to_lowercase().as_str(), "exit" | "quit") {
            break;
        }

        // A failed request is reported and the session continues
        match agent.process_query(input) {
            Ok(reply) => print_reply(&reply, format)?,
            Err(e) => {
                tracing::error!(error = %e, "request failed");
                eprintln!("{} {}", "error:".red(), e);
            }
        }
    }

    Ok(())
}
