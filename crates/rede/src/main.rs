// SPDX-FileCopyrightText: 2026 Rede Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Rede - group availability scheduling for chat communities.
//!
//! This is the binary entry point.

mod collaborators;
mod dispatch;
mod parse;
mod shell;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use colored::Colorize;

/// Rede - "e in 20 mins?" scheduling for chat communities.
#[derive(Parser, Debug)]
#[command(name = "rede", version, about, long_about = None)]
struct Cli {
    /// Load configuration from this file instead of the standard locations.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Recognize a chat message and print the result as JSON.
    Parse {
        /// The message text, e.g. "e in 20 mins?".
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
    /// Simulate a conversation in an interactive REPL.
    Shell {
        /// Guild id used for the simulated conversation.
        #[arg(long, default_value = "local")]
        guild: String,
        /// Channel id used for the simulated conversation.
        #[arg(long, default_value = "general")]
        channel: String,
    },
    /// Print the effective configuration.
    Config,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => rede_config::load_and_validate_path(path),
        None => rede_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            rede_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.agent.log_level);

    let result = match cli.command {
        Some(Commands::Parse { text }) => parse::run_parse(&config, &text.join(" ")),
        Some(Commands::Shell { guild, channel }) => {
            shell::run_shell(config, rede_core::ConversationKey::new(guild, channel)).await
        }
        Some(Commands::Config) => match rede_config::to_toml_string(&config) {
            Ok(rendered) => {
                print!("{rendered}");
                Ok(())
            }
            Err(e) => {
                rede_config::render_errors(&[e]);
                std::process::exit(1);
            }
        },
        None => {
            println!("rede: use --help for available commands");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {e}", "error".red());
        std::process::exit(1);
    }
}

/// Installs the global tracing subscriber. `RUST_LOG` overrides the
/// configured level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("rede={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .init();
}
