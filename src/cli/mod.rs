//! Command-line interface parsing and handling
//!
//! This module handles parsing command-line arguments and executing the appropriate commands.

pub mod model_list;
pub mod session;

use std::error::Error;

use clap::{Parser, Subcommand};

use crate::cli::model_list::list_models;
use crate::cli::session::{run_session, COMMAND_HELP};
use crate::core::config::Config;
use crate::utils::logging::init_tracing;

#[derive(Parser)]
#[command(name = "panelink")]
#[command(about = "Headless UI panel speaking the host/webview message protocol")]
#[command(
    long_about = "Panelink mounts a UI panel with a model selector and a system prompt selector \
and connects it to a host over stdio.\n\n\
Every envelope the panel sends is printed to stdout as one JSON line. Lines read from \
stdin that start with '{' are treated as host envelopes; anything else is a UI command.\n\n\
Environment Variables:\n\
  PANELINK_LOG      Tracing filter directive (falls back to RUST_LOG, then log-filter)\n\n"
)]
#[command(after_help = COMMAND_HELP)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Write diagnostics to the specified file instead of stderr
    #[arg(short = 'l', long, global = true)]
    pub log: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Mount a panel and drive it over stdio (default)
    Session,
    /// List the built-in chat models
    Models,
    /// Show the current configuration
    Config,
    /// Set configuration values
    Set {
        /// Configuration key to set
        key: String,
        /// Value to set for the key
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        value: Vec<String>,
    },
    /// Unset configuration values
    Unset {
        /// Configuration key to unset
        key: String,
    },
}

pub fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let mut config = Config::load()?;

    match args.command.unwrap_or(Commands::Session) {
        Commands::Models => {
            list_models(&config);
            Ok(())
        }
        Commands::Config => {
            config.print_all();
            Ok(())
        }
        Commands::Set { key, value } => {
            if value.is_empty() {
                config.print_all();
                return Ok(());
            }
            let value = value.join(" ");
            if let Err(e) = config.set(&key, &value) {
                eprintln!("❌ {e}");
                std::process::exit(1);
            }
            config.save()?;
            println!("✅ Set {key} to: {value}");
            Ok(())
        }
        Commands::Unset { key } => {
            if let Err(e) = config.unset(&key) {
                eprintln!("❌ {e}");
                std::process::exit(1);
            }
            config.save()?;
            println!("✅ Unset {key}");
            Ok(())
        }
        Commands::Session => {
            init_tracing(args.log.as_deref(), config.log_filter.as_deref())?;
            tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?
                .block_on(run_session(&config))
        }
    }
}
