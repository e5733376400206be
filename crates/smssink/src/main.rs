// SPDX-FileCopyrightText: 2026 SmsSink Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SmsSink - a local mock of a messaging provider's HTTP API.
//!
//! This is the binary entry point.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod admin;
mod serve;
mod shutdown;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// SmsSink - a local mock of a messaging provider's HTTP API.
#[derive(Parser, Debug)]
#[command(name = "smssink", version, about, long_about = None)]
struct Cli {
    /// Load configuration from this file instead of the default search path.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the API and admin listeners (default).
    Serve,
    /// Inspect or reset stored message history.
    Messages {
        #[command(subcommand)]
        action: MessagesAction,
    },
    /// Show or rotate the API key.
    Credentials {
        #[command(subcommand)]
        action: CredentialsAction,
    },
}

#[derive(Subcommand, Debug)]
enum MessagesAction {
    /// Print stored messages, newest first.
    List {
        /// Emit JSON instead of one line per message.
        #[arg(long)]
        json: bool,
    },
    /// Delete every stored message.
    Clear,
}

#[derive(Subcommand, Debug)]
enum CredentialsAction {
    /// Print the current API key.
    Show,
    /// Replace the API key.
    Set { api_key: String },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => smssink_config::load_and_validate_path(path),
        None => smssink_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            smssink_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        None | Some(Commands::Serve) => serve::run_serve(config).await,
        Some(Commands::Messages { action }) => match action {
            MessagesAction::List { json } => admin::list_messages(&config, json).await,
            MessagesAction::Clear => admin::clear_messages(&config).await,
        },
        Some(Commands::Credentials { action }) => match action {
            CredentialsAction::Show => admin::show_credential(&config).await,
            CredentialsAction::Set { api_key } => admin::set_credential(&config, &api_key).await,
        },
    };

    if let Err(e) = result {
        eprintln!("smssink: {e}");
        std::process::exit(1);
    }
}
