//! Bizdesk CLI - operator tools.
//!
//! # Usage
//!
//! ```bash
//! # Hash a password for BIZDESK_ADMIN_PASSWORD_HASH
//! bizdesk-cli hash-password 'correct horse battery staple'
//!
//! # Validate the server configuration in the current environment / .env
//! bizdesk-cli check-config
//! ```
//!
//! # Commands
//!
//! - `hash-password` - Print an argon2 PHC hash
//! - `check-config` - Load and validate the server configuration

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "bizdesk-cli")]
#[command(author, version, about = "Bizdesk CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print an argon2 hash suitable for `BIZDESK_ADMIN_PASSWORD_HASH`
    HashPassword {
        /// Password to hash
        password: String,
    },
    /// Load the server configuration from the environment and report problems
    CheckConfig,
}

fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli);

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::HashPassword { password } => commands::password::hash(&password)?,
        Commands::CheckConfig => commands::config::check()?,
    }
    Ok(())
}
