//! Adsight CLI
//!
//! Command-line interface for interacting with the Adsight marketing
//! analytics platform.
//!
//! # Usage
//!
//! ```bash
//! adsight --help
//! adsight health
//! adsight ranges
//! ```

#![deny(unsafe_code)]

use clap::{Parser, Subcommand};
use shared::models::RangeToken;

/// Adsight CLI - Marketing analytics platform command-line interface
#[derive(Parser)]
#[command(name = "adsight")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// API server URL
    #[arg(
        short,
        long,
        env = "ADSIGHT_API_URL",
        default_value = "http://localhost:8080"
    )]
    api_url: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Check API server health
    Health,
    /// List the supported look-back range tokens
    Ranges,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Health) => {
            println!("Checking health of Adsight API at {}...", cli.api_url);
            println!("Health check not yet implemented");
        }
        Some(Commands::Ranges) => {
            for token in RangeToken::all() {
                println!("{token}\t{} days", token.days());
            }
        }
        None => {
            println!("Adsight CLI v{}", env!("CARGO_PKG_VERSION"));
            println!("Use --help for usage information");
        }
    }

    Ok(())
}
