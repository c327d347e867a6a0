//! Star Burger CLI - migrations and dispatch tools.
//!
//! # Usage
//!
//! ```bash
//! # Apply database migrations
//! sb-cli migrate
//!
//! # Resolve one address through the geocode cache
//! sb-cli geocode "Москва, Тверская 1"
//!
//! # Print candidate restaurants for every unfinished order
//! sb-cli assign
//! sb-cli assign --json
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "sb-cli")]
#[command(author, version, about = "Star Burger CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Resolve an address to coordinates, using and filling the cache
    Geocode {
        /// Address exactly as stored on orders or restaurants
        address: String,
    },
    /// Rank candidate restaurants for every unfinished order
    Assign {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "star_burger_restaurateur=info,sb_cli=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        tracing::warn!("rustls crypto provider was already installed");
    }

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Geocode { address } => commands::geocode::run(&address).await?,
        Commands::Assign { json } => commands::assign::run(json).await?,
    }
    Ok(())
}
