//! FootFlex CLI - Database tools and the shop client.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! ff-cli migrate
//!
//! # Seed the catalog (admin account + products) from a YAML file
//! ff-cli seed --file crates/cli/seed/catalog.yaml
//!
//! # Shop against a running API
//! ff-cli shop register --name "Jane Doe" --email jane@example.com --password hunter22
//! ff-cli shop products --category Women --keyword run
//! ff-cli shop cart-add 1 --size 42 --color Black --qty 2
//! ff-cli shop checkout --address "1 Main St" --city Springfield \
//!     --postal-code 12345 --country USA
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `seed` - Seed the database from a YAML catalog file
//! - `shop` - API-driven storefront client (session and cart held locally)

#![cfg_attr(not(test), forbid(unsafe_code))]
// A CLI talks on stdout
#![allow(clippy::print_stdout)]

use clap::{Parser, Subcommand};

mod commands;

use commands::shop::ShopCommand;

#[derive(Parser)]
#[command(name = "ff-cli")]
#[command(author, version, about = "FootFlex CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Seed the database with an admin account and catalog products
    Seed {
        /// Path to the YAML catalog file
        #[arg(short, long, default_value = "crates/cli/seed/catalog.yaml")]
        file: String,
    },
    /// Storefront client: browse, fill a local cart, check out
    Shop {
        #[command(subcommand)]
        action: ShopCommand,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "footflex_cli=info".into()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Migrate => commands::migrate::run().await,
        Commands::Seed { file } => commands::seed::run(&file).await,
        Commands::Shop { action } => commands::shop::run(action).await,
    };

    if let Err(e) = result {
        tracing::error!("{e}");
        std::process::exit(1);
    }
}
