//! Corner Shop CLI - Cart store management tools.
//!
//! # Usage
//!
//! ```bash
//! # Provision the cart database schema
//! cs-cli migrate
//!
//! # List the catalog
//! cs-cli catalog
//!
//! # Add, remove and inspect cart items
//! cs-cli cart add hd-01
//! cs-cli cart remove hd-01
//! cs-cli cart show --json
//! ```
//!
//! # Commands
//!
//! - `migrate` - Apply the embedded schema migrations
//! - `catalog` - Print the catalog grouped by category
//! - `cart` - Add, remove and show cart items

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "cs-cli")]
#[command(author, version, about = "Corner Shop CLI tools")]
struct Cli {
    /// Override `CART_DATABASE_URL` for this invocation
    #[arg(long, global = true)]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply cart database migrations
    Migrate,
    /// List catalog products by category
    Catalog,
    /// Manage cart items
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Add a catalog product to the cart
    Add {
        /// Catalog product id (all digits means a numeric id)
        id: String,
    },
    /// Remove a product from the cart
    Remove {
        /// Product id to remove
        id: String,
    },
    /// Show cart contents, total price and item count
    Show {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() {
    // Logs go to stderr so `cart show --json` stays machine-readable
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "corner_shop_storefront=warn,corner_shop_cli=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let database_url = cli.database_url.as_deref();

    match cli.command {
        Commands::Migrate => commands::migrate::run(database_url).await?,
        Commands::Catalog => commands::catalog::list(),
        Commands::Cart { action } => match action {
            CartAction::Add { id } => commands::cart::add(database_url, &id).await?,
            CartAction::Remove { id } => commands::cart::remove(database_url, &id).await?,
            CartAction::Show { json } => commands::cart::show(database_url, json).await?,
        },
    }
    Ok(())
}
