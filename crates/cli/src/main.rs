//! VoltEdge CLI - Session cart tools.
//!
//! # Usage
//!
//! ```bash
//! # Add a product to the cart
//! ve-cli cart add --id p1 --name "USB-C Cable" --price 10 --quantity 2
//!
//! # Show the cart as stored
//! ve-cli --json cart show
//!
//! # Use a different slot directory for this invocation
//! ve-cli --cart-dir /tmp/carts cart clear
//! ```
//!
//! # Commands
//!
//! - `cart show|add|update|remove|clear` - Inspect and mutate the session cart

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use voltedge_core::ProductId;
use voltedge_storefront::config::{ConfigError, StorefrontConfig};
use voltedge_storefront::telemetry;

mod commands;

use commands::cart::{CartCommandError, CartOp, CartSession, OutputFormat, ProductArgs};

#[derive(Parser)]
#[command(name = "ve-cli")]
#[command(author, version, about = "VoltEdge CLI tools")]
struct Cli {
    /// Print the stored cart as JSON instead of a table
    #[arg(long, global = true)]
    json: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,

    /// Directory holding the cart slot (overrides `VOLTEDGE_CART_DIR`)
    #[arg(long, global = true)]
    cart_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect and modify the session cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show the cart
    Show,
    /// Add units of a product
    Add {
        /// Product ID
        #[arg(long)]
        id: ProductId,

        /// Product display name
        #[arg(long)]
        name: String,

        /// Unit price (e.g., 19.99)
        #[arg(long)]
        price: Decimal,

        /// Units to add
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,

        /// Category ID
        #[arg(long)]
        category: Option<String>,

        /// Image URL (repeatable)
        #[arg(long = "image")]
        images: Vec<String>,
    },
    /// Set the quantity of an item (0 removes it)
    Update {
        /// Product ID
        #[arg(long)]
        id: ProductId,

        /// New quantity
        #[arg(short, long)]
        quantity: u32,
    },
    /// Remove an item
    Remove {
        /// Product ID
        #[arg(long)]
        id: ProductId,
    },
    /// Remove every item
    Clear,
}

/// Errors surfaced by the binary.
#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Cart(#[from] CartCommandError),
}

fn main() {
    let cli = Cli::parse();

    // Load configuration from environment (needed for Sentry init)
    let config = StorefrontConfig::from_env();

    // Initialize Sentry (must be done before tracing subscriber)
    let sentry_guard = config.as_ref().ok().and_then(telemetry::init_sentry);
    telemetry::init_tracing(cli.json_logs);

    let result = config
        .map_err(CliError::from)
        .and_then(|config| run(cli, &config));

    match result {
        Ok(output) => print_output(&output),
        Err(e) => {
            tracing::error!("Command failed: {e}");
            // Flush Sentry before exiting
            drop(sentry_guard);
            std::process::exit(1);
        }
    }
}

fn run(cli: Cli, config: &StorefrontConfig) -> Result<String, CliError> {
    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Table
    };

    let Commands::Cart { action } = cli.command;
    let op = match action {
        CartAction::Show => CartOp::Show,
        CartAction::Add {
            id,
            name,
            price,
            quantity,
            category,
            images,
        } => CartOp::Add {
            product: ProductArgs {
                id,
                name,
                price,
                category,
                images,
            },
            quantity,
        },
        CartAction::Update { id, quantity } => CartOp::Update { id, quantity },
        CartAction::Remove { id } => CartOp::Remove { id },
        CartAction::Clear => CartOp::Clear,
    };

    let mut session = CartSession::open(config, cli.cart_dir)?;
    Ok(session.run(op, format)?)
}

#[allow(clippy::print_stdout)]
fn print_output(output: &str) {
    if output.ends_with('\n') {
        print!("{output}");
    } else {
        println!("{output}");
    }
}
