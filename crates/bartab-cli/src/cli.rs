//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Bartab - Keep tabs for a small bar or shop
#[derive(Parser)]
#[command(name = "bartab")]
#[command(about = "Client tabs with receipt-photo autofill", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path
    #[arg(long, default_value = "bartab.db", global = true)]
    pub db: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable database encryption (not recommended for production)
    ///
    /// By default, the database is encrypted using SQLCipher.
    /// Set BARTAB_DB_KEY environment variable with your passphrase.
    /// Use --no-encrypt only for development or testing.
    #[arg(long, global = true)]
    pub no_encrypt: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database
    Init,

    /// Show database status and ledger totals
    Status,

    /// Manage clients
    Clients {
        #[command(subcommand)]
        action: Option<ClientsAction>,
    },

    /// Manage products
    Products {
        #[command(subcommand)]
        action: Option<ProductsAction>,
    },

    /// Put products on a client's tab
    Sell {
        /// Client id or name
        client: String,

        /// Items as PRODUCT=QTY (e.g. "Beer=2" Chips=1)
        #[arg(required = true)]
        items: Vec<String>,
    },

    /// Record a payment against a client's tab
    Pay {
        /// Client id or name
        client: String,

        /// Amount paid
        amount: f64,
    },

    /// Show a client's transaction history (newest first)
    History {
        /// Client id or name
        client: String,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show every client's balance
    Balances {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Propose a sale from a receipt photo or its transcribed text
    Autofill {
        #[command(flatten)]
        source: AutofillSource,

        /// Record the resolved items on the client's tab
        #[arg(long)]
        apply: bool,
    },

    /// Reset the database (clear data)
    Reset {
        /// Soft reset: clear transactions but keep clients and products
        /// Without this flag, performs a hard reset (deletes DB file and re-initializes)
        #[arg(long)]
        soft: bool,

        /// Skip confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },
}

/// Where autofill reads the receipt from
#[derive(Args)]
#[group(required = true, multiple = false)]
pub struct AutofillSource {
    /// Receipt image, recognized with the configured engine
    #[arg(long)]
    pub image: Option<PathBuf>,

    /// Already transcribed receipt text
    #[arg(long)]
    pub text: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum ClientsAction {
    /// List all clients
    List,

    /// Add a client
    Add {
        /// Display name
        name: String,

        /// Phone number
        #[arg(long)]
        phone: Option<String>,
    },

    /// Update a client's name or phone
    Update {
        /// Client id or name
        client: String,

        /// New display name
        #[arg(long)]
        name: Option<String>,

        /// New phone number (empty string clears it)
        #[arg(long)]
        phone: Option<String>,
    },

    /// Delete a client and all of their transactions
    Delete {
        /// Client id or name
        client: String,
    },

    /// Show a client with balance and recent activity
    Show {
        /// Client id or name
        client: String,
    },
}

#[derive(Subcommand)]
pub enum ProductsAction {
    /// List all products
    List,

    /// Add a product
    Add {
        /// Display name
        name: String,

        /// Unit price
        price: f64,
    },

    /// Update a product's name or price
    Update {
        /// Product id or name
        product: String,

        /// New display name
        #[arg(long)]
        name: Option<String>,

        /// New unit price
        #[arg(long)]
        price: Option<f64>,
    },

    /// Delete a product (history keeps its rows)
    Delete {
        /// Product id or name
        product: String,
    },
}
