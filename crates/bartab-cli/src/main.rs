//! Bartab CLI - Client tabs with receipt-photo autofill
//!
//! Usage:
//!   bartab init                         Initialize database
//!   bartab sell Alice Beer=2 Chips=1    Put products on a tab
//!   bartab pay Alice 10                 Record a payment
//!   bartab autofill --image tab.jpg     Propose a sale from a photo

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    match cli.command {
        Commands::Init => commands::cmd_init(&cli.db, cli.no_encrypt),
        Commands::Status => commands::cmd_status(&cli.db, cli.no_encrypt),
        Commands::Clients { action } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            match action {
                None | Some(ClientsAction::List) => commands::cmd_clients_list(&db),
                Some(ClientsAction::Add { name, phone }) => {
                    commands::cmd_clients_add(&db, &name, phone.as_deref())
                }
                Some(ClientsAction::Update {
                    client,
                    name,
                    phone,
                }) => commands::cmd_clients_update(&db, &client, name.as_deref(), phone.as_deref()),
                Some(ClientsAction::Delete { client }) => commands::cmd_clients_delete(&db, &client),
                Some(ClientsAction::Show { client }) => commands::cmd_clients_show(&db, &client),
            }
        }
        Commands::Products { action } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            match action {
                None | Some(ProductsAction::List) => commands::cmd_products_list(&db),
                Some(ProductsAction::Add { name, price }) => {
                    commands::cmd_products_add(&db, &name, price)
                }
                Some(ProductsAction::Update {
                    product,
                    name,
                    price,
                }) => commands::cmd_products_update(&db, &product, name.as_deref(), price),
                Some(ProductsAction::Delete { product }) => {
                    commands::cmd_products_delete(&db, &product)
                }
            }
        }
        Commands::Sell { client, items } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            commands::cmd_sell(&db, &client, &items)
        }
        Commands::Pay { client, amount } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            commands::cmd_pay(&db, &client, amount)
        }
        Commands::History { client, json } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            commands::cmd_history(&db, &client, json)
        }
        Commands::Balances { json } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            commands::cmd_balances(&db, json)
        }
        Commands::Autofill { source, apply } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            match (source.image, source.text) {
                (Some(image), _) => commands::cmd_autofill_image(&db, &image, apply).await,
                (None, Some(text)) => commands::cmd_autofill_text(&db, &text, apply),
                (None, None) => anyhow::bail!("Either --image or --text is required"),
            }
        }
        Commands::Reset { soft, yes } => commands::cmd_reset(&cli.db, soft, yes, cli.no_encrypt),
    }
}
