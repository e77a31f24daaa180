//! Core command implementations and shared utilities
//!
//! This module contains:
//! - `open_db` - Shared utility to open the database
//! - `cmd_init` - Initialize the database
//! - `encryption_label` - Encryption line shared by init and status
//! - `resolve_client` / `resolve_product` - Turn a CLI argument into a row

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use bartab_core::autofill::find_best_match;
use bartab_core::db::Database;
use bartab_core::models::{Client, Product};
use tracing::debug;

/// Open database with encryption by default, or unencrypted if --no-encrypt
pub fn open_db(db_path: &Path, no_encrypt: bool) -> Result<Database> {
    let path_str = db_path
        .to_str()
        .ok_or_else(|| anyhow!("Database path is not valid UTF-8: {}", db_path.display()))?;
    if no_encrypt {
        Database::new_unencrypted(path_str).context("Failed to open database (unencrypted)")
    } else {
        Database::new(path_str).context("Failed to open database")
    }
}

pub fn cmd_init(db_path: &Path, no_encrypt: bool) -> Result<()> {
    println!("🔧 Initializing database at {}...", db_path.display());

    let db = open_db(db_path, no_encrypt)?;
    let status = db.status().context("Failed to read ledger status")?;
    println!(
        "   {} clients, {} products on file",
        status.clients, status.products
    );

    println!("   {}", encryption_label(&db));

    println!("✅ Database initialized successfully!");
    println!();
    println!("Next steps:");
    println!("  1. Add products: bartab products add Beer 5.00");
    println!("  2. Add clients: bartab clients add Alice");
    println!("  3. Open a tab: bartab sell Alice Beer=2");

    Ok(())
}

/// Encryption state of an opened database, for status output
pub fn encryption_label(db: &Database) -> &'static str {
    if db.is_encrypted() {
        "🔒 Encryption: ENABLED"
    } else {
        "⚠️  Encryption: DISABLED (--no-encrypt)"
    }
}

/// Find a client by id, exact name, or closest name
pub fn resolve_client(db: &Database, query: &str) -> Result<Client> {
    // Digit-only names ("1664") fall through when no row has that id
    if let Ok(id) = query.trim().parse::<i64>() {
        if let Some(client) = db.get_client(id)? {
            return Ok(client);
        }
    }

    if let Some(client) = db.find_client_by_name(query)? {
        return Ok(client);
    }

    let clients = db.list_clients()?;
    let client = find_best_match(query, &clients, |c| c.name.as_str())
        .cloned()
        .ok_or_else(|| anyhow!("No client matches '{}'", query))?;
    debug!("'{}' fuzzy-matched client '{}'", query, client.name);
    Ok(client)
}

/// Find a product by id, exact name, or closest name
pub fn resolve_product(db: &Database, query: &str) -> Result<Product> {
    // Digit-only names ("1664") fall through when no row has that id
    if let Ok(id) = query.trim().parse::<i64>() {
        if let Some(product) = db.get_product(id)? {
            return Ok(product);
        }
    }

    if let Some(product) = db.find_product_by_name(query)? {
        return Ok(product);
    }

    let products = db.list_products()?;
    let product = find_best_match(query, &products, |p| p.name.as_str())
        .cloned()
        .ok_or_else(|| anyhow!("No product matches '{}'", query))?;
    debug!("'{}' fuzzy-matched product '{}'", query, product.name);
    Ok(product)
}
