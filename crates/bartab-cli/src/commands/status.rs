//! Status and reset command implementations

use std::path::Path;

use anyhow::{Context, Result};
use bartab_core::db::DB_KEY_ENV;
use bartab_core::models::format_currency;

use super::{encryption_label, open_db};

/// Database file size, or None if it cannot be read
fn file_size_label(db_path: &Path) -> Option<String> {
    let size_kb = std::fs::metadata(db_path).ok()?.len() as f64 / 1024.0;
    Some(if size_kb < 1024.0 {
        format!("{:.1} KB", size_kb)
    } else {
        format!("{:.1} MB", size_kb / 1024.0)
    })
}

pub fn cmd_status(db_path: &Path, no_encrypt: bool) -> Result<()> {
    println!();
    println!("📊 Bartab Status");
    println!("   ─────────────────────────────────────────────────────────────");
    println!("   Database: {}", db_path.display());

    if !db_path.exists() {
        println!("   Not initialized. Run 'bartab init' to create it.");
        println!();
        return Ok(());
    }

    if let Some(size) = file_size_label(db_path) {
        println!("   Size: {}", size);
    }

    let db = match open_db(db_path, no_encrypt) {
        Ok(db) => db,
        Err(e) => {
            println!("   ❌ Cannot open database: {:#}", e);
            if no_encrypt {
                println!("      It may be encrypted: drop --no-encrypt and set {}", DB_KEY_ENV);
            } else if std::env::var(DB_KEY_ENV).is_ok() {
                println!("      Check that {} is the passphrase it was created with", DB_KEY_ENV);
            } else {
                println!("      Set {} or use --no-encrypt", DB_KEY_ENV);
            }
            println!();
            return Ok(());
        }
    };

    println!("   {}", encryption_label(&db));

    let status = db.status().context("Failed to read ledger status")?;
    println!();
    println!("   Clients:      {}", status.clients);
    println!("   Products:     {}", status.products);
    println!("   Transactions: {}", status.transactions);
    println!("   Outstanding:  {}", format_currency(status.outstanding));
    println!();
    Ok(())
}

/// Reset the database (soft or hard)
pub fn cmd_reset(db_path: &Path, soft: bool, yes: bool, no_encrypt: bool) -> Result<()> {
    use std::fs;
    use std::io::{self, Write};

    if soft {
        // Soft reset: clear the ledger but keep the catalog
        if !db_path.exists() {
            anyhow::bail!("Database not found: {}", db_path.display());
        }

        if !yes {
            print!("⚠️  This will delete every sale and payment.\n");
            print!("   Clients and products will be preserved.\n\n");
            print!("Are you sure? [y/N] ");
            io::stdout().flush()?;

            let mut input = String::new();
            io::stdin().read_line(&mut input)?;
            if !input.trim().eq_ignore_ascii_case("y") {
                println!("Cancelled.");
                return Ok(());
            }
        }

        let db = open_db(db_path, no_encrypt)?;
        db.soft_reset()?;

        println!("✅ Database soft reset complete.");
        println!("   Cleared: transactions");
        println!("   Preserved: clients, products");
    } else {
        // Hard reset: delete and re-initialize
        if !yes {
            print!("⚠️  This will DELETE the entire database and start fresh.\n");
            print!("   All clients, products and tabs will be lost.\n\n");
            print!("Are you sure? [y/N] ");
            io::stdout().flush()?;

            let mut input = String::new();
            io::stdin().read_line(&mut input)?;
            if !input.trim().eq_ignore_ascii_case("y") {
                println!("Cancelled.");
                return Ok(());
            }
        }

        // Delete database file if it exists
        if db_path.exists() {
            fs::remove_file(db_path)
                .with_context(|| format!("Failed to delete database: {}", db_path.display()))?;
            // SQLite sidecar files sit next to the database as <name>-wal etc.
            for suffix in ["-wal", "-shm", "-journal"] {
                let mut sidecar = db_path.as_os_str().to_owned();
                sidecar.push(suffix);
                let _ = fs::remove_file(sidecar);
            }
        }

        // Re-initialize
        super::cmd_init(db_path, no_encrypt)?;

        println!("\n✅ Database hard reset complete.");
    }

    Ok(())
}
