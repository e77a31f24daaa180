//! Client command implementations

use anyhow::Result;
use bartab_core::db::Database;
use bartab_core::models::{format_currency, NewClient};

use super::{resolve_client, truncate};

/// List all clients
pub fn cmd_clients_list(db: &Database) -> Result<()> {
    let clients = db.list_clients()?;

    if clients.is_empty() {
        println!("No clients found. Add one with:");
        println!("  bartab clients add <name> [--phone <number>]");
        return Ok(());
    }

    println!();
    println!("👤 Clients");
    println!("   ─────────────────────────────────────────────────────────────");
    println!("   {:>4} │ {:24} │ {:16} │ {}", "ID", "Name", "Phone", "Since");
    println!("   ─────┼──────────────────────────┼──────────────────┼────────────");

    for client in clients {
        println!(
            "   {:>4} │ {:24} │ {:16} │ {}",
            client.id,
            truncate(&client.name, 24),
            client.phone.as_deref().unwrap_or("-"),
            client.created_at.format("%Y-%m-%d")
        );
    }

    Ok(())
}

pub fn cmd_clients_add(db: &Database, name: &str, phone: Option<&str>) -> Result<()> {
    let mut client = NewClient::new(name);
    if let Some(phone) = phone {
        client = client.with_phone(phone);
    }

    let id = db.create_client(&client)?;
    println!("✅ Added client #{}: {}", id, name.trim());
    Ok(())
}

pub fn cmd_clients_update(
    db: &Database,
    client: &str,
    name: Option<&str>,
    phone: Option<&str>,
) -> Result<()> {
    if name.is_none() && phone.is_none() {
        anyhow::bail!("Nothing to update (use --name and/or --phone)");
    }

    let existing = resolve_client(db, client)?;
    db.update_client(existing.id, name, phone)?;

    println!("✅ Updated client #{}", existing.id);
    if let Some(name) = name {
        println!("   Name: {} → {}", existing.name, name.trim());
    }
    match phone.map(str::trim) {
        Some("") => println!("   Phone: cleared"),
        Some(phone) => println!("   Phone: {}", phone),
        None => {}
    }
    Ok(())
}

/// Delete a client; their transactions go with them
pub fn cmd_clients_delete(db: &Database, client: &str) -> Result<()> {
    let existing = resolve_client(db, client)?;
    let removed = db.delete_client(existing.id)?;

    println!("🗑️  Deleted client #{}: {}", existing.id, existing.name);
    if removed > 0 {
        println!("   Removed {} transaction(s)", removed);
    }
    Ok(())
}

pub fn cmd_clients_show(db: &Database, client: &str) -> Result<()> {
    let client = resolve_client(db, client)?;
    let balance = db.client_balance(client.id)?;
    let history = db.list_client_history(client.id)?;

    println!();
    println!("👤 {} (#{})", client.name, client.id);
    println!("   ─────────────────────────────");
    if let Some(phone) = &client.phone {
        println!("   Phone: {}", phone);
    }
    println!("   Since: {}", client.created_at.format("%Y-%m-%d"));
    println!("   Balance: {}", format_currency(balance));
    match db.last_activity(client.id)? {
        Some(when) => println!("   Last activity: {}", when.format("%Y-%m-%d %H:%M")),
        None => println!("   Last activity: never"),
    }

    if !history.is_empty() {
        println!();
        println!("   Recent:");
        for entry in history.iter().take(5) {
            println!(
                "     {} {:24} {:>12}",
                entry.transaction.created_at.format("%Y-%m-%d"),
                truncate(&entry.describe(), 24),
                format_currency(entry.amount())
            );
        }
        if history.len() > 5 {
            println!("     ... {} more (bartab history {})", history.len() - 5, client.id);
        }
    }

    Ok(())
}
