//! Tab command implementations (sell, pay, history, balances)

use anyhow::{anyhow, Context, Result};
use bartab_core::autofill::parser::parse_item_line;
use bartab_core::catalog::PendingSelection;
use bartab_core::db::Database;
use bartab_core::models::format_currency;

use super::{resolve_client, resolve_product, truncate};

/// Put `PRODUCT=QTY` items on a client's tab as one batch
pub fn cmd_sell(db: &Database, client: &str, items: &[String]) -> Result<()> {
    let client = resolve_client(db, client)?;

    let mut selection = PendingSelection::new();
    selection.select_client(client.id);

    for raw in items {
        let item = parse_item_line(raw)
            .ok_or_else(|| anyhow!("Invalid item '{}' (expected PRODUCT=QTY)", raw))?;
        if item.quantity == 0 {
            anyhow::bail!("Quantity for '{}' must be at least 1", item.product_name);
        }
        let product = resolve_product(db, &item.product_name)?;
        selection.add(product.id, item.quantity);
    }

    let catalog = db.catalog_snapshot()?;
    let total = selection.total(&catalog);
    let ids = db.record_purchases(client.id, &selection.items())?;

    println!(
        "🧾 {} item line(s) added to {}'s tab ({})",
        ids.len(),
        client.name,
        format_currency(total)
    );
    for (product_id, quantity) in selection.items() {
        if let Some(product) = catalog.product(product_id) {
            println!(
                "   {} x{} @ {}",
                product.name,
                quantity,
                format_currency(product.price)
            );
        }
    }
    println!(
        "   Balance: {}",
        format_currency(db.client_balance(client.id)?)
    );

    Ok(())
}

pub fn cmd_pay(db: &Database, client: &str, amount: f64) -> Result<()> {
    let client = resolve_client(db, client)?;
    db.record_payment(client.id, amount)?;

    println!(
        "💵 Payment of {} recorded for {}",
        format_currency(amount),
        client.name
    );
    println!(
        "   Balance: {}",
        format_currency(db.client_balance(client.id)?)
    );
    Ok(())
}

/// Show a client's history, newest first
pub fn cmd_history(db: &Database, client: &str, json: bool) -> Result<()> {
    let client = resolve_client(db, client)?;
    let history = db.list_client_history(client.id)?;

    if json {
        let json = serde_json::to_string_pretty(&history)
            .context("Failed to serialize history to JSON")?;
        println!("{}", json);
        return Ok(());
    }

    if history.is_empty() {
        println!("No transactions for {} yet.", client.name);
        return Ok(());
    }

    println!();
    println!("📜 History for {}", client.name);
    println!("   ─────────────────────────────────────────────────────────────");
    println!(
        "   {:>5} │ {:16} │ {:24} │ {:>12}",
        "ID", "Date", "Item", "Amount"
    );
    println!("   ──────┼──────────────────┼──────────────────────────┼─────────────");

    for entry in &history {
        println!(
            "   {:>5} │ {:16} │ {:24} │ {:>12}",
            entry.transaction.id,
            entry.transaction.created_at.format("%Y-%m-%d %H:%M"),
            truncate(&entry.describe(), 24),
            format_currency(entry.amount())
        );
    }

    println!();
    println!(
        "   Balance: {}",
        format_currency(db.client_balance(client.id)?)
    );
    Ok(())
}

pub fn cmd_balances(db: &Database, json: bool) -> Result<()> {
    let balances = db.list_balances()?;

    if json {
        let json = serde_json::to_string_pretty(&balances)
            .context("Failed to serialize balances to JSON")?;
        println!("{}", json);
        return Ok(());
    }

    if balances.is_empty() {
        println!("No clients yet.");
        return Ok(());
    }

    println!();
    println!("💰 Balances");
    println!("   ─────────────────────────────────────────────");

    let mut outstanding = 0.0;
    for row in &balances {
        let marker = if row.balance > 0.0 { "🔴" } else { "  " };
        println!(
            "   {} {:24} {:>12}",
            marker,
            truncate(&row.client.name, 24),
            format_currency(row.balance)
        );
        outstanding += row.balance;
    }

    println!("   ─────────────────────────────────────────────");
    println!("      {:24} {:>12}", "Total", format_currency(outstanding));
    Ok(())
}
