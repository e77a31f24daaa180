//! Product command implementations

use anyhow::Result;
use bartab_core::db::Database;
use bartab_core::models::{format_currency, NewProduct};

use super::{resolve_product, truncate};

/// List all products
pub fn cmd_products_list(db: &Database) -> Result<()> {
    let products = db.list_products()?;

    if products.is_empty() {
        println!("No products found. Add one with:");
        println!("  bartab products add <name> <price>");
        return Ok(());
    }

    println!();
    println!("🍺 Products");
    println!("   ─────────────────────────────────────────────");
    println!("   {:>4} │ {:24} │ {:>12}", "ID", "Name", "Price");
    println!("   ─────┼──────────────────────────┼─────────────");

    for product in products {
        println!(
            "   {:>4} │ {:24} │ {:>12}",
            product.id,
            truncate(&product.name, 24),
            format_currency(product.price)
        );
    }

    Ok(())
}

pub fn cmd_products_add(db: &Database, name: &str, price: f64) -> Result<()> {
    let id = db.create_product(&NewProduct::new(name, price))?;
    let product = db.get_product(id)?;
    let price = product.map(|p| p.price).unwrap_or(price);
    println!(
        "✅ Added product #{}: {} at {}",
        id,
        name.trim(),
        format_currency(price)
    );
    Ok(())
}

pub fn cmd_products_update(
    db: &Database,
    product: &str,
    name: Option<&str>,
    price: Option<f64>,
) -> Result<()> {
    if name.is_none() && price.is_none() {
        anyhow::bail!("Nothing to update (use --name and/or --price)");
    }

    let existing = resolve_product(db, product)?;
    db.update_product(existing.id, name, price)?;

    println!("✅ Updated product #{}", existing.id);
    if let Some(name) = name {
        println!("   Name: {} → {}", existing.name, name.trim());
    }
    if let Some(price) = price {
        println!(
            "   Price: {} → {}",
            format_currency(existing.price),
            format_currency(price)
        );
    }
    Ok(())
}

/// Delete a product; past sales keep their rows and show as "product not found"
pub fn cmd_products_delete(db: &Database, product: &str) -> Result<()> {
    let existing = resolve_product(db, product)?;
    db.delete_product(existing.id)?;
    println!("🗑️  Deleted product #{}: {}", existing.id, existing.name);
    Ok(())
}
