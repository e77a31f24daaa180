//! Product operations

use rusqlite::{params, OptionalExtension};
use tracing::info;

use super::{parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{normalize_name, normalize_price, NewProduct, Product};

impl Database {
    pub(super) fn row_to_product(row: &rusqlite::Row) -> rusqlite::Result<Product> {
        let created_at_str: String = row.get(3)?;
        Ok(Product {
            id: row.get(0)?,
            name: row.get(1)?,
            price: row.get(2)?,
            created_at: parse_datetime(&created_at_str),
        })
    }

    /// Create a product; the price is stored rounded to cents
    pub fn create_product(&self, product: &NewProduct) -> Result<i64> {
        let name = normalize_name(&product.name)?;
        let price = normalize_price(product.price)?;

        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO products (name, price) VALUES (?, ?)",
            params![name, price],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// List all products ordered by name
    pub fn list_products(&self) -> Result<Vec<Product>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, name, price, created_at FROM products ORDER BY name COLLATE NOCASE, id",
        )?;

        let products = stmt
            .query_map([], Self::row_to_product)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(products)
    }

    /// Get a product by ID
    pub fn get_product(&self, id: i64) -> Result<Option<Product>> {
        let conn = self.conn()?;
        let product = conn
            .query_row(
                "SELECT id, name, price, created_at FROM products WHERE id = ?",
                params![id],
                Self::row_to_product,
            )
            .optional()?;

        Ok(product)
    }

    /// Find a product by exact name (case-insensitive)
    pub fn find_product_by_name(&self, name: &str) -> Result<Option<Product>> {
        let conn = self.conn()?;
        let product = conn
            .query_row(
                "SELECT id, name, price, created_at FROM products
                 WHERE name = ? COLLATE NOCASE ORDER BY id LIMIT 1",
                params![name.trim()],
                Self::row_to_product,
            )
            .optional()?;

        Ok(product)
    }

    /// Update a product's name and/or price
    pub fn update_product(&self, id: i64, name: Option<&str>, price: Option<f64>) -> Result<()> {
        let existing = self
            .get_product(id)?
            .ok_or_else(|| Error::NotFound(format!("product {}", id)))?;

        let name = match name {
            Some(n) => normalize_name(n)?,
            None => existing.name,
        };
        let price = match price {
            Some(p) => normalize_price(p)?,
            None => existing.price,
        };

        let conn = self.conn()?;
        conn.execute(
            "UPDATE products SET name = ?, price = ? WHERE id = ?",
            params![name, price, id],
        )?;
        Ok(())
    }

    /// Delete a product
    ///
    /// Transactions that reference it are kept and show up in history
    /// without a product.
    pub fn delete_product(&self, id: i64) -> Result<()> {
        let conn = self.conn()?;
        let deleted = conn.execute("DELETE FROM products WHERE id = ?", params![id])?;
        if deleted == 0 {
            return Err(Error::NotFound(format!("product {}", id)));
        }
        info!("Deleted product {}", id);
        Ok(())
    }
}
