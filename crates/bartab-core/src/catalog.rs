//! Catalog snapshots and pending selections
//!
//! A `CatalogSnapshot` is a point-in-time copy of the clients and products
//! tables. Matching works only on snapshots, never on the live database, so a
//! reconciliation sees a consistent catalog for its whole run. The apply step
//! re-checks every id against the database before writing.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::{Client, Product};

/// Clients and products as of one read
#[derive(Debug, Clone, Default, Serialize)]
pub struct CatalogSnapshot {
    /// Ordered by display name
    pub clients: Vec<Client>,
    /// Ordered by display name
    pub products: Vec<Product>,
}

impl CatalogSnapshot {
    pub fn new(clients: Vec<Client>, products: Vec<Product>) -> Self {
        Self { clients, products }
    }

    pub fn client(&self, id: i64) -> Option<&Client> {
        self.clients.iter().find(|c| c.id == id)
    }

    pub fn product(&self, id: i64) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }
}

/// Products picked for the next purchase batch, keyed by product id
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PendingSelection {
    client_id: Option<i64>,
    items: BTreeMap<i64, u32>,
}

impl PendingSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn client_id(&self) -> Option<i64> {
        self.client_id
    }

    pub fn select_client(&mut self, client_id: i64) {
        self.client_id = Some(client_id);
    }

    /// Add units of a product. Repeated products accumulate; zero is ignored.
    pub fn add(&mut self, product_id: i64, quantity: u32) {
        if quantity == 0 {
            return;
        }
        let entry = self.items.entry(product_id).or_insert(0);
        *entry = entry.saturating_add(quantity);
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// `(product_id, quantity)` pairs in product id order
    pub fn items(&self) -> Vec<(i64, u32)> {
        self.items.iter().map(|(id, qty)| (*id, *qty)).collect()
    }

    /// Total cost of the selection at snapshot prices
    pub fn total(&self, catalog: &CatalogSnapshot) -> f64 {
        self.items
            .iter()
            .filter_map(|(id, qty)| catalog.product(*id).map(|p| p.price * f64::from(*qty)))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn product(id: i64, name: &str, price: f64) -> Product {
        Product {
            id,
            name: name.to_string(),
            price,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_pending_selection_accumulates() {
        let mut selection = PendingSelection::new();
        selection.add(1, 2);
        selection.add(1, 3);
        selection.add(2, 1);
        assert_eq!(selection.items(), vec![(1, 5), (2, 1)]);
    }

    #[test]
    fn test_pending_selection_ignores_zero() {
        let mut selection = PendingSelection::new();
        selection.add(1, 0);
        assert!(selection.is_empty());

        selection.add(2, 4);
        selection.add(2, 0);
        assert_eq!(selection.items(), vec![(2, 4)]);
    }

    #[test]
    fn test_pending_selection_total_skips_unknown_products() {
        let catalog = CatalogSnapshot::new(vec![], vec![product(1, "Beer", 5.0)]);
        let mut selection = PendingSelection::new();
        selection.add(1, 3);
        selection.add(99, 1);
        assert_eq!(selection.total(&catalog), 15.0);
    }
}
