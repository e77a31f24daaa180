//! Map a parsed receipt onto the catalog

use serde::Serialize;
use tracing::{debug, info};

use super::matcher::{resolve, MatchResult};
use super::parser::ParsedReceipt;
use super::AutofillError;
use crate::catalog::{CatalogSnapshot, PendingSelection};
use crate::models::{Client, Product};

/// A receipt line that matched a catalog product
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedItem {
    pub product: Product,
    pub quantity: u32,
    /// Text as it appeared in the receipt
    pub source_text: String,
}

/// Proposal produced from one receipt
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reconciliation {
    pub client: Client,
    pub items: Vec<ResolvedItem>,
    /// Item texts that had no acceptable product match, in receipt order
    pub unresolved: Vec<String>,
}

impl Reconciliation {
    pub fn all_items_found(&self) -> bool {
        self.unresolved.is_empty()
    }

    /// `(product_id, quantity)` pairs in receipt order
    pub fn purchase_lines(&self) -> Vec<(i64, u32)> {
        self.items
            .iter()
            .map(|item| (item.product.id, item.quantity))
            .collect()
    }

    /// Write the client and resolved items into a pending selection
    pub fn apply_to(&self, selection: &mut PendingSelection) {
        selection.select_client(self.client.id);
        for item in &self.items {
            selection.add(item.product.id, item.quantity);
        }
    }

    /// Cost of the resolved items at snapshot prices
    pub fn total(&self) -> f64 {
        self.items
            .iter()
            .map(|item| item.product.price * f64::from(item.quantity))
            .sum()
    }
}

/// Resolve a parsed receipt against a catalog snapshot
///
/// The client must resolve before any item is looked at: a proposal is never
/// built around a guessed client. Items resolve independently and misses are
/// collected rather than raised.
pub fn reconcile(
    receipt: &ParsedReceipt,
    catalog: &CatalogSnapshot,
) -> Result<Reconciliation, AutofillError> {
    let client_query = receipt
        .client_name
        .as_deref()
        .ok_or(AutofillError::NothingRecognized)?;

    let client = match resolve(client_query, &catalog.clients, |c| c.name.as_str()) {
        MatchResult::Resolved(client) => client.clone(),
        MatchResult::Unresolved { query } => {
            info!("No client matches '{}'", query);
            return Err(AutofillError::ClientUnresolved { query });
        }
    };
    debug!("Receipt client '{}' resolved to #{}", client_query, client.id);

    let mut items = Vec::new();
    let mut unresolved = Vec::new();

    for parsed in &receipt.items {
        match resolve(&parsed.product_name, &catalog.products, |p| p.name.as_str()) {
            MatchResult::Resolved(product) => {
                debug!(
                    "Receipt item '{}' resolved to product #{}",
                    parsed.product_name, product.id
                );
                items.push(ResolvedItem {
                    product: product.clone(),
                    quantity: parsed.quantity,
                    source_text: parsed.product_name.clone(),
                });
            }
            MatchResult::Unresolved { query } => unresolved.push(query),
        }
    }

    info!(
        "Reconciled receipt for '{}': {} item(s) resolved, {} unresolved",
        client.name,
        items.len(),
        unresolved.len()
    );

    Ok(Reconciliation {
        client,
        items,
        unresolved,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::autofill::parser::{parse_receipt_text, ParsedItem};
    use chrono::Utc;

    fn client(id: i64, name: &str) -> Client {
        Client {
            id,
            name: name.to_string(),
            phone: None,
            created_at: Utc::now(),
        }
    }

    fn product(id: i64, name: &str, price: f64) -> Product {
        Product {
            id,
            name: name.to_string(),
            price,
            created_at: Utc::now(),
        }
    }

    fn catalog() -> CatalogSnapshot {
        CatalogSnapshot::new(
            vec![client(1, "Alice"), client(2, "Bob")],
            vec![product(10, "Beer", 5.0), product(11, "Chips", 2.5)],
        )
    }

    fn receipt(client_name: &str, items: &[(&str, u32)]) -> ParsedReceipt {
        ParsedReceipt {
            client_name: Some(client_name.to_string()),
            items: items
                .iter()
                .map(|(name, quantity)| ParsedItem {
                    product_name: name.to_string(),
                    quantity: *quantity,
                })
                .collect(),
        }
    }

    #[test]
    fn test_reconcile_partial_success() {
        let result = reconcile(&receipt("Alice", &[("Beer", 2), ("Soda", 1)]), &catalog()).unwrap();

        assert_eq!(result.client.id, 1);
        assert_eq!(result.items.len(), 1);
        assert_eq!(result.items[0].product.name, "Beer");
        assert_eq!(result.items[0].quantity, 2);
        assert_eq!(result.unresolved, vec!["Soda".to_string()]);
        assert!(!result.all_items_found());
    }

    #[test]
    fn test_reconcile_client_short_circuit() {
        let err = reconcile(&receipt("Zyx", &[("Beer", 1), ("Chips", 1)]), &catalog()).unwrap_err();
        assert_eq!(
            err,
            AutofillError::ClientUnresolved {
                query: "Zyx".to_string()
            }
        );
    }

    #[test]
    fn test_reconcile_empty_receipt() {
        let err = reconcile(&ParsedReceipt::default(), &catalog()).unwrap_err();
        assert_eq!(err, AutofillError::NothingRecognized);
    }

    #[test]
    fn test_reconcile_noisy_text() {
        let parsed = parse_receipt_text("  alise \nBeeer = 3\nChps = 2\nTOTAL 12\n");
        let result = reconcile(&parsed, &catalog()).unwrap();

        assert_eq!(result.client.name, "Alice");
        assert_eq!(result.purchase_lines(), vec![(10, 3), (11, 2)]);
        assert!(result.all_items_found());
        assert_eq!(result.total(), 20.0);
    }

    #[test]
    fn test_reconcile_client_without_items() {
        let result = reconcile(&receipt("Bob", &[]), &catalog()).unwrap();
        assert_eq!(result.client.id, 2);
        assert!(result.items.is_empty());
        assert!(result.all_items_found());
    }

    #[test]
    fn test_reconcile_with_empty_catalog() {
        let err = reconcile(&receipt("Alice", &[("Beer", 1)]), &CatalogSnapshot::default()).unwrap_err();
        assert!(matches!(err, AutofillError::ClientUnresolved { .. }));
    }

    #[test]
    fn test_apply_to_selection() {
        let result = reconcile(
            &receipt("Alice", &[("Beer", 2), ("beer", 1), ("Chips", 1)]),
            &catalog(),
        )
        .unwrap();

        let mut selection = PendingSelection::new();
        result.apply_to(&mut selection);

        assert_eq!(selection.client_id(), Some(1));
        assert_eq!(selection.items(), vec![(10, 3), (11, 1)]);
    }
}
