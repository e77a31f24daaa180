//! Receipt autofill: recognized text → proposed purchase batch
//!
//! - `parser` - line grammar for recognized text
//! - `matcher` - Levenshtein nearest-neighbour matching with a rejection threshold
//! - `reconcile` - resolves a parsed receipt against a catalog snapshot
//!
//! Nothing here touches the database or the recognition engine. Callers take
//! a `CatalogSnapshot`, feed in text, and decide what to do with the proposal.

pub mod matcher;
pub mod parser;
pub mod reconcile;

use thiserror::Error;

use crate::catalog::CatalogSnapshot;

pub use matcher::{find_best_match, levenshtein, MatchResult};
pub use parser::{parse_receipt, parse_receipt_text, ParsedItem, ParsedReceipt};
pub use reconcile::{reconcile, Reconciliation, ResolvedItem};

/// Conditions that stop an autofill. All of them are recoverable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AutofillError {
    /// The recognized text had no usable lines
    #[error("Nothing useful could be extracted from the image")]
    NothingRecognized,

    /// The client line did not match any known client
    #[error("No client matches '{query}'")]
    ClientUnresolved { query: String },
}

/// Parse recognized text and reconcile it against the catalog
pub fn autofill_text(
    raw: &str,
    catalog: &CatalogSnapshot,
) -> std::result::Result<Reconciliation, AutofillError> {
    let receipt = parse_receipt_text(raw);
    if receipt.is_empty() {
        return Err(AutofillError::NothingRecognized);
    }
    reconcile(&receipt, catalog)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Client, Product};
    use chrono::Utc;

    fn catalog() -> CatalogSnapshot {
        CatalogSnapshot::new(
            vec![Client {
                id: 1,
                name: "Alice".into(),
                phone: None,
                created_at: Utc::now(),
            }],
            vec![Product {
                id: 5,
                name: "Beer".into(),
                price: 5.0,
                created_at: Utc::now(),
            }],
        )
    }

    #[test]
    fn test_autofill_text_blank() {
        assert_eq!(
            autofill_text(" \n \n", &catalog()),
            Err(AutofillError::NothingRecognized)
        );
    }

    #[test]
    fn test_autofill_text_end_to_end() {
        let result = autofill_text("Alice\nBeer = 3\n", &catalog()).unwrap();
        assert_eq!(result.client.id, 1);
        assert_eq!(result.purchase_lines(), vec![(5, 3)]);
    }

    #[test]
    fn test_autofill_error_messages() {
        assert_eq!(
            AutofillError::ClientUnresolved {
                query: "Zyx".into()
            }
            .to_string(),
            "No client matches 'Zyx'"
        );
    }
}
