//! Bartab Core Library
//!
//! Shared functionality for the bartab ledger:
//! - Database access and migrations (clients, products, transactions)
//! - Catalog snapshots and pending purchase selections
//! - Receipt autofill: line parsing, fuzzy name matching, reconciliation
//! - Pluggable text recognition engines (Tesseract, Ollama vision)
//! - Recognizer configuration with embedded defaults

pub mod autofill;
pub mod catalog;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod recognizer;

/// Test utilities including mock Ollama server
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use autofill::{
    autofill_text, find_best_match, levenshtein, parse_receipt, parse_receipt_text, reconcile,
    AutofillError, MatchResult, ParsedItem, ParsedReceipt, Reconciliation, ResolvedItem,
};
pub use catalog::{CatalogSnapshot, PendingSelection};
pub use config::{EngineKind, RecognizerConfig};
pub use db::Database;
pub use error::{Error, Result};
pub use models::{
    format_currency, Client, ClientBalance, HistoryEntry, LedgerStatus, NewClient, NewProduct,
    Product, Transaction, TransactionKind, PAYMENT_PRODUCT_ID,
};
pub use recognizer::{
    MockRecognizer, OllamaVisionRecognizer, RecognitionProgress, TesseractRecognizer,
    TextRecognizer,
};
