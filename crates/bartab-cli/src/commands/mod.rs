//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `autofill` - Receipt photo/text autofill
//! - `clients` - Client management commands
//! - `core` - Core commands (init) and shared utilities (open_db, resolvers)
//! - `products` - Product management commands
//! - `status` - Status and reset commands
//! - `transactions` - Tab commands (sell, pay, history, balances)

pub mod autofill;
pub mod clients;
pub mod core;
pub mod products;
pub mod status;
pub mod transactions;

// Re-export command functions for main.rs
pub use autofill::*;
pub use clients::*;
pub use core::*;
pub use products::*;
pub use status::*;
pub use transactions::*;

/// Truncate a string to a maximum length, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
