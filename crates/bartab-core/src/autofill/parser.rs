//! Line-oriented parser for recognized receipt text
//!
//! The expected layout is a client name on the first non-empty line, then one
//! item per line written as `description = quantity`:
//!
//! ```text
//! Alice
//! Beer = 3
//! Chips = 1
//! ```
//!
//! Anything that does not fit the item grammar is dropped without error, since
//! OCR output routinely contains stray fragments.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// One `description = quantity` line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedItem {
    pub product_name: String,
    pub quantity: u32,
}

/// Structured view of recognized text
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedReceipt {
    /// First usable line, not yet checked against the catalog
    pub client_name: Option<String>,
    pub items: Vec<ParsedItem>,
}

impl ParsedReceipt {
    /// True when no usable line was found at all
    pub fn is_empty(&self) -> bool {
        self.client_name.is_none() && self.items.is_empty()
    }
}

fn item_line() -> &'static Regex {
    static ITEM_LINE: OnceLock<Regex> = OnceLock::new();
    ITEM_LINE.get_or_init(|| Regex::new(r"^\s*(.+?)\s*=\s*([0-9]+)\s*$").expect("valid regex"))
}

/// Parse recognized text, tolerating a missing result
pub fn parse_receipt(raw: Option<&str>) -> ParsedReceipt {
    raw.map(parse_receipt_text).unwrap_or_default()
}

/// Parse recognized text into a client name and item lines
pub fn parse_receipt_text(raw: &str) -> ParsedReceipt {
    let mut lines = raw.lines().map(str::trim).filter(|line| !line.is_empty());

    let Some(client_name) = lines.next() else {
        return ParsedReceipt::default();
    };

    let items = lines.filter_map(parse_item_line).collect();

    ParsedReceipt {
        client_name: Some(client_name.to_string()),
        items,
    }
}

/// Parse a single `description = quantity` line
pub fn parse_item_line(line: &str) -> Option<ParsedItem> {
    let caps = item_line().captures(line)?;
    // Digit runs that overflow u32 are treated like any other malformed line
    let quantity = caps[2].parse::<u32>().ok()?;
    Some(ParsedItem {
        product_name: caps[1].to_string(),
        quantity,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str, quantity: u32) -> ParsedItem {
        ParsedItem {
            product_name: name.to_string(),
            quantity,
        }
    }

    #[test]
    fn test_parse_well_formed() {
        let parsed = parse_receipt_text("Alice\nBeer = 3\nChips = 1");
        assert_eq!(parsed.client_name.as_deref(), Some("Alice"));
        assert_eq!(parsed.items, vec![item("Beer", 3), item("Chips", 1)]);
    }

    #[test]
    fn test_parse_drops_malformed_lines() {
        let parsed = parse_receipt_text("Alice\nBeer 3\nChips = 1");
        assert_eq!(parsed.client_name.as_deref(), Some("Alice"));
        assert_eq!(parsed.items, vec![item("Chips", 1)]);
    }

    #[test]
    fn test_parse_empty_input() {
        assert_eq!(parse_receipt_text(""), ParsedReceipt::default());
        assert_eq!(parse_receipt_text("  \n\t\n   "), ParsedReceipt::default());
        assert_eq!(parse_receipt(None), ParsedReceipt::default());
        assert!(parse_receipt(None).is_empty());
    }

    #[test]
    fn test_parse_skips_blank_lines_before_client() {
        let parsed = parse_receipt_text("\n\n   Bob  \n\n Wine=2 \n");
        assert_eq!(parsed.client_name.as_deref(), Some("Bob"));
        assert_eq!(parsed.items, vec![item("Wine", 2)]);
    }

    #[test]
    fn test_parse_client_line_taken_unconditionally() {
        // The first line is the client even if it looks like an item
        let parsed = parse_receipt_text("Beer = 3\nChips = 1");
        assert_eq!(parsed.client_name.as_deref(), Some("Beer = 3"));
        assert_eq!(parsed.items, vec![item("Chips", 1)]);
    }

    #[test]
    fn test_parse_client_only() {
        let parsed = parse_receipt_text("Alice");
        assert_eq!(parsed.client_name.as_deref(), Some("Alice"));
        assert!(parsed.items.is_empty());
        assert!(!parsed.is_empty());
    }

    #[test]
    fn test_parse_item_line_variants() {
        assert_eq!(parse_item_line("Beer=3"), Some(item("Beer", 3)));
        assert_eq!(parse_item_line("  Dark Beer   =   12  "), Some(item("Dark Beer", 12)));
        assert_eq!(parse_item_line("a = b = 4"), Some(item("a = b", 4)));
        assert_eq!(parse_item_line("Beer = 0"), Some(item("Beer", 0)));
        assert_eq!(parse_item_line("Beer = three"), None);
        assert_eq!(parse_item_line("Beer = 3.5"), None);
        assert_eq!(parse_item_line("Beer = -3"), None);
        assert_eq!(parse_item_line("= 3"), None);
        assert_eq!(parse_item_line("Beer ="), None);
    }

    #[test]
    fn test_parse_item_line_overflow_dropped() {
        assert_eq!(parse_item_line("Beer = 99999999999"), None);
    }

    #[test]
    fn test_parse_windows_line_endings() {
        let parsed = parse_receipt_text("Alice\r\nBeer = 2\r\n");
        assert_eq!(parsed.client_name.as_deref(), Some("Alice"));
        assert_eq!(parsed.items, vec![item("Beer", 2)]);
    }

    #[test]
    fn test_parse_preserves_item_order() {
        let parsed = parse_receipt_text("Alice\nZ = 1\nA = 2\nM = 3");
        let names: Vec<_> = parsed.items.iter().map(|i| i.product_name.as_str()).collect();
        assert_eq!(names, vec!["Z", "A", "M"]);
    }
}
