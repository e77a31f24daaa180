//! Domain models for bartab

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Product id reserved for payments (credits not tied to a product)
pub const PAYMENT_PRODUCT_ID: i64 = 0;

/// Minimum display name length (after trimming)
pub const NAME_MIN_LEN: usize = 2;

/// Maximum display name length (after trimming)
pub const NAME_MAX_LEN: usize = 100;

/// Largest price a product can carry
pub const MAX_PRICE: f64 = 999_999.99;

/// A client running a tab
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    pub id: i64,
    pub name: String,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A client to be created (before DB insertion)
#[derive(Debug, Clone, Default)]
pub struct NewClient {
    pub name: String,
    pub phone: Option<String>,
}

impl NewClient {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            phone: None,
        }
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }
}

/// A product on the menu
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    /// Unit price, always rounded to cents
    pub price: f64,
    pub created_at: DateTime<Utc>,
}

/// A product to be created (before DB insertion)
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub price: f64,
}

impl NewProduct {
    pub fn new(name: impl Into<String>, price: f64) -> Self {
        Self {
            name: name.into(),
            price,
        }
    }
}

/// Direction of a transaction relative to the amount a client owes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Consumption, increases the balance owed
    Debit,
    /// Payment, decreases the balance owed
    Credit,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Debit => "debit",
            Self::Credit => "credit",
        }
    }
}

impl std::str::FromStr for TransactionKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "debit" => Ok(Self::Debit),
            "credit" => Ok(Self::Credit),
            _ => Err(format!("Unknown transaction kind: {}", s)),
        }
    }
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A ledger entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub client_id: i64,
    /// Product purchased, or `PAYMENT_PRODUCT_ID` for a payment
    pub product_id: i64,
    /// Unit count for purchases; the monetary amount for payments
    pub quantity: f64,
    pub kind: TransactionKind,
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    pub fn is_payment(&self) -> bool {
        self.product_id == PAYMENT_PRODUCT_ID
    }
}

/// A transaction joined with its product for display
#[derive(Debug, Clone, Serialize)]
pub struct HistoryEntry {
    pub transaction: Transaction,
    /// `None` for payments and for products deleted after the fact
    pub product_name: Option<String>,
    /// Unit price at read time, `None` when there is no product
    pub unit_price: Option<f64>,
}

impl HistoryEntry {
    /// Signed contribution of this entry to the client's balance
    pub fn amount(&self) -> f64 {
        let gross = if self.transaction.is_payment() {
            self.transaction.quantity
        } else {
            self.unit_price.unwrap_or(0.0) * self.transaction.quantity
        };
        match self.transaction.kind {
            TransactionKind::Debit => gross,
            TransactionKind::Credit => -gross,
        }
    }

    /// Human-readable label for the entry
    pub fn describe(&self) -> String {
        if self.transaction.is_payment() {
            return "payment".to_string();
        }
        match &self.product_name {
            Some(name) => format!("{} x{}", name, self.transaction.quantity),
            None => "product not found".to_string(),
        }
    }
}

/// A client with their derived balance
#[derive(Debug, Clone, Serialize)]
pub struct ClientBalance {
    pub client: Client,
    pub balance: f64,
}

/// Row counts for the status command
#[derive(Debug, Clone, Default, Serialize)]
pub struct LedgerStatus {
    pub clients: i64,
    pub products: i64,
    pub transactions: i64,
    pub outstanding: f64,
}

/// Trim and validate a display name
pub fn normalize_name(name: &str) -> Result<String> {
    let trimmed = name.trim();
    let len = trimmed.chars().count();
    if !(NAME_MIN_LEN..=NAME_MAX_LEN).contains(&len) {
        return Err(Error::InvalidData(format!(
            "Name must be between {} and {} characters (got {})",
            NAME_MIN_LEN, NAME_MAX_LEN, len
        )));
    }
    Ok(trimmed.to_string())
}

/// Trim a phone number, mapping blank input to `None`
pub fn normalize_phone(phone: Option<&str>) -> Option<String> {
    phone
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(String::from)
}

/// Validate a price and round it to cents
pub fn normalize_price(price: f64) -> Result<f64> {
    if !price.is_finite() || price < 0.0 {
        return Err(Error::InvalidData(format!(
            "Price must be a non-negative number (got {})",
            price
        )));
    }
    let rounded = round_cents(price);
    if rounded > MAX_PRICE {
        return Err(Error::InvalidData(format!(
            "Price must not exceed {:.2} (got {:.2})",
            MAX_PRICE, rounded
        )));
    }
    Ok(rounded)
}

/// Validate a payment amount and round it to cents
pub fn normalize_amount(amount: f64) -> Result<f64> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(Error::InvalidData(format!(
            "Payment amount must be positive (got {})",
            amount
        )));
    }
    let rounded = round_cents(amount);
    if rounded <= 0.0 {
        return Err(Error::InvalidData(format!(
            "Payment amount must be at least 0.01 (got {})",
            amount
        )));
    }
    Ok(rounded)
}

/// Round to two decimal places
pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Format an amount as `$1,234.50` (negative amounts as `-$1,234.50`)
pub fn format_currency(amount: f64) -> String {
    let cents = (amount * 100.0).round() as i64;
    let sign = if cents < 0 { "-" } else { "" };
    let cents = cents.unsigned_abs();
    let whole = (cents / 100).to_string();

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{}${}.{:02}", sign, grouped, cents % 100)
}
