//! Ledger operations: purchases, payments, history and balances

use chrono::Utc;
use rusqlite::{params, OptionalExtension};
use tracing::{debug, info};

use super::{parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{
    normalize_amount, round_cents, ClientBalance, HistoryEntry, Transaction, TransactionKind,
    PAYMENT_PRODUCT_ID,
};

/// Signed line amount used by every balance query.
/// Payments carry their amount in `quantity`; missing products count as zero.
const LINE_AMOUNT_SQL: &str = "
    (CASE WHEN t.product_id = 0 THEN t.quantity ELSE COALESCE(p.price, 0) * t.quantity END)
    * (CASE t.kind WHEN 'debit' THEN 1 ELSE -1 END)";

impl Database {
    fn row_to_transaction(row: &rusqlite::Row) -> rusqlite::Result<Transaction> {
        let kind_str: String = row.get(4)?;
        let created_at_str: String = row.get(5)?;
        Ok(Transaction {
            id: row.get(0)?,
            client_id: row.get(1)?,
            product_id: row.get(2)?,
            quantity: row.get(3)?,
            kind: kind_str.parse().unwrap_or(TransactionKind::Debit),
            created_at: parse_datetime(&created_at_str),
        })
    }

    /// Record a batch of purchases for one client as debit transactions
    ///
    /// The batch is all-or-nothing: an unknown client or product, or a zero
    /// quantity, rejects every line. Returns the new transaction ids.
    pub fn record_purchases(&self, client_id: i64, lines: &[(i64, u32)]) -> Result<Vec<i64>> {
        if lines.is_empty() {
            return Err(Error::InvalidData("No products selected".into()));
        }
        if let Some((product_id, _)) = lines.iter().find(|(_, qty)| *qty == 0) {
            return Err(Error::InvalidData(format!(
                "Quantity for product {} must be a positive integer",
                product_id
            )));
        }

        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        let client_exists: Option<i64> = tx
            .query_row("SELECT id FROM clients WHERE id = ?", params![client_id], |row| {
                row.get(0)
            })
            .optional()?;
        if client_exists.is_none() {
            return Err(Error::NotFound(format!("client {}", client_id)));
        }

        let mut ids = Vec::with_capacity(lines.len());
        {
            let mut product_check = tx.prepare("SELECT id FROM products WHERE id = ?")?;
            let mut insert = tx.prepare(
                "INSERT INTO transactions (client_id, product_id, quantity, kind) VALUES (?, ?, ?, 'debit')",
            )?;

            for (product_id, quantity) in lines {
                let found: Option<i64> = product_check
                    .query_row(params![product_id], |row| row.get(0))
                    .optional()?;
                if found.is_none() {
                    return Err(Error::NotFound(format!("product {}", product_id)));
                }
                insert.execute(params![client_id, product_id, f64::from(*quantity)])?;
                ids.push(tx.last_insert_rowid());
            }
        }

        tx.commit()?;
        info!(
            "Recorded {} purchase line(s) for client {}",
            ids.len(),
            client_id
        );
        Ok(ids)
    }

    /// Record a payment (credit) for a client
    pub fn record_payment(&self, client_id: i64, amount: f64) -> Result<i64> {
        let amount = normalize_amount(amount)?;
        if self.get_client(client_id)?.is_none() {
            return Err(Error::NotFound(format!("client {}", client_id)));
        }

        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO transactions (client_id, product_id, quantity, kind) VALUES (?, ?, ?, 'credit')",
            params![client_id, PAYMENT_PRODUCT_ID, amount],
        )?;
        let id = conn.last_insert_rowid();
        info!("Recorded payment of {:.2} for client {}", amount, client_id);
        Ok(id)
    }

    /// Get a transaction by ID
    pub fn get_transaction(&self, id: i64) -> Result<Option<Transaction>> {
        let conn = self.conn()?;
        let transaction = conn
            .query_row(
                "SELECT id, client_id, product_id, quantity, kind, created_at
                 FROM transactions WHERE id = ?",
                params![id],
                Self::row_to_transaction,
            )
            .optional()?;
        Ok(transaction)
    }

    /// Delete a single transaction
    pub fn delete_transaction(&self, id: i64) -> Result<()> {
        let conn = self.conn()?;
        let deleted = conn.execute("DELETE FROM transactions WHERE id = ?", params![id])?;
        if deleted == 0 {
            return Err(Error::NotFound(format!("transaction {}", id)));
        }
        Ok(())
    }

    /// A client's transactions joined with their products, newest first
    pub fn list_client_history(&self, client_id: i64) -> Result<Vec<HistoryEntry>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT t.id, t.client_id, t.product_id, t.quantity, t.kind, t.created_at,
                    p.name, p.price
             FROM transactions t
             LEFT JOIN products p ON p.id = t.product_id AND t.product_id != 0
             WHERE t.client_id = ?
             ORDER BY t.created_at DESC, t.id DESC",
        )?;

        let entries = stmt
            .query_map(params![client_id], |row| {
                Ok(HistoryEntry {
                    transaction: Self::row_to_transaction(row)?,
                    product_name: row.get(6)?,
                    unit_price: row.get(7)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        debug!(
            "Loaded {} history entries for client {}",
            entries.len(),
            client_id
        );
        Ok(entries)
    }

    /// Derived balance owed by a client (debits minus credits)
    pub fn client_balance(&self, client_id: i64) -> Result<f64> {
        let conn = self.conn()?;
        let balance: f64 = conn.query_row(
            &format!(
                "SELECT COALESCE(SUM({}), 0)
                 FROM transactions t
                 LEFT JOIN products p ON p.id = t.product_id
                 WHERE t.client_id = ?",
                LINE_AMOUNT_SQL
            ),
            params![client_id],
            |row| row.get(0),
        )?;
        Ok(round_cents(balance))
    }

    /// Balances for every client, ordered by client name
    pub fn list_balances(&self) -> Result<Vec<ClientBalance>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT c.id, c.name, c.phone, c.created_at,
                    COALESCE(SUM({}), 0)
             FROM clients c
             LEFT JOIN transactions t ON t.client_id = c.id
             LEFT JOIN products p ON p.id = t.product_id
             GROUP BY c.id
             ORDER BY c.name COLLATE NOCASE, c.id",
            LINE_AMOUNT_SQL
        ))?;

        let balances = stmt
            .query_map([], |row| {
                let balance: f64 = row.get(4)?;
                Ok(ClientBalance {
                    client: Self::row_to_client(row)?,
                    balance: round_cents(balance),
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(balances)
    }

    /// Time of the most recent transaction for a client, if any
    pub fn last_activity(&self, client_id: i64) -> Result<Option<chrono::DateTime<Utc>>> {
        let conn = self.conn()?;
        let last: Option<String> = conn.query_row(
            "SELECT MAX(created_at) FROM transactions WHERE client_id = ?",
            params![client_id],
            |row| row.get(0),
        )?;
        Ok(last.map(|s| parse_datetime(&s)))
    }
}
