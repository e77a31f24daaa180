//! Database access layer with connection pooling and migrations
//!
//! This module is organized by domain:
//! - `clients` - Client CRUD (delete cascades to the client's transactions)
//! - `products` - Product CRUD (delete leaves history untouched)
//! - `transactions` - Purchases, payments, history and balances

use chrono::{DateTime, Utc};
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use tracing::info;

use crate::catalog::CatalogSnapshot;
use crate::error::{Error, Result};
use crate::models::LedgerStatus;

mod clients;
mod products;
mod transactions;

pub type DbPool = Pool<SqliteConnectionManager>;
pub type DbConn = PooledConnection<SqliteConnectionManager>;

/// Environment variable for database encryption key
pub const DB_KEY_ENV: &str = "BARTAB_DB_KEY";

/// Derive an encryption key from a passphrase using Argon2
///
/// Uses a fixed application salt so the same passphrase always produces the same key,
/// regardless of database path.
fn derive_key(passphrase: &str) -> Result<String> {
    use argon2::{password_hash::SaltString, Argon2, PasswordHasher};

    // Changing this would invalidate all existing encrypted databases
    const APP_SALT: &[u8; 16] = b"bartab-salt-v1-x";

    let salt = SaltString::encode_b64(APP_SALT)
        .map_err(|e| Error::Encryption(format!("Failed to create salt: {}", e)))?;

    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(passphrase.as_bytes(), &salt)
        .map_err(|e| Error::Encryption(format!("Failed to derive key: {}", e)))?;

    let hash_str = hash
        .hash
        .ok_or_else(|| Error::Encryption("No hash output".to_string()))?;
    Ok(hex::encode(hash_str.as_bytes()))
}

/// Parse a SQLite datetime string into a DateTime<Utc>
pub(crate) fn parse_datetime(s: &str) -> DateTime<Utc> {
    // SQLite stores as "YYYY-MM-DD HH:MM:SS" format
    chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .map(|dt| dt.and_utc())
        .unwrap_or_else(|_| Utc::now())
}

/// Database wrapper with connection pooling
#[derive(Clone)]
pub struct Database {
    pool: DbPool,
    /// Whether connections are keyed with a SQLCipher passphrase
    encrypted: bool,
}

impl Database {
    /// Create a new database connection pool with encryption
    ///
    /// Requires `BARTAB_DB_KEY` environment variable to be set. Use
    /// `new_unencrypted()` for development/testing without encryption.
    pub fn new(path: &str) -> Result<Self> {
        match std::env::var(DB_KEY_ENV).ok() {
            Some(key) => Self::new_with_key(path, Some(&key)),
            None => Err(Error::Encryption(format!(
                "Database encryption required. Set {} environment variable with your passphrase, \
                or use --no-encrypt for an unencrypted database.",
                DB_KEY_ENV
            ))),
        }
    }

    /// Create a new unencrypted database connection pool
    pub fn new_unencrypted(path: &str) -> Result<Self> {
        Self::new_with_key(path, None)
    }

    /// Create a new database with an explicit encryption key
    pub fn new_with_key(path: &str, passphrase: Option<&str>) -> Result<Self> {
        let key_pragma = passphrase
            .map(derive_key)
            .transpose()?
            .map(|key| format!("PRAGMA key = 'x\"{}\"';", key));

        // Foreign keys are per-connection in SQLite, so set them on every checkout
        let manager = SqliteConnectionManager::file(path).with_init(move |conn| {
            if let Some(pragma) = &key_pragma {
                conn.execute_batch(pragma)?;
            }
            conn.execute_batch("PRAGMA foreign_keys = ON;")?;
            Ok(())
        });

        let pool = Pool::builder().max_size(10).build(manager)?;

        let db = Self {
            pool,
            encrypted: passphrase.is_some(),
        };
        db.run_migrations()?;

        Ok(db)
    }

    /// Create a throwaway database (for testing)
    ///
    /// Uses a temporary file rather than `:memory:` because every pooled
    /// connection to `:memory:` would see its own empty database.
    pub fn in_memory() -> Result<Self> {
        use std::sync::atomic::{AtomicU64, Ordering};
        static COUNTER: AtomicU64 = AtomicU64::new(0);

        let id = COUNTER.fetch_add(1, Ordering::SeqCst);
        let path = std::env::temp_dir().join(format!(
            "bartab_test_{}_{}.db",
            std::process::id(),
            id
        ));
        let path = path.to_string_lossy().to_string();

        for suffix in ["", "-wal", "-shm"] {
            let _ = std::fs::remove_file(format!("{}{}", path, suffix));
        }

        Self::new_unencrypted(&path)
    }

    /// Whether this handle was opened with a passphrase
    pub fn is_encrypted(&self) -> bool {
        self.encrypted
    }

    /// Get a connection from the pool
    pub fn conn(&self) -> Result<DbConn> {
        Ok(self.pool.get()?)
    }

    /// Read clients and products in one go for matching
    pub fn catalog_snapshot(&self) -> Result<CatalogSnapshot> {
        Ok(CatalogSnapshot::new(
            self.list_clients()?,
            self.list_products()?,
        ))
    }

    /// Row counts and the total amount currently owed
    pub fn status(&self) -> Result<LedgerStatus> {
        let conn = self.conn()?;
        let count = |table: &str| -> Result<i64> {
            Ok(conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
                row.get(0)
            })?)
        };

        let clients = count("clients")?;
        let products = count("products")?;
        let transactions = count("transactions")?;
        drop(conn);

        let outstanding = self
            .list_balances()?
            .iter()
            .map(|b| b.balance)
            .filter(|b| *b > 0.0)
            .sum();

        Ok(LedgerStatus {
            clients,
            products,
            transactions,
            outstanding: crate::models::round_cents(outstanding),
        })
    }

    /// Soft reset: clear the ledger but keep clients and products
    pub fn soft_reset(&self) -> Result<()> {
        let conn = self.conn()?;
        conn.execute_batch("DELETE FROM transactions;")?;
        info!("Database soft reset complete");
        Ok(())
    }

    /// Run database migrations
    fn run_migrations(&self) -> Result<()> {
        let conn = self.conn()?;

        conn.execute_batch(
            r#"
            -- WAL mode: readers don't block writers
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;

            -- AUTOINCREMENT: ids of deleted rows are never handed out again
            CREATE TABLE IF NOT EXISTS clients (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                phone TEXT,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );

            CREATE INDEX IF NOT EXISTS idx_clients_name ON clients(name COLLATE NOCASE);

            CREATE TABLE IF NOT EXISTS products (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                price REAL NOT NULL CHECK (price >= 0 AND price <= 999999.99),
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );

            CREATE INDEX IF NOT EXISTS idx_products_name ON products(name COLLATE NOCASE);

            -- product_id has no foreign key: 0 marks a payment, and rows for
            -- deleted products are kept as history
            CREATE TABLE IF NOT EXISTS transactions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                client_id INTEGER NOT NULL REFERENCES clients(id) ON DELETE CASCADE,
                product_id INTEGER NOT NULL,
                quantity REAL NOT NULL CHECK (quantity > 0),
                kind TEXT NOT NULL CHECK (kind IN ('debit', 'credit')),
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );

            CREATE INDEX IF NOT EXISTS idx_transactions_client ON transactions(client_id);
            CREATE INDEX IF NOT EXISTS idx_transactions_product ON transactions(product_id);
            "#,
        )?;

        info!("Database schema initialized");
        Ok(())
    }
}

#[cfg(test)]
mod tests;
