//! Client operations

use rusqlite::{params, OptionalExtension};
use tracing::info;

use super::{parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{normalize_name, normalize_phone, Client, NewClient};

impl Database {
    pub(super) fn row_to_client(row: &rusqlite::Row) -> rusqlite::Result<Client> {
        let created_at_str: String = row.get(3)?;
        Ok(Client {
            id: row.get(0)?,
            name: row.get(1)?,
            phone: row.get(2)?,
            created_at: parse_datetime(&created_at_str),
        })
    }

    /// Create a client after validating the name
    pub fn create_client(&self, client: &NewClient) -> Result<i64> {
        let name = normalize_name(&client.name)?;
        let phone = normalize_phone(client.phone.as_deref());

        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO clients (name, phone) VALUES (?, ?)",
            params![name, phone],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// List all clients ordered by name
    pub fn list_clients(&self) -> Result<Vec<Client>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, name, phone, created_at FROM clients ORDER BY name COLLATE NOCASE, id",
        )?;

        let clients = stmt
            .query_map([], Self::row_to_client)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(clients)
    }

    /// Get a client by ID
    pub fn get_client(&self, id: i64) -> Result<Option<Client>> {
        let conn = self.conn()?;
        let client = conn
            .query_row(
                "SELECT id, name, phone, created_at FROM clients WHERE id = ?",
                params![id],
                Self::row_to_client,
            )
            .optional()?;

        Ok(client)
    }

    /// Find a client by exact name (case-insensitive)
    pub fn find_client_by_name(&self, name: &str) -> Result<Option<Client>> {
        let conn = self.conn()?;
        let client = conn
            .query_row(
                "SELECT id, name, phone, created_at FROM clients
                 WHERE name = ? COLLATE NOCASE ORDER BY id LIMIT 1",
                params![name.trim()],
                Self::row_to_client,
            )
            .optional()?;

        Ok(client)
    }

    /// Update a client's name and/or phone
    ///
    /// `phone: Some("")` clears the phone number.
    pub fn update_client(&self, id: i64, name: Option<&str>, phone: Option<&str>) -> Result<()> {
        let existing = self
            .get_client(id)?
            .ok_or_else(|| Error::NotFound(format!("client {}", id)))?;

        let name = match name {
            Some(n) => normalize_name(n)?,
            None => existing.name,
        };
        let phone = match phone {
            Some(p) => normalize_phone(Some(p)),
            None => existing.phone,
        };

        let conn = self.conn()?;
        conn.execute(
            "UPDATE clients SET name = ?, phone = ? WHERE id = ?",
            params![name, phone, id],
        )?;
        Ok(())
    }

    /// Delete a client and all of their transactions
    ///
    /// Returns the number of transactions removed.
    pub fn delete_client(&self, id: i64) -> Result<usize> {
        let conn = self.conn()?;

        conn.execute("BEGIN TRANSACTION", [])?;

        let result = (|| -> Result<usize> {
            let removed =
                conn.execute("DELETE FROM transactions WHERE client_id = ?", params![id])?;
            let deleted = conn.execute("DELETE FROM clients WHERE id = ?", params![id])?;
            if deleted == 0 {
                return Err(Error::NotFound(format!("client {}", id)));
            }
            Ok(removed)
        })();

        match result {
            Ok(removed) => {
                conn.execute("COMMIT", [])?;
                info!("Deleted client {} and {} transaction(s)", id, removed);
                Ok(removed)
            }
            Err(e) => {
                let _ = conn.execute("ROLLBACK", []);
                Err(e)
            }
        }
    }
}
