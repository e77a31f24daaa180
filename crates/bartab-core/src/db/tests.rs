//! Database tests

use super::*;
use crate::models::*;

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::params;

    fn seed(db: &Database) -> (i64, i64, i64) {
        let alice = db.create_client(&NewClient::new("Alice")).unwrap();
        let beer = db.create_product(&NewProduct::new("Beer", 5.0)).unwrap();
        let chips = db.create_product(&NewProduct::new("Chips", 2.5)).unwrap();
        (alice, beer, chips)
    }

    #[test]
    fn test_in_memory_db() {
        let db = Database::in_memory().unwrap();
        assert!(db.list_clients().unwrap().is_empty());
        assert!(db.list_products().unwrap().is_empty());
    }

    #[test]
    fn test_schema_columns() {
        let db = Database::in_memory().unwrap();
        let conn = db.conn().unwrap();

        let result: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM pragma_table_info('transactions') WHERE name IN ('id', 'client_id', 'product_id', 'quantity', 'kind', 'created_at')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(result, 6, "transactions table should have 6 expected columns");
    }

    #[test]
    fn test_client_crud() {
        let db = Database::in_memory().unwrap();

        let id = db
            .create_client(&NewClient::new("  Zoe  ").with_phone("555-0100"))
            .unwrap();
        db.create_client(&NewClient::new("alice")).unwrap();

        let clients = db.list_clients().unwrap();
        assert_eq!(clients.len(), 2);
        // Ordered by name, case-insensitively
        assert_eq!(clients[0].name, "alice");
        assert_eq!(clients[1].name, "Zoe");
        assert_eq!(clients[1].phone.as_deref(), Some("555-0100"));

        db.update_client(id, Some("Zoey"), Some("")).unwrap();
        let updated = db.get_client(id).unwrap().unwrap();
        assert_eq!(updated.name, "Zoey");
        assert_eq!(updated.phone, None);

        assert_eq!(db.find_client_by_name("ZOEY").unwrap().unwrap().id, id);
        assert!(db.find_client_by_name("Nobody").unwrap().is_none());
    }

    #[test]
    fn test_client_name_validation() {
        let db = Database::in_memory().unwrap();
        assert!(matches!(
            db.create_client(&NewClient::new(" A ")),
            Err(Error::InvalidData(_))
        ));
        assert!(db.create_client(&NewClient::new("x".repeat(101))).is_err());
        assert!(db.list_clients().unwrap().is_empty());
    }

    #[test]
    fn test_update_missing_client() {
        let db = Database::in_memory().unwrap();
        assert!(matches!(
            db.update_client(42, Some("Ghost"), None),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn test_product_crud_and_rounding() {
        let db = Database::in_memory().unwrap();
        let id = db.create_product(&NewProduct::new("Wine", 7.499)).unwrap();

        let product = db.get_product(id).unwrap().unwrap();
        assert_eq!(product.price, 7.5);

        db.update_product(id, None, Some(8.0)).unwrap();
        assert_eq!(db.get_product(id).unwrap().unwrap().price, 8.0);

        assert!(db.create_product(&NewProduct::new("Gold", 1_000_000.0)).is_err());
        assert!(db.create_product(&NewProduct::new("Refund", -1.0)).is_err());
        assert!(db.update_product(id, None, Some(-2.0)).is_err());
    }

    #[test]
    fn test_balance_derivation() {
        let db = Database::in_memory().unwrap();
        let (alice, beer, _) = seed(&db);

        db.record_purchases(alice, &[(beer, 3)]).unwrap();
        db.record_payment(alice, 10.0).unwrap();

        assert_eq!(db.client_balance(alice).unwrap(), 5.0);
    }

    #[test]
    fn test_record_purchases_batch() {
        let db = Database::in_memory().unwrap();
        let (alice, beer, chips) = seed(&db);

        let ids = db.record_purchases(alice, &[(beer, 2), (chips, 4)]).unwrap();
        assert_eq!(ids.len(), 2);

        let tx = db.get_transaction(ids[1]).unwrap().unwrap();
        assert_eq!(tx.kind, TransactionKind::Debit);
        assert_eq!(tx.product_id, chips);
        assert_eq!(tx.quantity, 4.0);
        assert_eq!(db.client_balance(alice).unwrap(), 20.0);
    }

    #[test]
    fn test_record_purchases_is_atomic() {
        let db = Database::in_memory().unwrap();
        let (alice, beer, _) = seed(&db);

        let result = db.record_purchases(alice, &[(beer, 1), (999, 1)]);
        assert!(matches!(result, Err(Error::NotFound(_))));
        // Nothing from the failed batch was written
        assert!(db.list_client_history(alice).unwrap().is_empty());

        assert!(db.record_purchases(alice, &[(beer, 0)]).is_err());
        assert!(db.record_purchases(alice, &[]).is_err());
        assert!(db.record_purchases(12345, &[(beer, 1)]).is_err());
    }

    #[test]
    fn test_payment_uses_sentinel_product() {
        let db = Database::in_memory().unwrap();
        let (alice, _, _) = seed(&db);

        let id = db.record_payment(alice, 12.346).unwrap();
        let tx = db.get_transaction(id).unwrap().unwrap();
        assert!(tx.is_payment());
        assert_eq!(tx.kind, TransactionKind::Credit);
        assert_eq!(tx.quantity, 12.35);

        assert!(db.record_payment(alice, 0.0).is_err());
        assert!(db.record_payment(999, 5.0).is_err());
    }

    #[test]
    fn test_delete_client_cascades() {
        let db = Database::in_memory().unwrap();
        let (alice, beer, _) = seed(&db);
        let bob = db.create_client(&NewClient::new("Bob")).unwrap();

        db.record_purchases(alice, &[(beer, 1)]).unwrap();
        db.record_payment(alice, 2.0).unwrap();
        db.record_purchases(bob, &[(beer, 1)]).unwrap();

        assert_eq!(db.delete_client(alice).unwrap(), 2);
        assert!(db.get_client(alice).unwrap().is_none());

        let conn = db.conn().unwrap();
        let remaining: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM transactions WHERE client_id = ?",
                params![alice],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(remaining, 0);
        drop(conn);

        assert_eq!(db.list_client_history(bob).unwrap().len(), 1);
        assert!(matches!(db.delete_client(alice), Err(Error::NotFound(_))));
    }

    #[test]
    fn test_delete_product_keeps_history() {
        let db = Database::in_memory().unwrap();
        let (alice, beer, chips) = seed(&db);

        db.record_purchases(alice, &[(beer, 2), (chips, 1)]).unwrap();
        db.delete_product(beer).unwrap();

        let history = db.list_client_history(alice).unwrap();
        assert_eq!(history.len(), 2);

        let dangling = history
            .iter()
            .find(|e| e.transaction.product_id == beer)
            .unwrap();
        assert_eq!(dangling.product_name, None);
        assert_eq!(dangling.describe(), "product not found");

        // A deleted product no longer contributes to the balance
        assert_eq!(db.client_balance(alice).unwrap(), 2.5);
        assert!(db.delete_product(beer).is_err());
    }

    #[test]
    fn test_deleted_product_id_not_reused() {
        let db = Database::in_memory().unwrap();
        let alice = db.create_client(&NewClient::new("Alice")).unwrap();
        let beer = db.create_product(&NewProduct::new("Beer", 5.0)).unwrap();

        db.record_purchases(alice, &[(beer, 3)]).unwrap();
        db.delete_product(beer).unwrap();

        // Beer held the highest id; its replacement must not inherit it
        let caviar = db.create_product(&NewProduct::new("Caviar", 500.0)).unwrap();
        assert_ne!(caviar, beer);

        let history = db.list_client_history(alice).unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].describe(), "product not found");
        assert_eq!(db.client_balance(alice).unwrap(), 0.0);

        // A stale line for the deleted product is still rejected
        assert!(db.record_purchases(alice, &[(beer, 1)]).is_err());
    }

    #[test]
    fn test_deleted_client_id_not_reused() {
        let db = Database::in_memory().unwrap();
        let (alice, _, _) = seed(&db);
        db.delete_client(alice).unwrap();

        let bob = db.create_client(&NewClient::new("Bob")).unwrap();
        assert_ne!(bob, alice);
        assert!(db.get_client(alice).unwrap().is_none());
    }

    #[test]
    fn test_history_newest_first() {
        let db = Database::in_memory().unwrap();
        let (alice, beer, _) = seed(&db);

        let first = db.record_purchases(alice, &[(beer, 1)]).unwrap()[0];
        let second = db.record_payment(alice, 1.0).unwrap();

        let history = db.list_client_history(alice).unwrap();
        assert_eq!(history[0].transaction.id, second);
        assert_eq!(history[1].transaction.id, first);
        assert_eq!(history[0].describe(), "payment");
        assert_eq!(history[0].amount(), -1.0);
        assert_eq!(history[1].amount(), 5.0);
    }

    #[test]
    fn test_list_balances_includes_idle_clients() {
        let db = Database::in_memory().unwrap();
        let (alice, beer, _) = seed(&db);
        db.create_client(&NewClient::new("Bob")).unwrap();
        db.record_purchases(alice, &[(beer, 2)]).unwrap();

        let balances = db.list_balances().unwrap();
        assert_eq!(balances.len(), 2);
        assert_eq!(balances[0].client.name, "Alice");
        assert_eq!(balances[0].balance, 10.0);
        assert_eq!(balances[1].client.name, "Bob");
        assert_eq!(balances[1].balance, 0.0);
    }

    #[test]
    fn test_delete_transaction() {
        let db = Database::in_memory().unwrap();
        let (alice, beer, _) = seed(&db);
        let id = db.record_purchases(alice, &[(beer, 1)]).unwrap()[0];

        db.delete_transaction(id).unwrap();
        assert!(db.get_transaction(id).unwrap().is_none());
        assert!(db.delete_transaction(id).is_err());
    }

    #[test]
    fn test_catalog_snapshot_and_status() {
        let db = Database::in_memory().unwrap();
        let (alice, beer, _) = seed(&db);
        db.record_purchases(alice, &[(beer, 2)]).unwrap();

        let snapshot = db.catalog_snapshot().unwrap();
        assert_eq!(snapshot.clients.len(), 1);
        assert_eq!(snapshot.products.len(), 2);
        assert_eq!(snapshot.products[0].name, "Beer");

        let status = db.status().unwrap();
        assert_eq!(status.clients, 1);
        assert_eq!(status.products, 2);
        assert_eq!(status.transactions, 1);
        assert_eq!(status.outstanding, 10.0);
        assert!(db.last_activity(alice).unwrap().is_some());
    }

    #[test]
    fn test_soft_reset_keeps_catalog() {
        let db = Database::in_memory().unwrap();
        let (alice, beer, _) = seed(&db);
        db.record_purchases(alice, &[(beer, 2)]).unwrap();

        db.soft_reset().unwrap();

        assert_eq!(db.list_clients().unwrap().len(), 1);
        assert_eq!(db.list_products().unwrap().len(), 2);
        assert_eq!(db.client_balance(alice).unwrap(), 0.0);
    }

    #[test]
    fn test_is_encrypted_follows_passphrase() {
        let plain = Database::in_memory().unwrap();
        assert!(!plain.is_encrypted());

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("keyed.db");
        let keyed = Database::new_with_key(path.to_str().unwrap(), Some("hunter2")).unwrap();
        assert!(keyed.is_encrypted());
        keyed.create_client(&NewClient::new("Alice")).unwrap();
        assert_eq!(keyed.list_clients().unwrap().len(), 1);
    }
}
