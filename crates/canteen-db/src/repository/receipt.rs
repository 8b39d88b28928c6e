//! # Receipt Repository
//!
//! Read-only access to receipt history. Receipts and their lines are written
//! exactly once, by checkout, inside the purchase transaction; nothing here
//! mutates them.
//!
//! ## Reconstruction
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Receipt Reconstruction                              │
//! │                                                                         │
//! │  details(receipt_id)                                                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  receipt_lines ──JOIN──► items                                         │
//! │  (receipt_id,            (name, price, ...)                            │
//! │   item_id, qty)                                                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Vec<ItemOrder>  =  current item record + purchased quantity           │
//! │                                                                         │
//! │  Lines store no unit price. The join reprices against the current      │
//! │  catalog, so after a price change the recomputed line totals diverge   │
//! │  from receipt.total, which keeps the amount actually debited.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use canteen_core::{ItemOrder, Receipt};

/// Repository for receipt history reads.
#[derive(Debug, Clone)]
pub struct ReceiptRepository {
    pool: SqlitePool,
}

impl ReceiptRepository {
    /// Creates a new ReceiptRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ReceiptRepository { pool }
    }

    /// Gets a receipt by id.
    ///
    /// ## Returns
    /// * `Ok(Some(Receipt))` - Receipt found
    /// * `Ok(None)` - Receipt not found
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Receipt>> {
        let receipt = sqlx::query_as::<_, Receipt>(
            r#"
            SELECT id, customer_id, payment_method, created_at, total
            FROM receipts
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(receipt)
    }

    /// Lists a customer's receipts, newest first.
    ///
    /// Store-assigned receipt ids are monotonic, so id order is purchase
    /// order even when timestamps collide.
    pub async fn list_by_customer(&self, customer_id: &str) -> DbResult<Vec<Receipt>> {
        let receipts = sqlx::query_as::<_, Receipt>(
            r#"
            SELECT id, customer_id, payment_method, created_at, total
            FROM receipts
            WHERE customer_id = ?1
            ORDER BY id DESC
            "#,
        )
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(receipts)
    }

    /// Reconstructs the lines of a receipt as full item records with
    /// quantities.
    ///
    /// ## Known Limitation
    /// Lines store no unit price, so this reprices against the *current*
    /// catalog. After a price change the recomputed line totals no longer sum
    /// to `receipt.total`; the receipt keeps the amount actually debited.
    ///
    /// ## Returns
    /// One entry per distinct purchased item. An unknown receipt id yields an
    /// empty list, not an error.
    pub async fn details(&self, receipt_id: i64) -> DbResult<Vec<ItemOrder>> {
        debug!(receipt_id = %receipt_id, "Reconstructing receipt lines");

        let orders = sqlx::query_as::<_, ItemOrder>(
            r#"
            SELECT
                i.id,
                i.category,
                i.name,
                i.price,
                i.description,
                i.stock,
                i.created_at,
                i.updated_at,
                l.quantity
            FROM receipt_lines l
            INNER JOIN items i ON i.id = l.item_id
            WHERE l.receipt_id = ?1
            ORDER BY l.item_id
            "#,
        )
        .bind(receipt_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(orders)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use canteen_core::{CartLine, ItemCategory, Money, NewCustomer, NewItem, PaymentMethod};

    async fn seeded_db() -> Database {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        db.customers()
            .insert(&NewCustomer {
                id: "CARD-001".to_string(),
                name: "An Nguyen".to_string(),
                customer_type: "student".to_string(),
            })
            .await
            .unwrap();
        db.customers()
            .top_up("CARD-001", Money::from_minor(100000))
            .await
            .unwrap();

        for (id, name, price) in [(10, "Beef Noodles", 12000), (11, "Spring Rolls", 12000)] {
            db.catalog()
                .insert_with_id(
                    id,
                    &NewItem {
                        category: ItemCategory::Food,
                        name: name.to_string(),
                        price: Money::from_minor(price),
                        description: String::new(),
                        stock: 50,
                    },
                )
                .await
                .unwrap();
        }

        db
    }

    #[tokio::test]
    async fn test_get_and_list_newest_first() {
        let db = seeded_db().await;
        let checkout = db.checkout();

        let first = checkout
            .submit_purchase(
                "CARD-001",
                &[CartLine { item_id: 10, quantity: 1 }],
                PaymentMethod::Balance,
            )
            .await
            .unwrap();
        let second = checkout
            .submit_purchase(
                "CARD-001",
                &[CartLine { item_id: 11, quantity: 2 }],
                PaymentMethod::Cash,
            )
            .await
            .unwrap();

        let receipt = db.receipts().get_by_id(first).await.unwrap().unwrap();
        assert_eq!(receipt.customer_id, "CARD-001");
        assert_eq!(receipt.total, Money::from_minor(12000));
        assert_eq!(receipt.payment_method, PaymentMethod::Balance);

        let history = db.receipts().list_by_customer("CARD-001").await.unwrap();
        let ids: Vec<i64> = history.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![second, first]);

        assert!(db
            .receipts()
            .list_by_customer("CARD-404")
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_details_returns_lines_with_items() {
        let db = seeded_db().await;

        let receipt_id = db
            .checkout()
            .submit_purchase(
                "CARD-001",
                &[
                    CartLine { item_id: 10, quantity: 2 },
                    CartLine { item_id: 11, quantity: 1 },
                ],
                PaymentMethod::Balance,
            )
            .await
            .unwrap();

        let orders = db.receipts().details(receipt_id).await.unwrap();
        assert_eq!(orders.len(), 2);
        assert_eq!(orders[0].item.id, 10);
        assert_eq!(orders[0].item.name, "Beef Noodles");
        assert_eq!(orders[0].quantity, 2);
        assert_eq!(orders[1].item.id, 11);
        assert_eq!(orders[1].quantity, 1);
    }

    #[tokio::test]
    async fn test_details_unknown_receipt_is_empty() {
        let db = seeded_db().await;

        let orders = db.receipts().details(9999).await.unwrap();
        assert!(orders.is_empty());

        assert!(db.receipts().get_by_id(9999).await.unwrap().is_none());
    }
}
