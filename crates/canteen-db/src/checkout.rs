//! # Checkout: The Purchase Transaction
//!
//! Converts a validated cart into durable records with all-or-nothing
//! semantics: one receipt, one line per distinct cart item, one balance
//! debit, one stock decrement per line — committed together or not at all.
//!
//! ## Transaction Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                  submit_purchase("CARD-001", cart, method)              │
//! │                                                                         │
//! │  PHASE 1: VALIDATE (pool reads, nothing written yet)                   │
//! │  ├── cart shape          → EmptyCart / CartTooLarge / InvalidQuantity  │
//! │  ├── resolve every item  → ItemNotFound aborts the whole call          │
//! │  ├── total = Σ price × quantity                                        │
//! │  ├── load customer       → CustomerNotFound                            │
//! │  ├── balance < total?    → InsufficientFunds                           │
//! │  └── stock < quantity?   → InsufficientStock                           │
//! │                                                                         │
//! │  PHASE 2: EXECUTE (single transaction)                                 │
//! │  ├── BEGIN                                                             │
//! │  ├── INSERT receipt                → store-assigned id                 │
//! │  ├── INSERT receipt_line × N       → references that id                │
//! │  ├── UPDATE balance - total        → guarded: balance >= total         │
//! │  ├── UPDATE stock - quantity × N   → guarded: stock >= quantity        │
//! │  └── COMMIT                                                            │
//! │                                                                         │
//! │  ANY failure (constraint, lost connection, a guard matching zero       │
//! │  rows, the caller dropping the future) rolls the whole set back.       │
//! │  No receipt without lines, no lines without a debit, ever.             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Why Guards Run Twice
//! The phase-1 checks read from the pool, outside the transaction, so a
//! concurrent purchase can drain the balance (or the stock) between check
//! and commit. The in-transaction UPDATEs repeat the predicate; matching
//! zero rows means the race was lost and the purchase fails cleanly instead
//! of overdrawing.
//!
//! ## Retry Semantics
//! Validation, not-found, and business-rule errors are non-retryable without
//! caller correction. Store errors (lock contention past the busy timeout,
//! lost connection) are retryable by the caller; checkout itself never
//! silently retries — it guarantees atomicity only.

use chrono::Utc;
use sqlx::{Sqlite, SqlitePool, Transaction};
use tracing::{debug, info, warn};

use crate::error::DbResult;
use canteen_core::validation::validate_cart;
use canteen_core::{CartLine, CoreError, Customer, Item, Money, PaymentMethod};

// =============================================================================
// Checkout
// =============================================================================

/// The purchase transaction service.
///
/// ## Usage
/// ```rust,ignore
/// let receipt_id = db
///     .checkout()
///     .submit_purchase("CARD-001", cart.lines(), PaymentMethod::Balance)
///     .await?;
/// ```
#[derive(Debug, Clone)]
pub struct Checkout {
    pool: SqlitePool,
}

impl Checkout {
    /// Creates a new Checkout service.
    pub fn new(pool: SqlitePool) -> Self {
        Checkout { pool }
    }

    /// Submits a purchase: validates the cart, then atomically persists the
    /// receipt, its lines, the balance debit, and the stock decrements.
    ///
    /// ## Arguments
    /// * `customer_id` - The paying customer's card id
    /// * `cart` - One line per distinct item; duplicate item ids are rejected
    /// * `payment_method` - Tender tag recorded on the receipt
    ///
    /// ## Returns
    /// * `Ok(i64)` - The new receipt's store-assigned id
    /// * `Err(DbError::Core(...))` - Validation, not-found, or business-rule
    ///   failure; nothing was written
    /// * `Err(DbError::...)` - Store failure; the whole transaction rolled
    ///   back, nothing is partially visible
    ///
    /// ## Postconditions (on success)
    /// - Exactly one receipt and `cart.len()` lines exist
    /// - The balance dropped by exactly `Σ price × quantity`
    /// - Each item's stock dropped by its purchased quantity
    pub async fn submit_purchase(
        &self,
        customer_id: &str,
        cart: &[CartLine],
        payment_method: PaymentMethod,
    ) -> DbResult<i64> {
        // ---- Phase 1: validate, before any write --------------------------
        validate_cart(cart)?;

        let resolved = self.resolve_items(cart).await?;
        let total: Money = resolved
            .iter()
            .map(|(item, quantity)| item.price * *quantity)
            .sum();

        let customer = self.load_customer(customer_id).await?;
        if !customer.can_afford(total) {
            warn!(
                customer_id = %customer_id,
                required = %total,
                available = %customer.balance,
                "Purchase rejected: insufficient funds"
            );
            return Err(CoreError::InsufficientFunds {
                customer_id: customer_id.to_string(),
                required: total,
                available: customer.balance,
            }
            .into());
        }

        for (item, quantity) in &resolved {
            if !item.in_stock(*quantity) {
                warn!(
                    item_id = %item.id,
                    requested = %quantity,
                    available = %item.stock,
                    "Purchase rejected: insufficient stock"
                );
                return Err(CoreError::InsufficientStock {
                    item_id: item.id,
                    available: item.stock,
                    requested: *quantity,
                }
                .into());
            }
        }

        debug!(
            customer_id = %customer_id,
            lines = cart.len(),
            total = %total,
            "Cart validated, opening purchase transaction"
        );

        // ---- Phase 2: execute, one atomic unit ----------------------------
        // An early return (or the caller dropping this future) drops `tx`,
        // which rolls back everything written so far.
        let mut tx = self.pool.begin().await?;

        let receipt_id = insert_receipt(&mut tx, customer_id, payment_method, total).await?;

        for line in cart {
            insert_receipt_line(&mut tx, receipt_id, line).await?;
        }

        debit_balance(&mut tx, customer_id, total).await?;

        for (item, quantity) in &resolved {
            decrement_stock(&mut tx, item.id, *quantity).await?;
        }

        tx.commit().await?;

        info!(
            customer_id = %customer_id,
            receipt_id = %receipt_id,
            lines = cart.len(),
            total = %total,
            "Purchase committed"
        );

        Ok(receipt_id)
    }

    /// Resolves every cart line against the catalog, in cart order.
    ///
    /// The first unknown id fails the whole call; no partial cart is ever
    /// accepted.
    async fn resolve_items(&self, cart: &[CartLine]) -> DbResult<Vec<(Item, i64)>> {
        let mut resolved = Vec::with_capacity(cart.len());

        for line in cart {
            let item = sqlx::query_as::<_, Item>(
                r#"
                SELECT id, category, name, price, description, stock, created_at, updated_at
                FROM items
                WHERE id = ?1
                "#,
            )
            .bind(line.item_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(CoreError::ItemNotFound(line.item_id))?;

            resolved.push((item, line.quantity));
        }

        Ok(resolved)
    }

    /// Loads the paying customer or fails with `CustomerNotFound`.
    async fn load_customer(&self, customer_id: &str) -> DbResult<Customer> {
        let customer = sqlx::query_as::<_, Customer>(
            r#"
            SELECT id, name, customer_type, balance, created_at
            FROM customers
            WHERE id = ?1
            "#,
        )
        .bind(customer_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| CoreError::CustomerNotFound(customer_id.to_string()))?;

        Ok(customer)
    }
}

// =============================================================================
// Transaction Steps
// =============================================================================
// Each helper writes through the open transaction. Returning an error from
// any of them unwinds submit_purchase, dropping the transaction and rolling
// back every step before it.

/// Inserts the receipt row and returns its store-assigned id.
async fn insert_receipt(
    tx: &mut Transaction<'_, Sqlite>,
    customer_id: &str,
    payment_method: PaymentMethod,
    total: Money,
) -> DbResult<i64> {
    let result = sqlx::query(
        r#"
        INSERT INTO receipts (customer_id, payment_method, created_at, total)
        VALUES (?1, ?2, ?3, ?4)
        "#,
    )
    .bind(customer_id)
    .bind(payment_method)
    .bind(Utc::now())
    .bind(total)
    .execute(&mut **tx)
    .await?;

    Ok(result.last_insert_rowid())
}

/// Inserts one receipt line bound to the new receipt id.
///
/// A duplicate item id in the submitted cart hits the composite primary key
/// here and fails the whole purchase; callers merge duplicates while
/// building the cart.
async fn insert_receipt_line(
    tx: &mut Transaction<'_, Sqlite>,
    receipt_id: i64,
    line: &CartLine,
) -> DbResult<()> {
    sqlx::query(
        r#"
        INSERT INTO receipt_lines (receipt_id, item_id, quantity)
        VALUES (?1, ?2, ?3)
        "#,
    )
    .bind(receipt_id)
    .bind(line.item_id)
    .bind(line.quantity)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

/// Debits the balance inside the transaction, guarded by `balance >= total`.
///
/// Zero rows affected means a concurrent debit won the race between the
/// phase-1 check and this statement; the re-read distinguishes a vanished
/// customer from a drained balance.
async fn debit_balance(
    tx: &mut Transaction<'_, Sqlite>,
    customer_id: &str,
    total: Money,
) -> DbResult<()> {
    let result = sqlx::query(
        r#"
        UPDATE customers
        SET balance = balance - ?2
        WHERE id = ?1 AND balance >= ?2
        "#,
    )
    .bind(customer_id)
    .bind(total)
    .execute(&mut **tx)
    .await?;

    if result.rows_affected() == 0 {
        let available = sqlx::query_scalar::<_, Money>(
            "SELECT balance FROM customers WHERE id = ?1",
        )
        .bind(customer_id)
        .fetch_optional(&mut **tx)
        .await?;

        return match available {
            None => Err(CoreError::CustomerNotFound(customer_id.to_string()).into()),
            Some(available) => Err(CoreError::InsufficientFunds {
                customer_id: customer_id.to_string(),
                required: total,
                available,
            }
            .into()),
        };
    }

    Ok(())
}

/// Decrements an item's stock inside the transaction, guarded by
/// `stock >= quantity`. Zero rows affected fails the purchase with
/// `InsufficientStock`.
async fn decrement_stock(
    tx: &mut Transaction<'_, Sqlite>,
    item_id: i64,
    quantity: i64,
) -> DbResult<()> {
    let result = sqlx::query(
        r#"
        UPDATE items
        SET stock = stock - ?2
        WHERE id = ?1 AND stock >= ?2
        "#,
    )
    .bind(item_id)
    .bind(quantity)
    .execute(&mut **tx)
    .await?;

    if result.rows_affected() == 0 {
        let available = sqlx::query_scalar::<_, i64>("SELECT stock FROM items WHERE id = ?1")
            .bind(item_id)
            .fetch_optional(&mut **tx)
            .await?
            .unwrap_or(0);

        return Err(CoreError::InsufficientStock {
            item_id,
            available,
            requested: quantity,
        }
        .into());
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DbError;
    use crate::pool::{Database, DbConfig};
    use canteen_core::{ItemCategory, ItemUpdate, NewCustomer, NewItem};
    use std::time::Duration;

    fn line(item_id: i64, quantity: i64) -> CartLine {
        CartLine { item_id, quantity }
    }

    /// Customer CARD-001 with the given balance, items 10 and 11 priced at
    /// 12000 with 50 units of stock each.
    async fn seeded_db(balance: i64) -> Database {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        seed(&db, balance).await;
        db
    }

    async fn seed(db: &Database, balance: i64) {
        db.customers()
            .insert(&NewCustomer {
                id: "CARD-001".to_string(),
                name: "An Nguyen".to_string(),
                customer_type: "student".to_string(),
            })
            .await
            .unwrap();
        if balance > 0 {
            db.customers()
                .top_up("CARD-001", Money::from_minor(balance))
                .await
                .unwrap();
        }

        for (id, name) in [(10, "Beef Noodles"), (11, "Spring Rolls")] {
            db.catalog()
                .insert_with_id(
                    id,
                    &NewItem {
                        category: ItemCategory::Food,
                        name: name.to_string(),
                        price: Money::from_minor(12000),
                        description: String::new(),
                        stock: 50,
                    },
                )
                .await
                .unwrap();
        }
    }

    async fn balance_of(db: &Database, id: &str) -> Money {
        db.customers().get_by_id(id).await.unwrap().unwrap().balance
    }

    async fn receipt_count(db: &Database) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM receipts")
            .fetch_one(db.pool())
            .await
            .unwrap()
    }

    async fn line_count(db: &Database) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM receipt_lines")
            .fetch_one(db.pool())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_successful_purchase() {
        // Balance 50000, cart = 2x12000 + 1x12000 → total 36000, rest 14000
        let db = seeded_db(50000).await;

        let receipt_id = db
            .checkout()
            .submit_purchase(
                "CARD-001",
                &[line(10, 2), line(11, 1)],
                PaymentMethod::Balance,
            )
            .await
            .unwrap();

        let receipt = db.receipts().get_by_id(receipt_id).await.unwrap().unwrap();
        assert_eq!(receipt.customer_id, "CARD-001");
        assert_eq!(receipt.total, Money::from_minor(36000));
        assert_eq!(receipt.payment_method, PaymentMethod::Balance);

        assert_eq!(balance_of(&db, "CARD-001").await, Money::from_minor(14000));
        assert_eq!(receipt_count(&db).await, 1);
        assert_eq!(line_count(&db).await, 2);
    }

    #[tokio::test]
    async fn test_purchase_roundtrips_through_details() {
        let db = seeded_db(50000).await;

        let receipt_id = db
            .checkout()
            .submit_purchase(
                "CARD-001",
                &[line(10, 2), line(11, 1)],
                PaymentMethod::Balance,
            )
            .await
            .unwrap();

        let orders = db.receipts().details(receipt_id).await.unwrap();
        let pairs: Vec<(i64, i64)> = orders.iter().map(|o| (o.item.id, o.quantity)).collect();
        assert_eq!(pairs, vec![(10, 2), (11, 1)]);
    }

    #[tokio::test]
    async fn test_purchase_decrements_stock() {
        let db = seeded_db(50000).await;

        db.checkout()
            .submit_purchase(
                "CARD-001",
                &[line(10, 2), line(11, 1)],
                PaymentMethod::Balance,
            )
            .await
            .unwrap();

        let noodles = db.catalog().get_by_id(10).await.unwrap().unwrap();
        let rolls = db.catalog().get_by_id(11).await.unwrap().unwrap();
        assert_eq!(noodles.stock, 48);
        assert_eq!(rolls.stock, 49);
    }

    #[tokio::test]
    async fn test_insufficient_funds_changes_nothing() {
        // Same cart, balance only 20000 → reject, everything untouched
        let db = seeded_db(20000).await;

        let err = db
            .checkout()
            .submit_purchase(
                "CARD-001",
                &[line(10, 2), line(11, 1)],
                PaymentMethod::Balance,
            )
            .await
            .unwrap_err();

        match err {
            DbError::Core(CoreError::InsufficientFunds {
                required,
                available,
                ..
            }) => {
                assert_eq!(required, Money::from_minor(36000));
                assert_eq!(available, Money::from_minor(20000));
            }
            other => panic!("expected InsufficientFunds, got {other:?}"),
        }

        assert_eq!(balance_of(&db, "CARD-001").await, Money::from_minor(20000));
        assert_eq!(receipt_count(&db).await, 0);
        assert_eq!(line_count(&db).await, 0);
    }

    #[tokio::test]
    async fn test_unknown_item_changes_nothing() {
        let db = seeded_db(50000).await;

        let err = db
            .checkout()
            .submit_purchase(
                "CARD-001",
                &[line(10, 1), line(404, 1)],
                PaymentMethod::Balance,
            )
            .await
            .unwrap_err();

        assert!(matches!(err, DbError::Core(CoreError::ItemNotFound(404))));
        assert_eq!(balance_of(&db, "CARD-001").await, Money::from_minor(50000));
        assert_eq!(receipt_count(&db).await, 0);
    }

    #[tokio::test]
    async fn test_unknown_customer_rejected() {
        let db = seeded_db(50000).await;

        let err = db
            .checkout()
            .submit_purchase("CARD-404", &[line(10, 1)], PaymentMethod::Balance)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            DbError::Core(CoreError::CustomerNotFound(_))
        ));
        assert_eq!(receipt_count(&db).await, 0);
    }

    #[tokio::test]
    async fn test_cart_shape_rejected_before_store() {
        let db = seeded_db(50000).await;
        let checkout = db.checkout();

        let err = checkout
            .submit_purchase("CARD-001", &[], PaymentMethod::Balance)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Core(CoreError::EmptyCart)));

        let err = checkout
            .submit_purchase("CARD-001", &[line(10, 0)], PaymentMethod::Balance)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DbError::Core(CoreError::InvalidQuantity { .. })
        ));

        assert_eq!(receipt_count(&db).await, 0);
    }

    #[tokio::test]
    async fn test_insufficient_stock_changes_nothing() {
        let db = seeded_db(999 * 12000).await;

        let err = db
            .checkout()
            .submit_purchase("CARD-001", &[line(10, 51)], PaymentMethod::Balance)
            .await
            .unwrap_err();

        match err {
            DbError::Core(CoreError::InsufficientStock {
                item_id,
                available,
                requested,
            }) => {
                assert_eq!(item_id, 10);
                assert_eq!(available, 50);
                assert_eq!(requested, 51);
            }
            other => panic!("expected InsufficientStock, got {other:?}"),
        }

        assert_eq!(receipt_count(&db).await, 0);
        assert_eq!(db.catalog().get_by_id(10).await.unwrap().unwrap().stock, 50);
    }

    #[tokio::test]
    async fn test_duplicate_cart_lines_roll_back() {
        // Two lines for one item hit the composite primary key; the receipt
        // inserted before them must disappear with the rollback.
        let db = seeded_db(50000).await;

        let err = db
            .checkout()
            .submit_purchase(
                "CARD-001",
                &[line(10, 1), line(10, 2)],
                PaymentMethod::Balance,
            )
            .await
            .unwrap_err();

        assert!(matches!(err, DbError::UniqueViolation { .. }));
        assert_eq!(balance_of(&db, "CARD-001").await, Money::from_minor(50000));
        assert_eq!(receipt_count(&db).await, 0);
        assert_eq!(line_count(&db).await, 0);
    }

    #[tokio::test]
    async fn test_price_change_reprices_details_not_total() {
        // Lines store no unit price: details() follows the catalog while the
        // receipt keeps the amount actually debited.
        let db = seeded_db(50000).await;

        let receipt_id = db
            .checkout()
            .submit_purchase("CARD-001", &[line(10, 2)], PaymentMethod::Balance)
            .await
            .unwrap();

        db.catalog()
            .update(
                10,
                &ItemUpdate {
                    category: ItemCategory::Food,
                    name: "Beef Noodles".to_string(),
                    price: Money::from_minor(15000),
                    description: String::new(),
                    stock: 48,
                },
            )
            .await
            .unwrap();

        let receipt = db.receipts().get_by_id(receipt_id).await.unwrap().unwrap();
        assert_eq!(receipt.total, Money::from_minor(24000));

        let orders = db.receipts().details(receipt_id).await.unwrap();
        assert_eq!(orders[0].line_total(), Money::from_minor(30000));
    }

    #[tokio::test]
    async fn test_cancelled_purchase_leaves_no_partial_writes() {
        let db = seeded_db(50000).await;
        let checkout = db.checkout();

        // Zero deadline: the future is dropped before it can commit, which
        // drops (and rolls back) any transaction it opened.
        let result = tokio::time::timeout(
            Duration::ZERO,
            checkout.submit_purchase("CARD-001", &[line(10, 1)], PaymentMethod::Balance),
        )
        .await;
        assert!(result.is_err());

        assert_eq!(balance_of(&db, "CARD-001").await, Money::from_minor(50000));
        assert_eq!(receipt_count(&db).await, 0);
        assert_eq!(line_count(&db).await, 0);
    }

    #[tokio::test]
    async fn test_concurrent_purchases_cannot_overdraw() {
        // Balance covers either purchase alone but not both. Whatever the
        // interleaving, the guarded in-transaction debit lets exactly one
        // commit.
        let dir = tempfile::tempdir().unwrap();
        let config = DbConfig::new(dir.path().join("canteen.db"));
        let db = Database::new(config).await.unwrap();
        seed(&db, 50000).await;

        let mut tasks = Vec::new();
        for _ in 0..2 {
            let checkout = db.checkout();
            tasks.push(tokio::spawn(async move {
                checkout
                    .submit_purchase("CARD-001", &[line(10, 3)], PaymentMethod::Balance)
                    .await
            }));
        }

        let mut committed = 0;
        let mut rejected = 0;
        for task in tasks {
            match task.await.unwrap() {
                Ok(_) => committed += 1,
                Err(DbError::Core(CoreError::InsufficientFunds { .. })) => rejected += 1,
                Err(other) => panic!("unexpected error: {other:?}"),
            }
        }

        assert_eq!(committed, 1);
        assert_eq!(rejected, 1);
        assert_eq!(balance_of(&db, "CARD-001").await, Money::from_minor(14000));
        assert_eq!(receipt_count(&db).await, 1);
    }
}
