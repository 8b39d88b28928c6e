//! # Customer Repository
//!
//! Database operations for customer accounts and balance movements.
//!
//! ## Balance Adjustment Discipline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Balance Adjustment Strategy                          │
//! │                                                                         │
//! │  ❌ WRONG: Read-modify-write (loses concurrent updates)                │
//! │     let c = get_by_id(id);                                             │
//! │     UPDATE customers SET balance = {c.balance + amount}                │
//! │                                                                         │
//! │  ✅ CORRECT: Single guarded statement (serialized by the store)        │
//! │     UPDATE customers SET balance = balance + ?                         │
//! │     UPDATE customers SET balance = balance - ? ... AND balance >= ?    │
//! │                                                                         │
//! │  Why?                                                                   │
//! │  Till A: tops up 5000  → balance + 5000                                │
//! │  Till B: debits 1200   → balance - 1200                                │
//! │  Any interleaving ends at the algebraic sum, and the debit guard       │
//! │  makes an overdraft impossible at any point in between.                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use canteen_core::validation::{validate_amount, validate_customer_id, validate_customer_type, validate_name};
use canteen_core::{CoreError, Customer, Money, NewCustomer};

/// Repository for customer database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = CustomerRepository::new(pool);
///
/// // Register a card
/// let customer = repo.insert(&NewCustomer {
///     id: "CARD-001".into(),
///     name: "An Nguyen".into(),
///     customer_type: "student".into(),
/// }).await?;
///
/// // Load money onto it
/// let balance = repo.top_up("CARD-001", Money::from_minor(50000)).await?;
/// ```
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    pool: SqlitePool,
}

impl CustomerRepository {
    /// Creates a new CustomerRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CustomerRepository { pool }
    }

    /// Registers a new customer with a zero balance.
    ///
    /// ## Arguments
    /// * `new` - Registration input; the id is caller-supplied (card number)
    ///
    /// ## Returns
    /// * `Ok(Customer)` - The stored record
    /// * `Err(DbError::Core)` - Input failed validation
    /// * `Err(DbError::UniqueViolation)` - Id already registered
    pub async fn insert(&self, new: &NewCustomer) -> DbResult<Customer> {
        validate_customer_id(&new.id).map_err(CoreError::from)?;
        validate_name(&new.name).map_err(CoreError::from)?;
        validate_customer_type(&new.customer_type).map_err(CoreError::from)?;

        debug!(customer_id = %new.id, "Registering customer");

        let customer = Customer {
            id: new.id.clone(),
            name: new.name.clone(),
            customer_type: new.customer_type.clone(),
            balance: Money::ZERO,
            created_at: Utc::now(),
        };

        sqlx::query(
            r#"
            INSERT INTO customers (id, name, customer_type, balance, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&customer.id)
        .bind(&customer.name)
        .bind(&customer.customer_type)
        .bind(customer.balance)
        .bind(customer.created_at)
        .execute(&self.pool)
        .await?;

        Ok(customer)
    }

    /// Gets a customer by id.
    ///
    /// ## Returns
    /// * `Ok(Some(Customer))` - Customer found
    /// * `Ok(None)` - Customer not found
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Customer>> {
        let customer = sqlx::query_as::<_, Customer>(
            r#"
            SELECT id, name, customer_type, balance, created_at
            FROM customers
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(customer)
    }

    /// Adds a positive amount to a customer's balance.
    ///
    /// Single guarded statement, so concurrent adjustments to the same
    /// customer serialize in the store and never lose updates.
    ///
    /// ## Arguments
    /// * `id` - Customer id
    /// * `amount` - Amount to add; must be strictly positive
    ///
    /// ## Returns
    /// * `Ok(Money)` - The new balance
    /// * `Err(DbError::Core(CoreError::InvalidAmount))` - Amount not positive
    /// * `Err(DbError::Core(CoreError::CustomerNotFound))` - Unknown id
    pub async fn top_up(&self, id: &str, amount: Money) -> DbResult<Money> {
        validate_amount(amount)?;

        debug!(customer_id = %id, amount = %amount, "Topping up balance");

        let result = sqlx::query(
            r#"
            UPDATE customers
            SET balance = balance + ?2
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(amount)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(CoreError::CustomerNotFound(id.to_string()).into());
        }

        let balance = self.balance_of(id).await?;
        info!(customer_id = %id, amount = %amount, balance = %balance, "Top-up applied");

        Ok(balance)
    }

    /// Subtracts a positive amount from a customer's balance.
    ///
    /// The statement only matches when the balance covers the amount, so an
    /// overdraft cannot happen under any interleaving. Zero rows affected
    /// means the id is unknown or the guard failed; a follow-up read tells
    /// which.
    ///
    /// ## Arguments
    /// * `id` - Customer id
    /// * `amount` - Amount to subtract; must be strictly positive
    ///
    /// ## Returns
    /// * `Ok(Money)` - The new balance
    /// * `Err(DbError::Core(CoreError::InvalidAmount))` - Amount not positive
    /// * `Err(DbError::Core(CoreError::CustomerNotFound))` - Unknown id
    /// * `Err(DbError::Core(CoreError::InsufficientFunds))` - Balance too low
    pub async fn debit(&self, id: &str, amount: Money) -> DbResult<Money> {
        validate_amount(amount)?;

        debug!(customer_id = %id, amount = %amount, "Debiting balance");

        let result = sqlx::query(
            r#"
            UPDATE customers
            SET balance = balance - ?2
            WHERE id = ?1 AND balance >= ?2
            "#,
        )
        .bind(id)
        .bind(amount)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return match self.get_by_id(id).await? {
                None => Err(CoreError::CustomerNotFound(id.to_string()).into()),
                Some(customer) => Err(CoreError::InsufficientFunds {
                    customer_id: id.to_string(),
                    required: amount,
                    available: customer.balance,
                }
                .into()),
            };
        }

        let balance = self.balance_of(id).await?;
        info!(customer_id = %id, amount = %amount, balance = %balance, "Debit applied");

        Ok(balance)
    }

    /// Counts registered customers (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM customers")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Reads the current balance of a customer known to exist.
    async fn balance_of(&self, id: &str) -> DbResult<Money> {
        let balance = sqlx::query_scalar::<_, Money>(
            "SELECT balance FROM customers WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("Customer", id))?;

        Ok(balance)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use canteen_core::ValidationError;

    fn card(id: &str) -> NewCustomer {
        NewCustomer {
            id: id.to_string(),
            name: "An Nguyen".to_string(),
            customer_type: "student".to_string(),
        }
    }

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let db = test_db().await;
        let repo = db.customers();

        let inserted = repo.insert(&card("CARD-001")).await.unwrap();
        assert_eq!(inserted.balance, Money::ZERO);

        let loaded = repo.get_by_id("CARD-001").await.unwrap().unwrap();
        assert_eq!(loaded.id, "CARD-001");
        assert_eq!(loaded.name, "An Nguyen");
        assert_eq!(loaded.customer_type, "student");
        assert_eq!(loaded.balance, Money::ZERO);

        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_get_unknown_returns_none() {
        let db = test_db().await;

        let missing = db.customers().get_by_id("CARD-404").await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_insert_duplicate_id_rejected() {
        let db = test_db().await;
        let repo = db.customers();

        repo.insert(&card("CARD-001")).await.unwrap();
        let err = repo.insert(&card("CARD-001")).await.unwrap_err();

        assert!(matches!(err, DbError::UniqueViolation { .. }));
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_insert_empty_id_rejected() {
        let db = test_db().await;

        let err = db.customers().insert(&card("  ")).await.unwrap_err();
        assert!(matches!(
            err,
            DbError::Core(CoreError::Validation(ValidationError::Required { .. }))
        ));
    }

    #[tokio::test]
    async fn test_top_up_then_debit() {
        let db = test_db().await;
        let repo = db.customers();
        repo.insert(&card("CARD-001")).await.unwrap();

        let after_top_up = repo.top_up("CARD-001", Money::from_minor(50000)).await.unwrap();
        assert_eq!(after_top_up, Money::from_minor(50000));

        let after_debit = repo.debit("CARD-001", Money::from_minor(36000)).await.unwrap();
        assert_eq!(after_debit, Money::from_minor(14000));

        let loaded = repo.get_by_id("CARD-001").await.unwrap().unwrap();
        assert_eq!(loaded.balance, Money::from_minor(14000));
    }

    #[tokio::test]
    async fn test_adjustments_reject_non_positive_amounts() {
        let db = test_db().await;
        let repo = db.customers();
        repo.insert(&card("CARD-001")).await.unwrap();

        for amount in [Money::ZERO, Money::from_minor(-500)] {
            let err = repo.top_up("CARD-001", amount).await.unwrap_err();
            assert!(matches!(err, DbError::Core(CoreError::InvalidAmount { .. })));

            let err = repo.debit("CARD-001", amount).await.unwrap_err();
            assert!(matches!(err, DbError::Core(CoreError::InvalidAmount { .. })));
        }

        let loaded = repo.get_by_id("CARD-001").await.unwrap().unwrap();
        assert_eq!(loaded.balance, Money::ZERO);
    }

    #[tokio::test]
    async fn test_adjustments_unknown_customer() {
        let db = test_db().await;
        let repo = db.customers();

        let err = repo.top_up("CARD-404", Money::from_minor(100)).await.unwrap_err();
        assert!(matches!(err, DbError::Core(CoreError::CustomerNotFound(_))));

        let err = repo.debit("CARD-404", Money::from_minor(100)).await.unwrap_err();
        assert!(matches!(err, DbError::Core(CoreError::CustomerNotFound(_))));
    }

    #[tokio::test]
    async fn test_debit_insufficient_funds_leaves_balance() {
        let db = test_db().await;
        let repo = db.customers();
        repo.insert(&card("CARD-001")).await.unwrap();
        repo.top_up("CARD-001", Money::from_minor(20000)).await.unwrap();

        let err = repo.debit("CARD-001", Money::from_minor(36000)).await.unwrap_err();
        match err {
            DbError::Core(CoreError::InsufficientFunds {
                customer_id,
                required,
                available,
            }) => {
                assert_eq!(customer_id, "CARD-001");
                assert_eq!(required, Money::from_minor(36000));
                assert_eq!(available, Money::from_minor(20000));
            }
            other => panic!("expected InsufficientFunds, got {other:?}"),
        }

        let loaded = repo.get_by_id("CARD-001").await.unwrap().unwrap();
        assert_eq!(loaded.balance, Money::from_minor(20000));
    }

    #[tokio::test]
    async fn test_debit_exact_balance_reaches_zero() {
        let db = test_db().await;
        let repo = db.customers();
        repo.insert(&card("CARD-001")).await.unwrap();
        repo.top_up("CARD-001", Money::from_minor(12000)).await.unwrap();

        let balance = repo.debit("CARD-001", Money::from_minor(12000)).await.unwrap();
        assert_eq!(balance, Money::ZERO);
    }

    #[tokio::test]
    async fn test_concurrent_adjustments_reach_algebraic_sum() {
        // On-disk database: in-memory pools are capped at one connection,
        // which would serialize everything trivially.
        let dir = tempfile::tempdir().unwrap();
        let config = DbConfig::new(dir.path().join("canteen.db"));
        let db = Database::new(config).await.unwrap();

        let repo = db.customers();
        repo.insert(&card("CARD-001")).await.unwrap();
        repo.top_up("CARD-001", Money::from_minor(10000)).await.unwrap();

        let mut tasks = Vec::new();
        for _ in 0..10 {
            let repo = db.customers();
            tasks.push(tokio::spawn(async move {
                repo.top_up("CARD-001", Money::from_minor(1000)).await
            }));
        }
        for _ in 0..10 {
            let repo = db.customers();
            tasks.push(tokio::spawn(async move {
                repo.debit("CARD-001", Money::from_minor(400)).await
            }));
        }

        for task in tasks {
            task.await.unwrap().unwrap();
        }

        // 10000 + 10 * 1000 - 10 * 400, regardless of interleaving
        let loaded = repo.get_by_id("CARD-001").await.unwrap().unwrap();
        assert_eq!(loaded.balance, Money::from_minor(16000));
    }
}
