//! # Catalog Repository
//!
//! Database operations for menu items.
//!
//! ## Two Consumers
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Catalog Access Paths                                │
//! │                                                                         │
//! │  Checkout (read path)                                                  │
//! │  └── get_by_id() resolves cart lines to priced items                   │
//! │                                                                         │
//! │  Management (write path)                                               │
//! │  ├── insert()          new item, store-assigned id                     │
//! │  ├── insert_with_id()  imports and fixtures with fixed identities      │
//! │  ├── update()          replace mutable fields, bump updated_at         │
//! │  └── delete()          hard delete, fenced by RESTRICT foreign keys    │
//! │                                                                         │
//! │  Items referenced by receipt lines cannot be deleted: the lines        │
//! │  reprice against the catalog, so the rows they point at must stay.     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use canteen_core::validation::{
    validate_description, validate_name, validate_price, validate_stock,
};
use canteen_core::{CoreError, Item, ItemCategory, ItemUpdate, Money, NewItem};

/// Repository for catalog database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = CatalogRepository::new(pool);
///
/// let item = repo.insert(&NewItem {
///     category: ItemCategory::Food,
///     name: "Beef Noodles".into(),
///     price: Money::from_minor(12000),
///     description: "Rich broth".into(),
///     stock: 40,
/// }).await?;
/// ```
#[derive(Debug, Clone)]
pub struct CatalogRepository {
    pool: SqlitePool,
}

impl CatalogRepository {
    /// Creates a new CatalogRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CatalogRepository { pool }
    }

    /// Gets an item by id.
    ///
    /// ## Returns
    /// * `Ok(Some(Item))` - Item found
    /// * `Ok(None)` - Item not found
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Item>> {
        let item = sqlx::query_as::<_, Item>(
            r#"
            SELECT id, category, name, price, description, stock, created_at, updated_at
            FROM items
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(item)
    }

    /// Lists the items in one category, sorted by name.
    pub async fn list_by_category(&self, category: ItemCategory) -> DbResult<Vec<Item>> {
        let items = sqlx::query_as::<_, Item>(
            r#"
            SELECT id, category, name, price, description, stock, created_at, updated_at
            FROM items
            WHERE category = ?1
            ORDER BY name
            "#,
        )
        .bind(category)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Inserts a new item with a store-assigned id.
    ///
    /// ## Arguments
    /// * `new` - Item input; id and timestamps are assigned here
    ///
    /// ## Returns
    /// * `Ok(Item)` - The stored record with its assigned id
    /// * `Err(DbError::Core)` - Input failed validation
    pub async fn insert(&self, new: &NewItem) -> DbResult<Item> {
        validate_item_fields(&new.name, new.price, &new.description, new.stock)?;

        debug!(name = %new.name, "Inserting item");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO items (category, name, price, description, stock, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(new.category)
        .bind(&new.name)
        .bind(new.price)
        .bind(&new.description)
        .bind(new.stock)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(Item {
            id: result.last_insert_rowid(),
            category: new.category,
            name: new.name.clone(),
            price: new.price,
            description: new.description.clone(),
            stock: new.stock,
            created_at: now,
            updated_at: now,
        })
    }

    /// Inserts a new item under a caller-chosen id.
    ///
    /// ## Usage
    /// For imports and seed fixtures that must keep fixed identities.
    /// A taken id is a `UniqueViolation`.
    pub async fn insert_with_id(&self, id: i64, new: &NewItem) -> DbResult<Item> {
        validate_item_fields(&new.name, new.price, &new.description, new.stock)?;

        debug!(id = %id, name = %new.name, "Inserting item with fixed id");

        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO items (id, category, name, price, description, stock, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(id)
        .bind(new.category)
        .bind(&new.name)
        .bind(new.price)
        .bind(&new.description)
        .bind(new.stock)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(Item {
            id,
            category: new.category,
            name: new.name.clone(),
            price: new.price,
            description: new.description.clone(),
            stock: new.stock,
            created_at: now,
            updated_at: now,
        })
    }

    /// Replaces an item's mutable fields.
    ///
    /// ## Arguments
    /// * `id` - Item id
    /// * `update` - New values for category, name, price, description, stock
    ///
    /// ## Returns
    /// * `Ok(())` - Update applied, `updated_at` bumped
    /// * `Err(DbError::NotFound)` - Item doesn't exist
    pub async fn update(&self, id: i64, update: &ItemUpdate) -> DbResult<()> {
        validate_item_fields(&update.name, update.price, &update.description, update.stock)?;

        debug!(id = %id, "Updating item");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE items SET
                category = ?2,
                name = ?3,
                price = ?4,
                description = ?5,
                stock = ?6,
                updated_at = ?7
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(update.category)
        .bind(&update.name)
        .bind(update.price)
        .bind(&update.description)
        .bind(update.stock)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Item", id.to_string()));
        }

        Ok(())
    }

    /// Hard-deletes an item.
    ///
    /// ## Deletion Semantics
    /// Receipt lines reference items with a RESTRICT foreign key, so any item
    /// that appears on a receipt cannot be removed; the call fails with
    /// `ForeignKeyViolation` and the catalog is unchanged.
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        debug!(id = %id, "Deleting item");

        let result = sqlx::query("DELETE FROM items WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Item", id.to_string()));
        }

        Ok(())
    }

    /// Counts catalog items (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM items")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Validates the shared field set of inserts and updates.
fn validate_item_fields(
    name: &str,
    price: Money,
    description: &str,
    stock: i64,
) -> DbResult<()> {
    validate_name(name).map_err(CoreError::from)?;
    validate_price(price).map_err(CoreError::from)?;
    validate_description(description).map_err(CoreError::from)?;
    validate_stock(stock).map_err(CoreError::from)?;
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
