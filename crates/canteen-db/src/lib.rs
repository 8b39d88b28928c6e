//! # canteen-db: Database Layer for Canteen POS
//!
//! This crate provides database access for the Canteen POS system.
//! It uses SQLite for local storage with sqlx for async operations, and it
//! owns the purchase transaction: one atomic unit writing the receipt, its
//! lines, the balance debit, and the stock decrement.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Canteen POS Data Flow                             │
//! │                                                                         │
//! │  Till / view-model call (submit purchase)                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    canteen-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │ + Checkout    │    │  (embedded)  │  │   │
//! │  │   │               │    │               │    │              │  │   │
//! │  │   │ SqlitePool    │    │ CustomerRepo  │    │ 001_init.sql │  │   │
//! │  │   │ Connection    │◄───│ CatalogRepo   │    │              │  │   │
//! │  │   │ Management    │    │ ReceiptRepo   │    │              │  │   │
//! │  │   │               │    │ Checkout      │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │              canteen.db (WAL, foreign keys ON)                  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations (customer, catalog, receipt)
//! - [`checkout`] - The atomic purchase transaction
//!
//! ## Usage
//!
//! ```rust,ignore
//! use canteen_db::{Database, DbConfig};
//! use canteen_core::{CartLine, PaymentMethod};
//!
//! // Create database with default config
//! let config = DbConfig::new("path/to/canteen.db");
//! let db = Database::new(config).await?;
//!
//! // Run migrations
//! db.run_migrations().await?;
//!
//! // Submit a purchase: receipt + lines + debit, all or nothing
//! let cart = [CartLine { item_id: 10, quantity: 2 }];
//! let receipt_id = db
//!     .checkout()
//!     .submit_purchase("CARD-001", &cart, PaymentMethod::Balance)
//!     .await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod checkout;
pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use checkout::Checkout;
pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::catalog::CatalogRepository;
pub use repository::customer::CustomerRepository;
pub use repository::receipt::ReceiptRepository;
