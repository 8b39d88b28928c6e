//! # Repository Module
//!
//! Database repository implementations for the canteen purchase system.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern Explained                         │
//! │                                                                         │
//! │  The Repository pattern abstracts database access behind a clean API.  │
//! │                                                                         │
//! │  Caller                                                                 │
//! │       │                                                                 │
//! │       │  db.customers().top_up("CARD-001", Money::from_minor(5000))    │
//! │       │  ↓                                                              │
//! │       ▼                                                                 │
//! │  CustomerRepository                                                    │
//! │  ├── register(&self, new_customer)                                     │
//! │  ├── get_by_id(&self, id)                                              │
//! │  ├── top_up(&self, id, amount)                                         │
//! │  └── debit(&self, id, amount)                                          │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! │  Benefits:                                                              │
//! │  • Clean separation of concerns                                        │
//! │  • Easy to test (exercise one repository at a time)                    │
//! │  • SQL is isolated in one place                                        │
//! │  • Can swap database implementations                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`CustomerRepository`] - Customer accounts and balance movements
//! - [`CatalogRepository`] - Menu item CRUD
//! - [`ReceiptRepository`] - Receipt history (read-only; checkout writes)
//!
//! [`CustomerRepository`]: customer::CustomerRepository
//! [`CatalogRepository`]: catalog::CatalogRepository
//! [`ReceiptRepository`]: receipt::ReceiptRepository

pub mod catalog;
pub mod customer;
pub mod receipt;
