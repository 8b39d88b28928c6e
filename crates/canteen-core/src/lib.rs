//! # canteen-core: Pure Business Logic for Canteen POS
//!
//! This crate is the **heart** of Canteen POS. It contains all business logic
//! as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Canteen POS Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 UI / View-Model Layer (external)                │   │
//! │  │    Menu UI ──► Cart UI ──► Payment UI ──► Receipt UI           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ canteen-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │   cart    │  │ validation│  │   │
//! │  │   │ Customer  │  │   Money   │  │   Cart    │  │   rules   │  │   │
//! │  │   │ Item      │  │  minor    │  │ CartLine  │  │  checks   │  │   │
//! │  │   │ Receipt   │  │  units    │  │           │  │           │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                   canteen-db (Database Layer)                   │   │
//! │  │        SQLite queries, migrations, repositories, checkout       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Customer, Item, Receipt, etc.)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`cart`] - Transient cart builder used by calling layers
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in minor units (i64) to avoid float errors
//! 4. **Explicit Errors**: All errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use canteen_core::cart::Cart;
//! use canteen_core::money::Money;
//!
//! // Create money from minor units (never from floats!)
//! let price = Money::from_minor(12000);
//!
//! // Build a cart; duplicate items merge by quantity
//! let mut cart = Cart::new();
//! cart.add(10, 2).unwrap();
//! cart.add(10, 1).unwrap();
//!
//! // Line total = price x quantity
//! assert_eq!((price * 3).minor(), 36000);
//! assert_eq!(cart.lines().len(), 1);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use canteen_core::Money` instead of
// `use canteen_core::money::Money`

pub use cart::{Cart, CartLine};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum lines allowed in a single cart
///
/// ## Business Reason
/// Prevents runaway carts and ensures reasonable transaction sizes.
pub const MAX_CART_LINES: usize = 100;

/// Maximum quantity of a single item in one cart line
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10).
pub const MAX_LINE_QUANTITY: i64 = 999;

/// Longest accepted customer id (card numbers, student ids)
pub const MAX_CUSTOMER_ID_LEN: usize = 64;

/// Longest accepted display name for customers and items
pub const MAX_NAME_LEN: usize = 120;

/// Longest accepted item description
pub const MAX_DESCRIPTION_LEN: usize = 500;
