//! # Error Types
//!
//! Domain-specific error types for canteen-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  canteen-core errors (this file)                                       │
//! │  ├── CoreError        - Domain rule failures (funds, stock, lookup)    │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  canteen-db errors (separate crate)                                    │
//! │  └── DbError          - Store failures, wraps CoreError for callers    │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → caller                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (customer id, item id, amounts)
//! 3. Errors are enum variants, never String
//! 4. Each error variant maps to a user-facing message

use thiserror::Error;

use crate::money::Money;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These errors represent business rule violations or domain logic failures.
/// All of them are non-retryable: the caller must correct the request before
/// trying again. They should be caught and translated to user-friendly
/// messages at the till.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The submitted cart has no lines.
    #[error("Cart is empty")]
    EmptyCart,

    /// Cart has exceeded maximum allowed lines.
    #[error("Cart cannot have more than {max} lines")]
    CartTooLarge { max: usize },

    /// A cart line carries a non-positive or oversized quantity.
    ///
    /// ## When This Occurs
    /// - Quantity is zero or negative
    /// - Quantity exceeds [`crate::MAX_LINE_QUANTITY`] (mistyped amount)
    #[error("Invalid quantity {quantity} for item {item_id}")]
    InvalidQuantity { item_id: i64, quantity: i64 },

    /// A balance adjustment amount is not strictly positive.
    #[error("Invalid adjustment amount: {amount}")]
    InvalidAmount { amount: Money },

    /// Customer cannot be found.
    #[error("Customer not found: {0}")]
    CustomerNotFound(String),

    /// Catalog item cannot be found.
    ///
    /// The failing id aborts the whole purchase; no partial cart is ever
    /// accepted.
    #[error("Item not found: {0}")]
    ItemNotFound(i64),

    /// The customer's prepaid balance does not cover the purchase total.
    ///
    /// ## User Workflow
    /// ```text
    /// SubmitPurchase (total: 36000)
    ///      │
    ///      ▼
    /// Load customer: balance=20000
    ///      │
    ///      ▼
    /// InsufficientFunds { customer_id, required: 36000, available: 20000 }
    ///      │
    ///      ▼
    /// Till shows: "Balance too low, top up 16000"
    /// ```
    #[error("Insufficient funds for {customer_id}: required {required}, available {available}")]
    InsufficientFunds {
        customer_id: String,
        required: Money,
        available: Money,
    },

    /// Insufficient stock to complete the purchase.
    ///
    /// ## When This Occurs
    /// - A cart line requests more units than the catalog has available
    /// - A concurrent purchase took the last units before this one committed
    #[error("Insufficient stock for item {item_id}: available {available}, requested {requested}")]
    InsufficientStock {
        item_id: i64,
        available: i64,
        requested: i64,
    },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Used for early validation before business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InsufficientFunds {
            customer_id: "CARD-001".to_string(),
            required: Money::from_minor(36000),
            available: Money::from_minor(20000),
        };
        assert_eq!(
            err.to_string(),
            "Insufficient funds for CARD-001: required 36000, available 20000"
        );

        let err = CoreError::InsufficientStock {
            item_id: 10,
            available: 3,
            requested: 5,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock for item 10: available 3, requested 5"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "customer id".to_string(),
        };
        assert_eq!(err.to_string(), "customer id is required");

        let err = ValidationError::TooLong {
            field: "name".to_string(),
            max: 120,
        };
        assert_eq!(err.to_string(), "name must be at most 120 characters");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "customer id".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
