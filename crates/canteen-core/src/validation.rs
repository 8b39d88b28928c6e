//! # Validation Module
//!
//! Input validation utilities for Canteen POS.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: UI / View-Model (external)                                   │
//! │  ├── Basic format checks (empty, length)                               │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE (Rust)                                           │
//! │  ├── Field validation before any store access                          │
//! │  └── Cart shape and quantity rules                                     │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL and CHECK constraints                                    │
//! │  ├── UNIQUE constraints                                                │
//! │  └── Foreign key constraints                                           │
//! │                                                                         │
//! │  Multiple layers catch different errors                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use canteen_core::validation::{validate_customer_id, validate_quantity};
//!
//! // Validate a card id before registration
//! validate_customer_id("CARD-001").unwrap();
//!
//! // Validate a cart-line quantity before checkout
//! validate_quantity(10, 2).unwrap();
//! ```

use crate::cart::CartLine;
use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::{MAX_CART_LINES, MAX_CUSTOMER_ID_LEN, MAX_DESCRIPTION_LEN, MAX_LINE_QUANTITY, MAX_NAME_LEN};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a customer id (card number, student id).
///
/// ## Rules
/// - Must not be empty
/// - Must be at most 64 characters
///
/// ## Example
/// ```rust
/// use canteen_core::validation::validate_customer_id;
///
/// assert!(validate_customer_id("CARD-001").is_ok());
/// assert!(validate_customer_id("").is_err());
/// assert!(validate_customer_id("A".repeat(100).as_str()).is_err());
/// ```
pub fn validate_customer_id(id: &str) -> ValidationResult<()> {
    let id = id.trim();

    if id.is_empty() {
        return Err(ValidationError::Required {
            field: "customer id".to_string(),
        });
    }

    if id.len() > MAX_CUSTOMER_ID_LEN {
        return Err(ValidationError::TooLong {
            field: "customer id".to_string(),
            max: MAX_CUSTOMER_ID_LEN,
        });
    }

    Ok(())
}

/// Validates a display name (customer or catalog item).
///
/// ## Rules
/// - Must not be empty
/// - Must be at most 120 characters
///
/// ## Example
/// ```rust
/// use canteen_core::validation::validate_name;
///
/// assert!(validate_name("Beef Noodles").is_ok());
/// assert!(validate_name("").is_err());
/// ```
pub fn validate_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.len() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(())
}

/// Validates a customer type tag ("student", "staff", ...).
///
/// ## Rules
/// - Must not be empty
/// - Must be at most 120 characters
pub fn validate_customer_type(customer_type: &str) -> ValidationResult<()> {
    let tag = customer_type.trim();

    if tag.is_empty() {
        return Err(ValidationError::Required {
            field: "customer type".to_string(),
        });
    }

    if tag.len() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "customer type".to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(())
}

/// Validates an item description.
///
/// ## Rules
/// - Can be empty
/// - Maximum 500 characters
pub fn validate_description(description: &str) -> ValidationResult<()> {
    if description.len() > MAX_DESCRIPTION_LEN {
        return Err(ValidationError::TooLong {
            field: "description".to_string(),
            max: MAX_DESCRIPTION_LEN,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a cart-line quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_LINE_QUANTITY (999)
///
/// ## User Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Checkout: Submit Purchase                                              │
/// │                                                                         │
/// │  Cart line: (item 10, qty 2)                                           │
/// │       │                                                                 │
/// │       ▼                                                                 │
/// │  validate_quantity(10, 2) ← THIS FUNCTION                              │
/// │       │                                                                 │
/// │       ├── qty <= 0?  → InvalidQuantity { item_id: 10, quantity }       │
/// │       │                                                                 │
/// │       ├── qty > 999? → InvalidQuantity { item_id: 10, quantity }       │
/// │       │                                                                 │
/// │       └── OK → Proceed with purchase                                   │
/// │                                                                         │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn validate_quantity(item_id: i64, quantity: i64) -> CoreResult<()> {
    if quantity <= 0 || quantity > MAX_LINE_QUANTITY {
        return Err(CoreError::InvalidQuantity { item_id, quantity });
    }

    Ok(())
}

/// Validates an item price.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (free items)
///
/// ## Example
/// ```rust
/// use canteen_core::money::Money;
/// use canteen_core::validation::validate_price;
///
/// assert!(validate_price(Money::from_minor(12000)).is_ok());
/// assert!(validate_price(Money::zero()).is_ok());
/// assert!(validate_price(Money::from_minor(-100)).is_err());
/// ```
pub fn validate_price(price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::MustNotBeNegative {
            field: "price".to_string(),
        });
    }

    Ok(())
}

/// Validates a stock level for catalog writes.
///
/// ## Rules
/// - Must be non-negative (>= 0)
pub fn validate_stock(stock: i64) -> ValidationResult<()> {
    if stock < 0 {
        return Err(ValidationError::MustNotBeNegative {
            field: "stock".to_string(),
        });
    }

    Ok(())
}

/// Validates a balance adjustment amount (top-up or debit).
///
/// ## Rules
/// - Must be strictly positive (> 0)
/// - Zero and negative adjustments are rejected with `InvalidAmount`
pub fn validate_amount(amount: Money) -> CoreResult<()> {
    if !amount.is_positive() {
        return Err(CoreError::InvalidAmount { amount });
    }

    Ok(())
}

// =============================================================================
// Cart Validators
// =============================================================================

/// Validates the shape of a submitted cart.
///
/// ## Rules
/// - Must not be empty (`EmptyCart`)
/// - Must not exceed MAX_CART_LINES (`CartTooLarge`)
/// - Every line quantity must pass [`validate_quantity`]
///
/// First failure wins; the caller gets exactly one error per attempt.
pub fn validate_cart(lines: &[CartLine]) -> CoreResult<()> {
    if lines.is_empty() {
        return Err(CoreError::EmptyCart);
    }

    if lines.len() > MAX_CART_LINES {
        return Err(CoreError::CartTooLarge {
            max: MAX_CART_LINES,
        });
    }

    for line in lines {
        validate_quantity(line.item_id, line.quantity)?;
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_customer_id() {
        assert!(validate_customer_id("CARD-001").is_ok());
        assert!(validate_customer_id("sv2021001").is_ok());

        assert!(validate_customer_id("").is_err());
        assert!(validate_customer_id("   ").is_err());
        assert!(validate_customer_id(&"A".repeat(100)).is_err());
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("Beef Noodles").is_ok());
        assert!(validate_name("").is_err());
        assert!(validate_name(&"A".repeat(300)).is_err());
    }

    #[test]
    fn test_validate_customer_type() {
        assert!(validate_customer_type("student").is_ok());
        assert!(validate_customer_type("").is_err());
    }

    #[test]
    fn test_validate_description() {
        assert!(validate_description("").is_ok());
        assert!(validate_description("with extra chili").is_ok());
        assert!(validate_description(&"A".repeat(600)).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(10, 1).is_ok());
        assert!(validate_quantity(10, 999).is_ok());

        assert!(matches!(
            validate_quantity(10, 0),
            Err(CoreError::InvalidQuantity {
                item_id: 10,
                quantity: 0
            })
        ));
        assert!(validate_quantity(10, -1).is_err());
        assert!(validate_quantity(10, 1000).is_err());
    }

    #[test]
    fn test_validate_price() {
        assert!(validate_price(Money::from_minor(12000)).is_ok());
        assert!(validate_price(Money::zero()).is_ok());
        assert!(validate_price(Money::from_minor(-100)).is_err());
    }

    #[test]
    fn test_validate_stock() {
        assert!(validate_stock(0).is_ok());
        assert!(validate_stock(25).is_ok());
        assert!(validate_stock(-1).is_err());
    }

    #[test]
    fn test_validate_amount() {
        assert!(validate_amount(Money::from_minor(10000)).is_ok());

        assert!(matches!(
            validate_amount(Money::zero()),
            Err(CoreError::InvalidAmount { .. })
        ));
        assert!(validate_amount(Money::from_minor(-5000)).is_err());
    }

    #[test]
    fn test_validate_cart() {
        let lines = vec![
            CartLine {
                item_id: 10,
                quantity: 2,
            },
            CartLine {
                item_id: 11,
                quantity: 1,
            },
        ];
        assert!(validate_cart(&lines).is_ok());

        assert!(matches!(validate_cart(&[]), Err(CoreError::EmptyCart)));

        let oversized: Vec<CartLine> = (0..=MAX_CART_LINES as i64)
            .map(|i| CartLine {
                item_id: i,
                quantity: 1,
            })
            .collect();
        assert!(matches!(
            validate_cart(&oversized),
            Err(CoreError::CartTooLarge { .. })
        ));

        let bad_quantity = vec![CartLine {
            item_id: 10,
            quantity: 0,
        }];
        assert!(matches!(
            validate_cart(&bad_quantity),
            Err(CoreError::InvalidQuantity { .. })
        ));
    }
}
