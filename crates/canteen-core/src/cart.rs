//! # Cart Module
//!
//! The transient cart a calling layer builds up before submitting a purchase.
//!
//! Cart lines carry only `(item_id, quantity)`. Prices are NOT captured here:
//! the purchase core resolves every line against the catalog at submit time,
//! which is where the total comes from.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Cart Operations                                   │
//! │                                                                         │
//! │  Till Action              Cart Call                Cart Change          │
//! │  ───────────              ─────────                ───────────          │
//! │                                                                         │
//! │  Tap menu item ─────────► add(id, qty) ──────────► merge or push line  │
//! │                                                                         │
//! │  Change quantity ───────► update_quantity(id, n) ► line.quantity = n   │
//! │                                                                         │
//! │  Remove line ───────────► remove(id) ────────────► lines.remove(i)     │
//! │                                                                         │
//! │  New customer ──────────► clear() ───────────────► lines.clear()       │
//! │                                                                         │
//! │  Pay ───────────────────► lines() ───────────────► feed checkout       │
//! │                                                                         │
//! │  NOTE: duplicate item ids always merge here. The purchase transaction  │
//! │        stores one line per distinct item and rejects duplicates.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::validation::validate_quantity;
use crate::{MAX_CART_LINES, MAX_LINE_QUANTITY};

// =============================================================================
// Cart Line
// =============================================================================

/// One requested `(item, quantity)` pair, the input shape of a purchase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    /// Catalog item being purchased.
    pub item_id: i64,

    /// Units requested. Always in `1..=MAX_LINE_QUANTITY`.
    pub quantity: i64,
}

// =============================================================================
// Cart
// =============================================================================

/// The transient, unpersisted list of lines requested by a purchase call.
///
/// ## Invariants
/// - Lines are unique by `item_id` (adding the same item merges quantities)
/// - Every quantity is in `1..=MAX_LINE_QUANTITY`
/// - At most MAX_CART_LINES lines
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart { lines: Vec::new() }
    }

    /// Adds an item to the cart or increases its quantity if already present.
    ///
    /// ## Behavior
    /// - If the item is already in the cart: quantities are summed
    /// - If the item is not in the cart: a new line is appended
    ///
    /// ## Errors
    /// - `InvalidQuantity` if `quantity` (or the merged quantity) leaves
    ///   `1..=MAX_LINE_QUANTITY`
    /// - `CartTooLarge` if a new line would exceed MAX_CART_LINES
    pub fn add(&mut self, item_id: i64, quantity: i64) -> CoreResult<()> {
        validate_quantity(item_id, quantity)?;

        if let Some(line) = self.lines.iter_mut().find(|l| l.item_id == item_id) {
            let merged = line.quantity + quantity;
            if merged > MAX_LINE_QUANTITY {
                return Err(CoreError::InvalidQuantity {
                    item_id,
                    quantity: merged,
                });
            }
            line.quantity = merged;
            return Ok(());
        }

        if self.lines.len() >= MAX_CART_LINES {
            return Err(CoreError::CartTooLarge {
                max: MAX_CART_LINES,
            });
        }

        self.lines.push(CartLine { item_id, quantity });
        Ok(())
    }

    /// Sets the quantity of a line.
    ///
    /// ## Behavior
    /// - If `quantity` is 0: removes the line
    /// - If the item is not in the cart: returns `ItemNotFound`
    pub fn update_quantity(&mut self, item_id: i64, quantity: i64) -> CoreResult<()> {
        if quantity == 0 {
            return self.remove(item_id);
        }

        validate_quantity(item_id, quantity)?;

        if let Some(line) = self.lines.iter_mut().find(|l| l.item_id == item_id) {
            line.quantity = quantity;
            Ok(())
        } else {
            Err(CoreError::ItemNotFound(item_id))
        }
    }

    /// Removes a line by item id.
    pub fn remove(&mut self, item_id: i64) -> CoreResult<()> {
        let initial_len = self.lines.len();
        self.lines.retain(|l| l.item_id != item_id);

        if self.lines.len() == initial_len {
            Err(CoreError::ItemNotFound(item_id))
        } else {
            Ok(())
        }
    }

    /// Clears all lines.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// The lines in insertion order, ready for checkout.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Consumes the cart, returning its lines.
    pub fn into_lines(self) -> Vec<CartLine> {
        self.lines
    }

    /// Returns the number of distinct lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Returns the total quantity across all lines.
    pub fn total_quantity(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Checks if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
