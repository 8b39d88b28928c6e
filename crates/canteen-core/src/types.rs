//! # Domain Types
//!
//! Core domain types used throughout Canteen POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Customer     │   │      Item       │   │    Receipt      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (card no.)  │   │  id (assigned)  │   │  id (assigned)  │       │
//! │  │  name           │   │  category       │   │  customer_id    │       │
//! │  │  customer_type  │   │  name, price    │   │  payment_method │       │
//! │  │  balance        │   │  stock          │   │  total          │       │
//! │  └─────────────────┘   └─────────────────┘   └────────┬────────┘       │
//! │                                                       │ 1:N            │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌────────▼────────┐       │
//! │  │  ItemCategory   │   │ PaymentMethod   │   │  ReceiptLine    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  Food           │   │  Balance        │   │  receipt_id     │       │
//! │  │  Drink          │   │  Cash           │   │  item_id        │       │
//! │  │  Misc           │   └─────────────────┘   │  quantity       │       │
//! │  └─────────────────┘                         └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity Pattern
//! - `Customer.id`: caller-supplied string (card number, student id) - unique
//! - `Item.id` / `Receipt.id`: store-assigned integers, never reused
//! - `ReceiptLine`: composite identity (receipt_id, item_id)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// Customer
// =============================================================================

/// A customer holding a prepaid balance.
///
/// Created on registration with a zero balance. The balance is mutated only
/// by top-up/debit adjustments or by a committed purchase; customers are
/// never deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Customer {
    /// Caller-supplied identifier (card number, student id). Unique.
    pub id: String,

    /// Display name shown on receipts and at the till.
    pub name: String,

    /// Free-form classification tag ("student", "staff", ...).
    pub customer_type: String,

    /// Prepaid balance in minor currency units. Never negative.
    pub balance: Money,

    /// When the customer was registered.
    pub created_at: DateTime<Utc>,
}

impl Customer {
    /// Checks whether the balance covers `total`.
    #[inline]
    pub fn can_afford(&self, total: Money) -> bool {
        self.balance >= total
    }
}

/// Input shape for customer registration. Balance always starts at zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCustomer {
    pub id: String,
    pub name: String,
    pub customer_type: String,
}

// =============================================================================
// Item Category
// =============================================================================

/// Menu classification for catalog items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum ItemCategory {
    /// Cooked dishes and snacks.
    Food,
    /// Bottled and fountain drinks.
    Drink,
    /// Everything else sold over the counter.
    Misc,
}

// =============================================================================
// Item
// =============================================================================

/// A purchasable catalog item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Item {
    /// Store-assigned identifier.
    pub id: i64,

    /// Menu category used for display grouping and lookups.
    pub category: ItemCategory,

    /// Display name shown on the menu and on receipts.
    pub name: String,

    /// Unit price in minor currency units. Never negative.
    pub price: Money,

    /// Free-text description for the menu.
    pub description: String,

    /// Units available for sale. Decremented by committed purchases.
    pub stock: i64,

    /// When the item was added to the catalog.
    pub created_at: DateTime<Utc>,

    /// When the item was last changed.
    pub updated_at: DateTime<Utc>,
}

impl Item {
    /// Checks whether `quantity` units can currently be sold.
    #[inline]
    pub fn in_stock(&self, quantity: i64) -> bool {
        self.stock >= quantity
    }
}

/// Input shape for adding a catalog item. The id and timestamps are assigned
/// by the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewItem {
    pub category: ItemCategory,
    pub name: String,
    pub price: Money,
    pub description: String,
    pub stock: i64,
}

/// Input shape for editing a catalog item. Replaces every mutable field;
/// the id and `created_at` never change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemUpdate {
    pub category: ItemCategory,
    pub name: String,
    pub price: Money,
    pub description: String,
    pub stock: i64,
}

// =============================================================================
// Payment Method
// =============================================================================

/// Tender tag recorded on a receipt.
///
/// The tag is descriptive only: every purchase debits the prepaid balance,
/// whether the operator marked it as balance or cash at the till.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Paid from the prepaid balance.
    Balance,
    /// Cash handed over at the till.
    Cash,
}

// =============================================================================
// Receipt
// =============================================================================

/// A durable record of one completed purchase.
///
/// Created exactly once per purchase transaction together with its lines and
/// the balance debit; immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Receipt {
    /// Store-assigned identifier.
    pub id: i64,

    /// The customer whose balance paid for this purchase.
    pub customer_id: String,

    /// Tender tag recorded at the till.
    pub payment_method: PaymentMethod,

    /// When the purchase was committed.
    pub created_at: DateTime<Utc>,

    /// Amount debited: the sum over all lines of price × quantity at
    /// purchase time.
    pub total: Money,
}

// =============================================================================
// Receipt Line
// =============================================================================

/// One (item, quantity) entry belonging to a receipt.
///
/// Written only as part of a purchase transaction, one row per distinct cart
/// item; never updated or deleted. The unit price is not stored here, so
/// reconstructing a receipt reprices against the current catalog (see the
/// receipt read path).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct ReceiptLine {
    pub receipt_id: i64,
    pub item_id: i64,
    pub quantity: i64,
}

// =============================================================================
// Item Order
// =============================================================================

/// One reconstructed receipt line: the full item record plus the purchased
/// quantity. Transient, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct ItemOrder {
    /// Current catalog record for the purchased item.
    #[cfg_attr(feature = "sqlx", sqlx(flatten))]
    pub item: Item,

    /// Quantity purchased.
    pub quantity: i64,
}

impl ItemOrder {
    /// Line total at the item's current catalog price.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.item.price * self.quantity
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn test_item(price: i64, stock: i64) -> Item {
        Item {
            id: 10,
            category: ItemCategory::Food,
            name: "Beef Noodles".to_string(),
            price: Money::from_minor(price),
            description: String::new(),
            stock,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_customer_can_afford() {
        let customer = Customer {
            id: "CARD-001".to_string(),
            name: "An Nguyen".to_string(),
            customer_type: "student".to_string(),
            balance: Money::from_minor(50000),
            created_at: Utc::now(),
        };

        assert!(customer.can_afford(Money::from_minor(36000)));
        assert!(customer.can_afford(Money::from_minor(50000)));
        assert!(!customer.can_afford(Money::from_minor(50001)));
    }

    #[test]
    fn test_item_in_stock() {
        let item = test_item(12000, 3);
        assert!(item.in_stock(3));
        assert!(!item.in_stock(4));
        assert!(item.in_stock(0));
    }

    #[test]
    fn test_item_order_line_total() {
        let order = ItemOrder {
            item: test_item(12000, 10),
            quantity: 2,
        };
        assert_eq!(order.line_total(), Money::from_minor(24000));
    }
}
