//! # Domain Types
//!
//! Core domain types used throughout Saffron POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  CATALOG (reference data)            FLOOR                              │
//! │  ┌──────────┐   ┌──────────┐        ┌──────────────┐                   │
//! │  │ Category │◄──│ MenuItem │        │ DiningTable  │                   │
//! │  └──────────┘   │ price    │        │ table_number │                   │
//! │                 │ available│        │ status       │                   │
//! │                 └────┬─────┘        └──────┬───────┘                   │
//! │                      │ offerable           │ 0..1                      │
//! │                 ┌────┴─────┐               │                           │
//! │                 │ Modifier │        ┌──────┴───────┐   ┌──────────┐    │
//! │                 │ delta    │        │    Order     │──►│ Payment  │    │
//! │                 └────┬─────┘        │ status/total │   │ (0..1)   │    │
//! │                      │ selected     └──────┬───────┘   └──────────┘    │
//! │                 ┌────┴──────────────┐      │ 1..n                      │
//! │                 │ OrderItemModifier │◄─────┤                           │
//! │                 └───────────────────┘ ┌────┴──────┐                    │
//! │                                       │ OrderItem │                    │
//! │                                       └───────────┘                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every entity is keyed by a UUID v4 string. Order items and their
//! modifiers snapshot names and prices so that later catalog edits never
//! change what an existing order costs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;

// =============================================================================
// Catalog
// =============================================================================

/// A menu section ("Appetizers", "Main Courses", ...).
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Category {
    pub id: String,
    pub name: String,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

/// A dish or drink that can be put on an order.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct MenuItem {
    pub id: String,
    pub category_id: String,
    pub name: String,
    pub description: Option<String>,
    /// Unit price in cents, never negative.
    pub price_cents: i64,
    /// Switched off by the kitchen when an ingredient runs out.
    pub is_available: bool,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl MenuItem {
    /// Returns the unit price as Money.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }
}

/// A named price adjustment ("Extra Cheese" +1.50, "Small" -1.00).
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Modifier {
    pub id: String,
    pub name: String,
    /// Price delta in cents. May be negative, zero or positive.
    pub price_change_cents: i64,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Modifier {
    /// Returns the price delta as Money.
    #[inline]
    pub fn price_change(&self) -> Money {
        Money::from_cents(self.price_change_cents)
    }
}

// =============================================================================
// Table Status
// =============================================================================

/// Occupancy of a dine-in table.
///
/// `Occupied` is the mutex bit for seating: a dine-in order can only be
/// created against a table that is not occupied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum TableStatus {
    #[default]
    Available,
    Occupied,
    Reserved,
}

impl TableStatus {
    pub const ALL: [TableStatus; 3] = [TableStatus::Available, TableStatus::Occupied, TableStatus::Reserved];

    pub fn as_str(&self) -> &'static str {
        match self {
            TableStatus::Available => "available",
            TableStatus::Occupied => "occupied",
            TableStatus::Reserved => "reserved",
        }
    }
}

// =============================================================================
// Dining Table
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct DiningTable {
    pub id: String,
    /// Human-facing number painted on the table ("T05", "VIP01").
    pub table_number: String,
    pub status: TableStatus,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Order Type / Status
// =============================================================================

/// Storage-level order type. The richer [`crate::order::OrderKind`] carries
/// the fields each type requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[ts(export)]
pub enum OrderType {
    #[default]
    #[serde(rename = "dine-in")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "dine-in"))]
    DineIn,
    #[serde(rename = "takeaway")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "takeaway"))]
    Takeaway,
}

impl OrderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderType::DineIn => "dine-in",
            OrderType::Takeaway => "takeaway",
        }
    }
}

/// The status of an order.
///
/// ```text
/// pending ──► confirmed ──► preparing ──► ready
///    │            │             ▲           │
///    └────────────┼─────────────┘           │
///                 └──────────► ready        │
///                                           ▼
///  (any non-terminal) ──cancel──► cancelled   completed ◄── payment only
/// ```
///
/// The allow-list lives in [`crate::order`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    Preparing,
    Ready,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 6] = [
        OrderStatus::Pending,
        OrderStatus::Confirmed,
        OrderStatus::Preparing,
        OrderStatus::Ready,
        OrderStatus::Completed,
        OrderStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Preparing => "preparing",
            OrderStatus::Ready => "ready",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

/// Kitchen progress of a single line, independent of the order status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum OrderItemStatus {
    #[default]
    Pending,
    Cooking,
    Ready,
}

impl OrderItemStatus {
    pub const ALL: [OrderItemStatus; 3] = [OrderItemStatus::Pending, OrderItemStatus::Cooking, OrderItemStatus::Ready];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderItemStatus::Pending => "pending",
            OrderItemStatus::Cooking => "cooking",
            OrderItemStatus::Ready => "ready",
        }
    }
}

// =============================================================================
// Payment Method
// =============================================================================

/// How the guest settled the bill. Serialized with the labels printed on
/// the receipt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[ts(export)]
pub enum PaymentMethod {
    #[serde(rename = "Cash")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "Cash"))]
    Cash,
    #[serde(rename = "Credit Card")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "Credit Card"))]
    CreditCard,
    #[serde(rename = "Debit Card")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "Debit Card"))]
    DebitCard,
    #[serde(rename = "QR Payment")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "QR Payment"))]
    QrPayment,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 4] = [
        PaymentMethod::Cash,
        PaymentMethod::CreditCard,
        PaymentMethod::DebitCard,
        PaymentMethod::QrPayment,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "Cash",
            PaymentMethod::CreditCard => "Credit Card",
            PaymentMethod::DebitCard => "Debit Card",
            PaymentMethod::QrPayment => "QR Payment",
        }
    }
}

// =============================================================================
// Display / FromStr
// =============================================================================
// Statuses arrive as plain strings in query filters ("pending,ready") and
// leave as plain strings in messages, so each enum gets both directions
// from its `as_str` table.

macro_rules! str_enum {
    ($ty:ty, $field:literal) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = s.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str() == wanted)
                    .ok_or_else(|| {
                        let allowed: Vec<&str> = Self::ALL.iter().map(|v| v.as_str()).collect();
                        ValidationError::not_allowed($field, &allowed)
                    })
            }
        }
    };
}

impl OrderType {
    pub const ALL: [OrderType; 2] = [OrderType::DineIn, OrderType::Takeaway];
}

str_enum!(TableStatus, "status");
str_enum!(OrderType, "order_type");
str_enum!(OrderStatus, "status");
str_enum!(OrderItemStatus, "status");
str_enum!(PaymentMethod, "payment_method");

// =============================================================================
// Order
// =============================================================================

/// A guest order, dine-in or takeaway.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Order {
    pub id: String,
    /// Set for dine-in orders only.
    pub table_id: Option<String>,
    /// Staff member who opened the order.
    pub staff_id: String,
    pub staff_name: String,
    pub order_type: OrderType,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub status: OrderStatus,
    /// Sum of all line subtotals, recomputed by every mutation.
    pub total_cents: i64,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Returns the order total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

// =============================================================================
// Order Item
// =============================================================================

/// A line on an order.
/// Uses snapshot pattern to freeze menu data at the time it was ordered.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct OrderItem {
    pub id: String,
    pub order_id: String,
    pub menu_item_id: String,
    /// Menu item name at time of ordering (frozen).
    pub name_snapshot: String,
    /// Menu item price at time of ordering (frozen).
    pub unit_price_cents: i64,
    /// Sum of the selected modifier deltas (frozen).
    pub modifiers_cents: i64,
    pub quantity: i64,
    /// (unit_price + modifiers) × quantity.
    pub subtotal_cents: i64,
    pub notes: Option<String>,
    pub status: OrderItemStatus,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl OrderItem {
    /// Returns the line subtotal as Money.
    #[inline]
    pub fn subtotal(&self) -> Money {
        Money::from_cents(self.subtotal_cents)
    }
}

/// A modifier selected on an order line, with its name and delta frozen.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct OrderItemModifier {
    pub order_item_id: String,
    pub modifier_id: String,
    pub name_snapshot: String,
    pub price_change_cents: i64,
}

// =============================================================================
// Payment
// =============================================================================

/// Settlement of an order. At most one is accepted per order.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Payment {
    pub id: String,
    pub order_id: String,
    pub payment_method: PaymentMethod,
    pub amount_cents: i64,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Payment {
    /// Returns the payment amount as Money.
    #[inline]
    pub fn amount(&self) -> Money {
        Money::from_cents(self.amount_cents)
    }
}

// =============================================================================
// Loaded Aggregates
// =============================================================================

/// An order line with everything a waiter or the kitchen needs to see.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OrderLine {
    pub item: OrderItem,
    pub category_name: String,
    pub modifiers: Vec<OrderItemModifier>,
}

/// An order with its relations loaded.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OrderDetails {
    pub order: Order,
    pub table: Option<DiningTable>,
    pub lines: Vec<OrderLine>,
    /// Latest payment, if the order has been paid.
    pub payment: Option<Payment>,
}

/// A menu item together with the modifiers it may be ordered with.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MenuItemDetails {
    pub item: MenuItem,
    pub category_name: String,
    pub modifiers: Vec<Modifier>,
}

/// A table together with the orders currently open on it.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TableOverview {
    pub table: DiningTable,
    pub active_orders: Vec<Order>,
}

// =============================================================================
// Unit Tests
// =============================================================================
