//! # saffron-core: Pure Business Logic for Saffron POS
//!
//! This crate is the **heart** of Saffron POS. It owns the order aggregate
//! (line subtotals, order totals, status transitions) and every business
//! rule that can be decided without touching storage.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Saffron POS Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │               Waiter tablets / Kitchen display                  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ HTTP + WebSocket                       │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                  saffron-api (axum routes)                      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │          saffron-db services (transactions, SQLite)             │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ calls pure functions                   │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ saffron-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │   order   │  │  kitchen  │  │   │
//! │  │   │ MenuItem  │  │   Money   │  │ subtotal  │  │  ticket   │  │   │
//! │  │   │  Order    │  │ "430.00"  │  │ status FSM│  │ publisher │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain entities (MenuItem, DiningTable, Order, Payment, ...)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`order`] - Order aggregate: pricing, totals, status machine, requests
//! - [`kitchen`] - Kitchen ticket snapshot and the publisher boundary
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation rules
//!
//! ## Example Usage
//!
//! ```rust
//! use saffron_core::money::Money;
//! use saffron_core::order::{line_subtotal, order_total};
//!
//! // Pad Thai 120.00 x2 with "Extra Spicy" +10.00
//! let pad_thai = line_subtotal(Money::from_cents(12000), &[Money::from_cents(1000)], 2);
//! // Green Curry 150.00 x1 with "Extra Portion" +20.00
//! let curry = line_subtotal(Money::from_cents(15000), &[Money::from_cents(2000)], 1);
//!
//! assert_eq!(order_total([pad_thai, curry]).to_string(), "430.00");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod kitchen;
pub mod money;
pub mod order;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ErrorKind, ValidationError};
pub use kitchen::{KitchenPublisher, KitchenTicket, NoopPublisher, PublishError, KITCHEN_CHANNEL, ORDER_PLACED_EVENT};
pub use money::Money;
pub use order::{
    check_payment, line_subtotal, order_total, CustomerContact, LineRequest, NewOrder, OrderKind, OrderUpdate,
    PricedLine, PricedModifier, StaffRef,
};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum line items accepted in a single create/update request.
pub const MAX_ORDER_LINES: usize = 100;

/// Maximum quantity on a single order line.
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10).
pub const MAX_ITEM_QUANTITY: i64 = 100;

/// Maximum length of free-text kitchen notes on a line.
pub const MAX_NOTES_LEN: usize = 500;

/// Maximum length of a takeaway customer name.
pub const MAX_CUSTOMER_NAME_LEN: usize = 255;

/// Maximum length of a customer phone number.
pub const MAX_CUSTOMER_PHONE_LEN: usize = 20;

/// Maximum length of a table number ("T01", "VIP02", ...).
pub const MAX_TABLE_NUMBER_LEN: usize = 255;
