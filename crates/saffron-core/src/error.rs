//! # Error Types
//!
//! Domain-specific error types for saffron-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  saffron-core errors (this file)                                       │
//! │  ├── CoreError        - Business rule violations (conflicts)           │
//! │  └── ValidationError  - Malformed or missing input                     │
//! │                                                                         │
//! │  saffron-db errors (separate crate)                                    │
//! │  ├── DbError          - Storage failures, missing rows                 │
//! │  └── ServiceError     - CoreError | DbError from one service call      │
//! │                                                                         │
//! │  saffron-api errors                                                    │
//! │  └── ApiError         - What the client sees (code + message)          │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ServiceError → ApiError → Client  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use crate::money::Money;
use crate::types::OrderStatus;

// =============================================================================
// Error Kind
// =============================================================================

/// Coarse classification every layer maps its errors onto.
///
/// ```text
/// Validation  → bad input, nothing was touched
/// Conflict    → input is fine, current state forbids it
/// NotFound    → a referenced row does not exist
/// Unexpected  → storage / infrastructure failure, rolled back
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Conflict,
    NotFound,
    Unexpected,
}

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// Every variant except [`CoreError::Validation`] is a conflict with the
/// current state of an order, table or menu item. Messages are shown to
/// staff as-is.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Dine-in order placed against a table someone is already seated at.
    ///
    /// ## When This Occurs
    /// - Table status is `occupied` when the creating transaction claims it
    /// - Two waiters seat guests at the same table at the same moment; the
    ///   second transaction to reach the table loses
    #[error("Table {table_number} is already occupied. Please select another table.")]
    TableOccupied { table_number: String },

    /// A line references a menu item that the kitchen has switched off.
    #[error("Menu item '{name}' is currently unavailable.")]
    MenuItemUnavailable { name: String },

    /// Update or kitchen-status change on a completed/cancelled order.
    #[error("Cannot modify a completed or cancelled order.")]
    OrderNotModifiable { order_id: String, status: OrderStatus },

    /// Second payment attempt against the same order.
    #[error("This order has already been paid.")]
    OrderAlreadyPaid { order_id: String },

    /// Payment attempt against a cancelled order.
    #[error("Cannot process payment for a cancelled order.")]
    OrderCancelled { order_id: String },

    /// Payment amount differs from the order total.
    ///
    /// ## User Workflow
    /// ```text
    /// Order total: 380.00
    ///      │
    ///      ▼
    /// Cashier enters 300.00
    ///      │
    ///      ▼
    /// PaymentAmountMismatch { expected: 380.00, received: 300.00 }
    ///      │
    ///      ▼
    /// Tablet shows both values, cashier re-enters
    /// ```
    #[error("Payment amount does not match order total (expected {expected}, received {received}).")]
    PaymentAmountMismatch { expected: Money, received: Money },

    /// Requested status change is not on the allow-list.
    #[error("Cannot change order status from {from} to {to}.")]
    InvalidStatusTransition { from: OrderStatus, to: OrderStatus },

    /// Table deletion while orders are still open on it.
    #[error("Cannot delete table {table_number} while it has active orders.")]
    TableHasActiveOrders { table_number: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Classifies this error for the API layer.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CoreError::Validation(_) => ErrorKind::Validation,
            _ => ErrorKind::Conflict,
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Raised before any storage access.
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
    Negative { field: String },

    /// Invalid format (e.g., "12.345" as an amount).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },
}

impl ValidationError {
    pub(crate) fn not_allowed(field: &str, allowed: &[&str]) -> Self {
        ValidationError::NotAllowed {
            field: field.to_string(),
            allowed: allowed.iter().map(|s| s.to_string()).collect(),
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
