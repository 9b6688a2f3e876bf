//! # Validation Module
//!
//! Input validation utilities for Saffron POS.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: HTTP handler (saffron-api)                                   │
//! │  ├── JSON deserialization, enum literals                               │
//! │  └── Decimal amount parsing                                            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Request constructors (order.rs)                              │
//! │  └── THIS MODULE: field rules, run before any storage access           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── CHECK constraints on statuses and quantities                      │
//! │  ├── UNIQUE table numbers                                              │
//! │  └── Foreign key constraints                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use saffron_core::validation::{validate_quantity, validate_notes};
//!
//! validate_quantity(2).unwrap();
//! assert!(validate_notes(Some("no peanuts")).is_ok());
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::{MAX_CUSTOMER_NAME_LEN, MAX_CUSTOMER_PHONE_LEN, MAX_ITEM_QUANTITY, MAX_NOTES_LEN, MAX_TABLE_NUMBER_LEN};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates that an identifier or name is present.
///
/// ## Returns
/// The trimmed value.
pub fn validate_required(field: &str, value: &str) -> ValidationResult<String> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    Ok(value.to_string())
}

fn validate_max_len(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }
    Ok(())
}

/// Validates kitchen notes on an order line.
///
/// ## Rules
/// - Optional
/// - Blank notes are treated as absent
/// - Maximum 500 characters
///
/// ## Example
/// ```rust
/// use saffron_core::validation::validate_notes;
///
/// assert_eq!(validate_notes(Some("  ")).unwrap(), None);
/// assert!(validate_notes(Some(&"x".repeat(501))).is_err());
/// ```
pub fn validate_notes(notes: Option<&str>) -> ValidationResult<Option<String>> {
    let Some(notes) = notes.map(str::trim).filter(|n| !n.is_empty()) else {
        return Ok(None);
    };

    validate_max_len("notes", notes, MAX_NOTES_LEN)?;
    Ok(Some(notes.to_string()))
}

/// Validates a customer name.
///
/// ## Rules
/// - Required for takeaway orders (enforced by the caller)
/// - Maximum 255 characters
pub fn validate_customer_name(name: &str) -> ValidationResult<String> {
    let name = validate_required("customer_name", name)?;
    validate_max_len("customer_name", &name, MAX_CUSTOMER_NAME_LEN)?;
    Ok(name)
}

/// Validates an optional customer phone number.
///
/// Only length is checked; formats vary too much between callers.
pub fn validate_customer_phone(phone: Option<&str>) -> ValidationResult<Option<String>> {
    let Some(phone) = phone.map(str::trim).filter(|p| !p.is_empty()) else {
        return Ok(None);
    };

    validate_max_len("customer_phone", phone, MAX_CUSTOMER_PHONE_LEN)?;
    Ok(Some(phone.to_string()))
}

/// Validates a table number ("T01", "VIP02").
pub fn validate_table_number(number: &str) -> ValidationResult<String> {
    let number = validate_required("table_number", number)?;
    validate_max_len("table_number", &number, MAX_TABLE_NUMBER_LEN)?;
    Ok(number)
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates an order line quantity.
///
/// ## Rules
/// - Must be at least 1
/// - Must be at most MAX_ITEM_QUANTITY (100)
///
/// ## Example
/// ```rust
/// use saffron_core::validation::validate_quantity;
///
/// assert!(validate_quantity(1).is_ok());
/// assert!(validate_quantity(0).is_err());
/// assert!(validate_quantity(101).is_err());
/// ```
pub fn validate_quantity(quantity: i64) -> ValidationResult<()> {
    if !(1..=MAX_ITEM_QUANTITY).contains(&quantity) {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a tendered payment amount.
///
/// Zero is accepted so that a zero-total order can still be settled.
/// Negative amounts are refused, so an order whose modifiers push its total
/// below zero cannot be paid and has to be cancelled.
pub fn validate_payment_amount(amount: Money) -> ValidationResult<()> {
    if amount.is_negative() {
        return Err(ValidationError::Negative {
            field: "amount".to_string(),
        });
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
    fn test_validate_quantity_bounds() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(100).is_ok());
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-3).is_err());
        assert!(validate_quantity(101).is_err());
    }

    #[test]
    fn test_validate_required_trims() {
        assert_eq!(validate_required("table_id", "  t-1 ").unwrap(), "t-1");
        assert!(matches!(
            validate_required("table_id", "   "),
            Err(ValidationError::Required { .. })
        ));
    }

    #[test]
    fn test_validate_customer_fields() {
        assert_eq!(validate_customer_name("Somchai").unwrap(), "Somchai");
        assert!(validate_customer_name("").is_err());
        assert!(validate_customer_name(&"a".repeat(256)).is_err());

        assert_eq!(validate_customer_phone(None).unwrap(), None);
        assert_eq!(
            validate_customer_phone(Some("081-234-5678")).unwrap().as_deref(),
            Some("081-234-5678")
        );
        assert!(validate_customer_phone(Some("0123456789012345678901")).is_err());
    }

    #[test]
    fn test_validate_notes_length_counts_characters() {
        // 500 multi-byte characters are within the limit
        let thai = "ก".repeat(500);
        assert!(validate_notes(Some(&thai)).is_ok());
    }

    #[test]
    fn test_validate_table_number() {
        assert_eq!(validate_table_number(" VIP01 ").unwrap(), "VIP01");
        assert!(validate_table_number("").is_err());
    }

    #[test]
    fn test_validate_payment_amount() {
        assert!(validate_payment_amount(Money::zero()).is_ok());
        assert!(validate_payment_amount(Money::from_cents(38000)).is_ok());
        assert!(matches!(
            validate_payment_amount(Money::from_cents(-1)),
            Err(ValidationError::Negative { .. })
        ));
    }
}
