//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  A payment of "380.00" must equal an order total of 380.00 EXACTLY.    │
//! │  With floats, a total built from 12 line items may come out as         │
//! │  379.99999999 and a correct payment is rejected.                       │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    Prices, deltas, subtotals, totals and payments are all i64 cents.   │
//! │    Decimal strings only exist at the HTTP boundary.                    │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use saffron_core::money::Money;
//!
//! // Create from cents (preferred)
//! let pad_thai = Money::from_cents(12000); // 120.00
//!
//! // Arithmetic operations
//! let with_extra = pad_thai + Money::from_cents(1000); // 130.00
//! let line = with_extra.multiply_quantity(2);            // 260.00
//! assert_eq!(line.to_string(), "260.00");
//!
//! // Parsing what the cashier typed
//! let paid = Money::parse_decimal("amount", "260.00").unwrap();
//! assert_eq!(paid, line);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::Add;
use ts_rs::TS;

use crate::error::ValidationError;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the smallest currency unit (cents).
///
/// ## Design Decisions
/// - **i64 (signed)**: Modifier deltas may be negative ("Small" -1.00)
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Display**: Plain two-decimal string ("430.00"), no currency symbol
///
/// ## Where Money is Used
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  MenuItem.price_cents ──┐                                               │
/// │                         ├──► line_subtotal() ──► OrderItem.subtotal     │
/// │  Modifier.price_change ─┘                              │                │
/// │                                                        ▼                │
/// │                                     order_total() ──► Order.total       │
/// │                                                        │                │
/// │  "380.00" ──► parse_decimal() ──► Payment.amount ──► must be equal     │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use saffron_core::money::Money;
    ///
    /// let price = Money::from_cents(899); // Chicken Wings, 8.99
    /// assert_eq!(price.cents(), 899);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Parses a decimal amount such as `"380"`, `"380.5"` or `"380.00"`.
    ///
    /// ## Rules
    /// - Optional leading `-`
    /// - At most two fractional digits; `"12.345"` is rejected, never rounded
    /// - No exponent, no thousands separators, no trailing dot
    ///
    /// ## Arguments
    /// * `field` - Field name used in the validation error
    /// * `input` - The raw text
    ///
    /// ## Example
    /// ```rust
    /// use saffron_core::money::Money;
    ///
    /// assert_eq!(Money::parse_decimal("amount", "430").unwrap().cents(), 43000);
    /// assert_eq!(Money::parse_decimal("amount", "0.5").unwrap().cents(), 50);
    /// assert!(Money::parse_decimal("amount", "12.345").is_err());
    /// ```
    pub fn parse_decimal(field: &str, input: &str) -> Result<Money, ValidationError> {
        let invalid = |reason: &str| ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: reason.to_string(),
        };

        let text = input.trim();
        let (negative, digits) = match text.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, text),
        };

        let (whole, fraction) = match digits.split_once('.') {
            Some((_, "")) => return Err(invalid("must be a decimal number")),
            Some((whole, fraction)) => (whole, fraction),
            None => (digits, ""),
        };

        if whole.is_empty() && fraction.is_empty() {
            return Err(invalid("must be a decimal number"));
        }
        if !whole.bytes().all(|b| b.is_ascii_digit()) || !fraction.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid("must be a decimal number"));
        }
        if fraction.len() > 2 {
            return Err(invalid("must have at most 2 decimal places"));
        }

        let whole_cents = if whole.is_empty() {
            0
        } else {
            whole
                .parse::<i64>()
                .ok()
                .and_then(|w| w.checked_mul(100))
                .ok_or_else(|| invalid("is too large"))?
        };

        let fraction_cents = match fraction.len() {
            0 => 0,
            1 => fraction.parse::<i64>().map_err(|_| invalid("must be a decimal number"))? * 10,
            _ => fraction.parse::<i64>().map_err(|_| invalid("must be a decimal number"))?,
        };

        let cents = whole_cents
            .checked_add(fraction_cents)
            .ok_or_else(|| invalid("is too large"))?;

        Ok(Money(if negative { -cents } else { cents }))
    }

    /// Returns the value in cents (smallest currency unit).
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit portion (truncated toward zero).
    ///
    /// ## Example
    /// ```rust
    /// use saffron_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(1099).major(), 10);
    /// assert_eq!(Money::from_cents(-550).major(), -5);
    /// ```
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn minor_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies money by a quantity.
    ///
    /// ## Example
    /// ```rust
    /// use saffron_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(13000); // 120.00 + 10.00 modifier
    /// assert_eq!(unit_price.multiply_quantity(2).cents(), 26000);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Two-decimal rendering used in API payloads, kitchen tickets and error
/// messages: `430.00`, `-1.50`, `0.00`.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.major().abs(), self.minor_part())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
