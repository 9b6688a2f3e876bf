//! # Payment Service
//!
//! Settles an order exactly once.
//!
//! ## Flow
//! ```text
//! amount ≥ 0 ? ──no──► ValidationError
//!      │
//!      ▼
//! BEGIN ── touch order (write lock) ── 0 rows ──► NotFound
//!      │
//!      ▼
//! already paid? ──► OrderAlreadyPaid
//! cancelled?    ──► OrderCancelled
//! amount ≠ total ──► PaymentAmountMismatch { expected, received }
//!      │
//!      ▼
//! INSERT payment, order → completed, table → available
//! COMMIT
//! ```

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::pool::Database;
use crate::repository::{order, payment, table};
use crate::service::order::{load_required, lock_order};
use crate::service::ServiceResult;
use saffron_core::validation::validate_payment_amount;
use saffron_core::{check_payment, Money, OrderDetails, OrderStatus, Payment, PaymentMethod, TableStatus};

/// A recorded payment together with the order it settled.
#[derive(Debug, Clone)]
pub struct PaymentReceipt {
    pub payment: Payment,
    pub order: OrderDetails,
}

/// Payment processing.
#[derive(Debug, Clone)]
pub struct PaymentService {
    db: Database,
}

impl PaymentService {
    pub fn new(db: Database) -> Self {
        PaymentService { db }
    }

    /// Records a payment, completes the order and frees its table.
    ///
    /// ## Errors
    /// Checked in this order: amount format, order missing, already paid,
    /// cancelled, amount mismatch. Nothing is written on any error.
    pub async fn process(&self, order_id: &str, method: PaymentMethod, amount: Money) -> ServiceResult<PaymentReceipt> {
        validate_payment_amount(amount)?;

        let now = Utc::now();
        let mut tx = self.db.pool().begin().await?;

        let current = lock_order(&mut tx, order_id, now).await?;
        let already_paid = payment::exists_for_order(&mut tx, order_id).await?;
        check_payment(&current, already_paid, amount)?;

        let record = Payment {
            id: Uuid::new_v4().to_string(),
            order_id: order_id.to_string(),
            payment_method: method,
            amount_cents: amount.cents(),
            created_at: now,
        };
        payment::insert(&mut tx, &record).await?;

        order::set_status(&mut tx, order_id, OrderStatus::Completed, now).await?;

        if let Some(table_id) = &current.table_id {
            table::set_status(&mut tx, table_id, TableStatus::Available, now).await?;
        }

        let details = load_required(&mut tx, order_id).await?;
        tx.commit().await?;

        info!(
            order_id = %order_id,
            payment_id = %record.id,
            method = %method,
            amount = %amount,
            "Payment processed"
        );

        Ok(PaymentReceipt {
            payment: record,
            order: details,
        })
    }
}
