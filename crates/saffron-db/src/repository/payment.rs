//! # Payment Repository
//!
//! The schema keeps every payment row; the service accepts at most one per
//! order and reads expose the latest.

use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::DbResult;
use saffron_core::Payment;

const PAYMENT_COLUMNS: &str = "id, order_id, payment_method, amount_cents, created_at";

/// Repository for payment reads outside a transaction.
#[derive(Debug, Clone)]
pub struct PaymentRepository {
    pool: SqlitePool,
}

impl PaymentRepository {
    /// Creates a new PaymentRepository.
    pub fn new(pool: SqlitePool) -> Self {
        PaymentRepository { pool }
    }

    /// Gets all payments for an order, oldest first.
    pub async fn list_for_order(&self, order_id: &str) -> DbResult<Vec<Payment>> {
        let payments = sqlx::query_as::<_, Payment>(&format!(
            "SELECT {PAYMENT_COLUMNS} FROM payments WHERE order_id = ?1 ORDER BY created_at, rowid"
        ))
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(payments)
    }

    /// Counts payments recorded against an order.
    pub async fn count_for_order(&self, order_id: &str) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM payments WHERE order_id = ?1")
            .bind(order_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Transaction Steps
// =============================================================================

/// Whether any payment exists for the order.
pub async fn exists_for_order(conn: &mut SqliteConnection, order_id: &str) -> DbResult<bool> {
    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM payments WHERE order_id = ?1)")
        .bind(order_id)
        .fetch_one(&mut *conn)
        .await?;

    Ok(exists)
}

/// Records a payment.
pub async fn insert(conn: &mut SqliteConnection, payment: &Payment) -> DbResult<()> {
    debug!(order_id = %payment.order_id, amount = payment.amount_cents, "Recording payment");

    sqlx::query(
        r#"
        INSERT INTO payments (id, order_id, payment_method, amount_cents, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5)
        "#,
    )
    .bind(&payment.id)
    .bind(&payment.order_id)
    .bind(payment.payment_method)
    .bind(payment.amount_cents)
    .bind(payment.created_at)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

/// Latest payment for the order, if any.
pub async fn latest_for_order(conn: &mut SqliteConnection, order_id: &str) -> DbResult<Option<Payment>> {
    let payment = sqlx::query_as::<_, Payment>(&format!(
        "SELECT {PAYMENT_COLUMNS} FROM payments WHERE order_id = ?1 ORDER BY created_at DESC, rowid DESC LIMIT 1"
    ))
    .bind(order_id)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(payment)
}
