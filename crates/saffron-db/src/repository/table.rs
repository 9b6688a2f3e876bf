//! # Dining Table Repository
//!
//! ## Occupancy Claim
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Waiter A                          Waiter B                            │
//! │  BEGIN                             BEGIN                               │
//! │  UPDATE dining_tables              UPDATE dining_tables                │
//! │    SET status = 'occupied'           SET status = 'occupied'           │
//! │    WHERE id = 'T05'                  WHERE id = 'T05'                  │
//! │      AND status != 'occupied'          AND status != 'occupied'        │
//! │  → 1 row (holds write lock)        → waits on busy_timeout ...         │
//! │  INSERT order, items ...                                               │
//! │  COMMIT ─────────────────────────► → 0 rows → TableOccupied            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use saffron_core::{DiningTable, Order, TableOverview, TableStatus};

const TABLE_COLUMNS: &str = "id, table_number, status, created_at, updated_at";

/// Repository for dining table operations.
#[derive(Debug, Clone)]
pub struct TableRepository {
    pool: SqlitePool,
}

impl TableRepository {
    /// Creates a new TableRepository.
    pub fn new(pool: SqlitePool) -> Self {
        TableRepository { pool }
    }

    /// Gets a table by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<DiningTable>> {
        let mut conn = self.pool.acquire().await?;
        fetch(&mut conn, id).await
    }

    /// Lists every table by number, each with the orders still open on it.
    pub async fn list_overview(&self) -> DbResult<Vec<TableOverview>> {
        let mut conn = self.pool.acquire().await?;

        let tables = sqlx::query_as::<_, DiningTable>(&format!(
            "SELECT {TABLE_COLUMNS} FROM dining_tables ORDER BY table_number"
        ))
        .fetch_all(&mut *conn)
        .await?;

        let mut overview = Vec::with_capacity(tables.len());
        for table in tables {
            let active_orders = sqlx::query_as::<_, Order>(
                r#"
                SELECT id, table_id, staff_id, staff_name, order_type, customer_name, customer_phone,
                       status, total_cents, created_at, updated_at
                FROM orders
                WHERE table_id = ?1 AND status NOT IN ('completed', 'cancelled')
                ORDER BY created_at DESC
                "#,
            )
            .bind(&table.id)
            .fetch_all(&mut *conn)
            .await?;

            overview.push(TableOverview { table, active_orders });
        }

        Ok(overview)
    }

    /// Creates a table.
    ///
    /// ## Errors
    /// `UniqueViolation` when the number is already taken.
    pub async fn insert(&self, table_number: &str, status: TableStatus) -> DbResult<DiningTable> {
        let now = Utc::now();
        let table = DiningTable {
            id: Uuid::new_v4().to_string(),
            table_number: table_number.to_string(),
            status,
            created_at: now,
            updated_at: now,
        };

        debug!(id = %table.id, table_number = %table.table_number, "Inserting table");

        sqlx::query(
            "INSERT INTO dining_tables (id, table_number, status, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(&table.id)
        .bind(&table.table_number)
        .bind(table.status)
        .bind(table.created_at)
        .bind(table.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { field, .. } => DbError::UniqueViolation {
                field,
                value: table_number.to_string(),
            },
            other => other,
        })?;

        Ok(table)
    }

    /// Sets a table's status by hand (e.g. `reserved`).
    pub async fn set_status(&self, id: &str, status: TableStatus) -> DbResult<DiningTable> {
        let mut conn = self.pool.acquire().await?;

        if !set_status(&mut conn, id, status, Utc::now()).await? {
            return Err(DbError::not_found("Table", id));
        }

        fetch(&mut conn, id).await?.ok_or_else(|| DbError::not_found("Table", id))
    }

    /// Counts tables. The seed tool uses it to stay idempotent.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM dining_tables")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Transaction Steps
// =============================================================================

/// Fetches a table on the given connection.
pub async fn fetch(conn: &mut SqliteConnection, id: &str) -> DbResult<Option<DiningTable>> {
    let table = sqlx::query_as::<_, DiningTable>(&format!(
        "SELECT {TABLE_COLUMNS} FROM dining_tables WHERE id = ?1"
    ))
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(table)
}

/// Bumps `updated_at` to take the write lock. Returns `false` if the table
/// doesn't exist.
pub async fn touch(conn: &mut SqliteConnection, id: &str, now: DateTime<Utc>) -> DbResult<bool> {
    let result = sqlx::query("UPDATE dining_tables SET updated_at = ?2 WHERE id = ?1")
        .bind(id)
        .bind(now)
        .execute(&mut *conn)
        .await?;

    Ok(result.rows_affected() == 1)
}

/// Marks a table occupied unless it already is.
///
/// Returns `false` when no row changed: the table is missing or occupied.
pub async fn claim(conn: &mut SqliteConnection, id: &str, now: DateTime<Utc>) -> DbResult<bool> {
    let result = sqlx::query(
        r#"
        UPDATE dining_tables
        SET status = 'occupied', updated_at = ?2
        WHERE id = ?1 AND status != 'occupied'
        "#,
    )
    .bind(id)
    .bind(now)
    .execute(&mut *conn)
    .await?;

    Ok(result.rows_affected() == 1)
}

/// Frees a table if it is occupied. A reserved table stays reserved.
pub async fn release(conn: &mut SqliteConnection, id: &str, now: DateTime<Utc>) -> DbResult<bool> {
    let result = sqlx::query(
        r#"
        UPDATE dining_tables
        SET status = 'available', updated_at = ?2
        WHERE id = ?1 AND status = 'occupied'
        "#,
    )
    .bind(id)
    .bind(now)
    .execute(&mut *conn)
    .await?;

    Ok(result.rows_affected() == 1)
}

/// Sets a table's status unconditionally. Returns `false` if it doesn't exist.
pub async fn set_status(
    conn: &mut SqliteConnection,
    id: &str,
    status: TableStatus,
    now: DateTime<Utc>,
) -> DbResult<bool> {
    let result = sqlx::query("UPDATE dining_tables SET status = ?2, updated_at = ?3 WHERE id = ?1")
        .bind(id)
        .bind(status)
        .bind(now)
        .execute(&mut *conn)
        .await?;

    Ok(result.rows_affected() == 1)
}

/// Counts orders on the table that are neither completed nor cancelled.
pub async fn count_active_orders(conn: &mut SqliteConnection, id: &str) -> DbResult<i64> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM orders WHERE table_id = ?1 AND status NOT IN ('completed', 'cancelled')",
    )
    .bind(id)
    .fetch_one(&mut *conn)
    .await?;

    Ok(count)
}

/// Deletes a table row. Returns `false` if it doesn't exist.
pub async fn delete(conn: &mut SqliteConnection, id: &str) -> DbResult<bool> {
    let result = sqlx::query("DELETE FROM dining_tables WHERE id = ?1")
        .bind(id)
        .execute(&mut *conn)
        .await?;

    Ok(result.rows_affected() == 1)
}
