//! # Order Repository
//!
//! Database operations for orders, their lines and the lines' modifiers.
//!
//! ## Order Lifecycle (storage view)
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. CREATE                                                             │
//! │     └── insert_order()   → orders row { status: pending, total: 0 }    │
//! │     └── insert_line()    → order_items + order_item_modifiers rows     │
//! │     └── recompute_total() → SUM(subtotal_cents) into orders.total      │
//! │                                                                         │
//! │  2. UPDATE                                                             │
//! │     └── touch()          → takes the write lock, proves the row exists │
//! │     └── insert_line() / recompute_total() / set_status()               │
//! │                                                                         │
//! │  3. CLOSE                                                              │
//! │     └── set_status(completed) by payment, set_status(cancelled)        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use sqlx::{FromRow, QueryBuilder, Sqlite, SqliteConnection, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use crate::repository::{payment, table};
use saffron_core::{
    Money, Order, OrderDetails, OrderItem, OrderItemModifier, OrderItemStatus, OrderLine, OrderStatus, OrderType,
    PricedLine,
};

const ORDER_COLUMNS: &str = "id, table_id, staff_id, staff_name, order_type, customer_name, customer_phone, \
                             status, total_cents, created_at, updated_at";

const ITEM_COLUMNS: &str = "id, order_id, menu_item_id, name_snapshot, unit_price_cents, modifiers_cents, \
                            quantity, subtotal_cents, notes, status, created_at, updated_at";

/// Filters for [`OrderRepository::list`].
#[derive(Debug, Clone, Default)]
pub struct OrderFilter {
    pub order_type: Option<OrderType>,
    /// Empty means any status.
    pub statuses: Vec<OrderStatus>,
}

/// Repository for order reads outside a transaction.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    /// Creates a new OrderRepository.
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    /// Gets an order with table, lines, modifiers and latest payment.
    pub async fn get_details(&self, id: &str) -> DbResult<Option<OrderDetails>> {
        let mut conn = self.pool.acquire().await?;
        load_details(&mut conn, id).await
    }

    /// Lists orders that are neither completed nor cancelled, newest first.
    pub async fn list_active(&self) -> DbResult<Vec<OrderDetails>> {
        self.list(&OrderFilter {
            order_type: None,
            statuses: OrderStatus::ALL.into_iter().filter(OrderStatus::is_active).collect(),
        })
        .await
    }

    /// Lists orders matching `filter`, newest first, fully loaded.
    pub async fn list(&self, filter: &OrderFilter) -> DbResult<Vec<OrderDetails>> {
        let mut conn = self.pool.acquire().await?;

        let mut query: QueryBuilder<Sqlite> = QueryBuilder::new(format!("SELECT {ORDER_COLUMNS} FROM orders WHERE 1 = 1"));

        if let Some(order_type) = filter.order_type {
            query.push(" AND order_type = ").push_bind(order_type);
        }
        if !filter.statuses.is_empty() {
            query.push(" AND status IN (");
            let mut separated = query.separated(", ");
            for status in &filter.statuses {
                separated.push_bind(*status);
            }
            separated.push_unseparated(")");
        }
        query.push(" ORDER BY created_at DESC");

        let orders = query.build_query_as::<Order>().fetch_all(&mut *conn).await?;

        let mut loaded = Vec::with_capacity(orders.len());
        for order in orders {
            loaded.push(attach_relations(&mut conn, order).await?);
        }

        Ok(loaded)
    }

    /// Gets a single order line.
    pub async fn get_item(&self, id: &str) -> DbResult<Option<OrderItem>> {
        let mut conn = self.pool.acquire().await?;
        fetch_item(&mut conn, id).await
    }

    /// Counts lines on an order.
    pub async fn count_items(&self, order_id: &str) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM order_items WHERE order_id = ?1")
            .bind(order_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Counts all orders.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Transaction Steps
// =============================================================================

/// Inserts an order row.
pub async fn insert_order(conn: &mut SqliteConnection, order: &Order) -> DbResult<()> {
    debug!(id = %order.id, order_type = %order.order_type, "Inserting order");

    sqlx::query(
        r#"
        INSERT INTO orders (
            id, table_id, staff_id, staff_name, order_type,
            customer_name, customer_phone, status, total_cents,
            created_at, updated_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
        "#,
    )
    .bind(&order.id)
    .bind(&order.table_id)
    .bind(&order.staff_id)
    .bind(&order.staff_name)
    .bind(order.order_type)
    .bind(&order.customer_name)
    .bind(&order.customer_phone)
    .bind(order.status)
    .bind(order.total_cents)
    .bind(order.created_at)
    .bind(order.updated_at)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

/// Inserts a priced line and its modifier snapshots.
///
/// ## Snapshot Pattern
/// Menu item name/price and modifier names/deltas are copied onto the line
/// so later menu edits never change an existing order.
pub async fn insert_line(
    conn: &mut SqliteConnection,
    order_id: &str,
    line: &PricedLine,
    now: DateTime<Utc>,
) -> DbResult<OrderItem> {
    let item = OrderItem {
        id: Uuid::new_v4().to_string(),
        order_id: order_id.to_string(),
        menu_item_id: line.menu_item_id.clone(),
        name_snapshot: line.name.clone(),
        unit_price_cents: line.unit_price.cents(),
        modifiers_cents: line.modifiers_total.cents(),
        quantity: line.quantity,
        subtotal_cents: line.subtotal.cents(),
        notes: line.notes.clone(),
        status: OrderItemStatus::Pending,
        created_at: now,
        updated_at: now,
    };

    debug!(order_id = %order_id, menu_item_id = %item.menu_item_id, quantity = item.quantity, "Adding order line");

    sqlx::query(
        r#"
        INSERT INTO order_items (
            id, order_id, menu_item_id, name_snapshot,
            unit_price_cents, modifiers_cents, quantity, subtotal_cents,
            notes, status, created_at, updated_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
        "#,
    )
    .bind(&item.id)
    .bind(&item.order_id)
    .bind(&item.menu_item_id)
    .bind(&item.name_snapshot)
    .bind(item.unit_price_cents)
    .bind(item.modifiers_cents)
    .bind(item.quantity)
    .bind(item.subtotal_cents)
    .bind(&item.notes)
    .bind(item.status)
    .bind(item.created_at)
    .bind(item.updated_at)
    .execute(&mut *conn)
    .await?;

    for modifier in &line.modifiers {
        sqlx::query(
            r#"
            INSERT INTO order_item_modifiers (order_item_id, modifier_id, name_snapshot, price_change_cents)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(&item.id)
        .bind(&modifier.modifier_id)
        .bind(&modifier.name)
        .bind(modifier.price_change.cents())
        .execute(&mut *conn)
        .await?;
    }

    Ok(item)
}

/// Recomputes the order total from every line and stores it.
pub async fn recompute_total(conn: &mut SqliteConnection, order_id: &str, now: DateTime<Utc>) -> DbResult<Money> {
    let subtotals: Vec<i64> = sqlx::query_scalar("SELECT subtotal_cents FROM order_items WHERE order_id = ?1")
        .bind(order_id)
        .fetch_all(&mut *conn)
        .await?;

    let total = saffron_core::order_total(subtotals.into_iter().map(Money::from_cents));

    sqlx::query("UPDATE orders SET total_cents = ?2, updated_at = ?3 WHERE id = ?1")
        .bind(order_id)
        .bind(total.cents())
        .bind(now)
        .execute(&mut *conn)
        .await?;

    Ok(total)
}

/// Bumps `updated_at`. Opening a transaction with this write takes SQLite's
/// write lock before the order is read.
///
/// Returns `false` if the order doesn't exist.
pub async fn touch(conn: &mut SqliteConnection, id: &str, now: DateTime<Utc>) -> DbResult<bool> {
    let result = sqlx::query("UPDATE orders SET updated_at = ?2 WHERE id = ?1")
        .bind(id)
        .bind(now)
        .execute(&mut *conn)
        .await?;

    Ok(result.rows_affected() == 1)
}

/// Fetches an order row on the given connection.
pub async fn fetch(conn: &mut SqliteConnection, id: &str) -> DbResult<Option<Order>> {
    let order = sqlx::query_as::<_, Order>(&format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = ?1"))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

    Ok(order)
}

/// Sets an order's status.
pub async fn set_status(
    conn: &mut SqliteConnection,
    id: &str,
    status: OrderStatus,
    now: DateTime<Utc>,
) -> DbResult<()> {
    let result = sqlx::query("UPDATE orders SET status = ?2, updated_at = ?3 WHERE id = ?1")
        .bind(id)
        .bind(status)
        .bind(now)
        .execute(&mut *conn)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::not_found("Order", id));
    }

    Ok(())
}

/// Fetches a single order line on the given connection.
pub async fn fetch_item(conn: &mut SqliteConnection, id: &str) -> DbResult<Option<OrderItem>> {
    let item = sqlx::query_as::<_, OrderItem>(&format!("SELECT {ITEM_COLUMNS} FROM order_items WHERE id = ?1"))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

    Ok(item)
}

/// Sets a line's kitchen status. Returns `false` if the line doesn't exist.
pub async fn set_item_status(
    conn: &mut SqliteConnection,
    id: &str,
    status: OrderItemStatus,
    now: DateTime<Utc>,
) -> DbResult<bool> {
    let result = sqlx::query("UPDATE order_items SET status = ?2, updated_at = ?3 WHERE id = ?1")
        .bind(id)
        .bind(status)
        .bind(now)
        .execute(&mut *conn)
        .await?;

    Ok(result.rows_affected() == 1)
}

// =============================================================================
// Loading
// =============================================================================

#[derive(FromRow)]
struct LineRow {
    #[sqlx(flatten)]
    item: OrderItem,
    category_name: String,
}

/// Loads an order with all of its relations.
pub async fn load_details(conn: &mut SqliteConnection, id: &str) -> DbResult<Option<OrderDetails>> {
    match fetch(conn, id).await? {
        Some(order) => Ok(Some(attach_relations(conn, order).await?)),
        None => Ok(None),
    }
}

async fn attach_relations(conn: &mut SqliteConnection, order: Order) -> DbResult<OrderDetails> {
    let table = match &order.table_id {
        Some(table_id) => table::fetch(conn, table_id).await?,
        None => None,
    };

    let rows = sqlx::query_as::<_, LineRow>(
        r#"
        SELECT oi.id, oi.order_id, oi.menu_item_id, oi.name_snapshot, oi.unit_price_cents,
               oi.modifiers_cents, oi.quantity, oi.subtotal_cents, oi.notes, oi.status,
               oi.created_at, oi.updated_at,
               COALESCE(c.name, '') AS category_name
        FROM order_items oi
        LEFT JOIN menu_items m ON m.id = oi.menu_item_id
        LEFT JOIN categories c ON c.id = m.category_id
        WHERE oi.order_id = ?1
        ORDER BY oi.created_at, oi.rowid
        "#,
    )
    .bind(&order.id)
    .fetch_all(&mut *conn)
    .await?;

    let mut lines = Vec::with_capacity(rows.len());
    for row in rows {
        let modifiers = sqlx::query_as::<_, OrderItemModifier>(
            r#"
            SELECT order_item_id, modifier_id, name_snapshot, price_change_cents
            FROM order_item_modifiers
            WHERE order_item_id = ?1
            ORDER BY rowid
            "#,
        )
        .bind(&row.item.id)
        .fetch_all(&mut *conn)
        .await?;

        lines.push(OrderLine {
            item: row.item,
            category_name: row.category_name,
            modifiers,
        });
    }

    let payment = payment::latest_for_order(conn, &order.id).await?;

    Ok(OrderDetails {
        order,
        table,
        lines,
        payment,
    })
}
