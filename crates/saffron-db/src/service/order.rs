//! # Order Lifecycle Service
//!
//! Create, update and cancel orders atomically, then tell the kitchen.
//!
//! ## Create Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  NewOrder (shape already validated)                                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  BEGIN                                                                 │
//! │  ├── dine-in:  claim table (conditional UPDATE)                        │
//! │  │             0 rows → NotFound / TableOccupied                       │
//! │  ├── INSERT order (pending, total 0)                                   │
//! │  ├── per line: menu item exists + available, modifiers exist,          │
//! │  │             price, INSERT line + modifier snapshots                 │
//! │  ├── recompute total from all lines                                    │
//! │  └── load details                                                      │
//! │  COMMIT                                                                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  publish("kitchen-channel", "order.placed", ticket)  ── best effort    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use chrono::Utc;
use sqlx::SqliteConnection;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::DbError;
use crate::pool::Database;
use crate::repository::order::OrderFilter;
use crate::repository::{catalog, order, table};
use crate::service::{ServiceError, ServiceResult};
use saffron_core::{
    CoreError, KitchenPublisher, KitchenTicket, LineRequest, NewOrder, Order, OrderDetails, OrderItem,
    OrderItemStatus, OrderStatus, OrderUpdate, PricedLine, PublishError, KITCHEN_CHANNEL, ORDER_PLACED_EVENT,
};

/// Order lifecycle operations.
#[derive(Clone)]
pub struct OrderService {
    db: Database,
    publisher: Arc<dyn KitchenPublisher>,
}

impl OrderService {
    pub fn new(db: Database, publisher: Arc<dyn KitchenPublisher>) -> Self {
        OrderService { db, publisher }
    }

    // =========================================================================
    // Create
    // =========================================================================

    /// Creates an order with its lines in one transaction.
    ///
    /// ## Errors
    /// - `NotFound`: table, menu item or modifier missing
    /// - `TableOccupied`: the dine-in table is already occupied
    /// - `MenuItemUnavailable`: a line's item is switched off
    ///
    /// Nothing is written when any of these occur.
    pub async fn create(&self, new_order: NewOrder) -> ServiceResult<OrderDetails> {
        let now = Utc::now();
        let order_id = Uuid::new_v4().to_string();
        let mut tx = self.db.pool().begin().await?;

        if let Some(table_id) = new_order.kind.table_id() {
            if !table::claim(&mut tx, table_id, now).await? {
                return Err(match table::fetch(&mut tx, table_id).await? {
                    Some(existing) => CoreError::TableOccupied {
                        table_number: existing.table_number,
                    }
                    .into(),
                    None => DbError::not_found("Table", table_id).into(),
                });
            }
        }

        let customer = new_order.kind.customer();
        let order_row = Order {
            id: order_id.clone(),
            table_id: new_order.kind.table_id().map(str::to_string),
            staff_id: new_order.staff.id.clone(),
            staff_name: new_order.staff.name.clone(),
            order_type: new_order.kind.order_type(),
            customer_name: customer.map(|c| c.name.clone()),
            customer_phone: customer.and_then(|c| c.phone.clone()),
            status: OrderStatus::Pending,
            total_cents: 0,
            created_at: now,
            updated_at: now,
        };
        order::insert_order(&mut tx, &order_row).await?;

        for line in &new_order.lines {
            let priced = price_line(&mut tx, line).await?;
            order::insert_line(&mut tx, &order_id, &priced, now).await?;
        }

        let total = order::recompute_total(&mut tx, &order_id, now).await?;
        let details = load_required(&mut tx, &order_id).await?;

        tx.commit().await?;

        info!(
            order_id = %order_id,
            order_type = %order_row.order_type,
            table_id = ?order_row.table_id,
            lines = new_order.lines.len(),
            total = %total,
            "Order created"
        );

        self.notify_kitchen(&details);

        Ok(details)
    }

    // =========================================================================
    // Update
    // =========================================================================

    /// Appends lines and/or changes status on a non-terminal order.
    ///
    /// The total is recomputed from every line. No kitchen notification.
    pub async fn update(&self, order_id: &str, update: OrderUpdate) -> ServiceResult<OrderDetails> {
        let now = Utc::now();
        let mut tx = self.db.pool().begin().await?;

        let current = lock_order(&mut tx, order_id, now).await?;
        current.status.ensure_modifiable(order_id)?;

        if let Some(status) = update.status {
            current.status.transition_for_update(status)?;
        }

        for line in &update.lines {
            let priced = price_line(&mut tx, line).await?;
            order::insert_line(&mut tx, order_id, &priced, now).await?;
        }

        if !update.lines.is_empty() {
            order::recompute_total(&mut tx, order_id, now).await?;
        }

        if let Some(status) = update.status.filter(|s| *s != current.status) {
            order::set_status(&mut tx, order_id, status, now).await?;
        }

        let details = load_required(&mut tx, order_id).await?;
        tx.commit().await?;

        info!(
            order_id = %order_id,
            added_lines = update.lines.len(),
            status = %details.order.status,
            total = %details.order.total(),
            "Order updated"
        );

        Ok(details)
    }

    // =========================================================================
    // Cancel
    // =========================================================================

    /// Cancels a non-terminal order and frees its table if occupied.
    pub async fn cancel(&self, order_id: &str) -> ServiceResult<OrderDetails> {
        let now = Utc::now();
        let mut tx = self.db.pool().begin().await?;

        let current = lock_order(&mut tx, order_id, now).await?;
        current.status.ensure_modifiable(order_id)?;

        order::set_status(&mut tx, order_id, OrderStatus::Cancelled, now).await?;

        let mut released = false;
        if let Some(table_id) = &current.table_id {
            released = table::release(&mut tx, table_id, now).await?;
        }

        let details = load_required(&mut tx, order_id).await?;
        tx.commit().await?;

        info!(order_id = %order_id, table_released = released, "Order cancelled");

        Ok(details)
    }

    // =========================================================================
    // Kitchen Item Status
    // =========================================================================

    /// Sets a line's kitchen status. Any of the three values may be set.
    pub async fn update_item_status(&self, item_id: &str, status: OrderItemStatus) -> ServiceResult<OrderItem> {
        let now = Utc::now();
        let mut tx = self.db.pool().begin().await?;

        if !order::set_item_status(&mut tx, item_id, status, now).await? {
            return Err(DbError::not_found("Order item", item_id).into());
        }

        let item = order::fetch_item(&mut tx, item_id)
            .await?
            .ok_or_else(|| DbError::not_found("Order item", item_id))?;

        let parent = order::fetch(&mut tx, &item.order_id)
            .await?
            .ok_or_else(|| DbError::not_found("Order", item.order_id.as_str()))?;
        parent.status.ensure_modifiable(&parent.id)?;

        tx.commit().await?;

        debug!(item_id = %item_id, order_id = %item.order_id, status = %status, "Order item status changed");

        Ok(item)
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Gets an order with all relations.
    pub async fn get(&self, order_id: &str) -> ServiceResult<OrderDetails> {
        self.db
            .orders()
            .get_details(order_id)
            .await?
            .ok_or_else(|| DbError::not_found("Order", order_id).into())
    }

    /// Orders that are neither completed nor cancelled, newest first.
    pub async fn list_active(&self) -> ServiceResult<Vec<OrderDetails>> {
        Ok(self.db.orders().list_active().await?)
    }

    /// Orders matching the filter, newest first.
    pub async fn list(&self, filter: &OrderFilter) -> ServiceResult<Vec<OrderDetails>> {
        Ok(self.db.orders().list(filter).await?)
    }

    // =========================================================================
    // Notification
    // =========================================================================

    /// Publishes the kitchen ticket. Never fails the caller.
    fn notify_kitchen(&self, details: &OrderDetails) {
        let order_id = &details.order.id;
        let ticket = KitchenTicket::from_details(details);

        let payload = match serde_json::to_value(&ticket) {
            Ok(payload) => payload,
            Err(e) => {
                warn!(order_id = %order_id, error = %e, "Failed to encode kitchen ticket");
                return;
            }
        };

        match self.publisher.publish(KITCHEN_CHANNEL, ORDER_PLACED_EVENT, payload) {
            Ok(()) => debug!(order_id = %order_id, "Kitchen notified"),
            Err(PublishError::NoSubscribers { .. }) => {
                debug!(order_id = %order_id, "No kitchen display connected")
            }
            Err(e) => warn!(order_id = %order_id, error = %e, "Kitchen notification failed"),
        }
    }
}

impl std::fmt::Debug for OrderService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderService").field("db", &self.db).finish_non_exhaustive()
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// Takes the write lock by touching the order row, then reads it.
pub(crate) async fn lock_order(
    conn: &mut SqliteConnection,
    order_id: &str,
    now: chrono::DateTime<Utc>,
) -> ServiceResult<Order> {
    if !order::touch(conn, order_id, now).await? {
        return Err(DbError::not_found("Order", order_id).into());
    }

    order::fetch(conn, order_id)
        .await?
        .ok_or_else(|| DbError::not_found("Order", order_id).into())
}

pub(crate) async fn load_required(conn: &mut SqliteConnection, order_id: &str) -> ServiceResult<OrderDetails> {
    order::load_details(conn, order_id)
        .await?
        .ok_or_else(|| DbError::not_found("Order", order_id).into())
}

async fn price_line(conn: &mut SqliteConnection, line: &LineRequest) -> ServiceResult<PricedLine> {
    let menu_item = catalog::fetch_menu_item(conn, &line.menu_item_id)
        .await?
        .ok_or_else(|| DbError::not_found("Menu item", line.menu_item_id.as_str()))?;

    let modifiers = catalog::fetch_modifiers(conn, &line.modifier_ids).await?;

    PricedLine::price(&menu_item, &modifiers, line).map_err(ServiceError::from)
}
