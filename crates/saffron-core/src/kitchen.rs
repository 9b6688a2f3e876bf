//! # Kitchen Notification Boundary
//!
//! The ticket the kitchen display receives when an order is placed, and the
//! narrow trait used to deliver it.
//!
//! ```text
//! OrderService::create ──commit──► KitchenTicket::from_details(&details)
//!                                        │
//!                                        ▼
//!                 publisher.publish("kitchen-channel", "order.placed", json)
//!                                        │
//!                              Err(_) ──► warn!, order still created
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;

use crate::types::{OrderDetails, OrderStatus, OrderType};

/// Channel kitchen displays subscribe to.
pub const KITCHEN_CHANNEL: &str = "kitchen-channel";

/// Event name for a newly created order.
pub const ORDER_PLACED_EVENT: &str = "order.placed";

// =============================================================================
// Ticket
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TicketTable {
    pub id: String,
    pub number: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TicketWaiter {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TicketMenuItem {
    pub id: String,
    pub name: String,
    pub category: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TicketModifier {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TicketItem {
    pub id: String,
    pub menu_item: TicketMenuItem,
    pub quantity: i64,
    pub notes: Option<String>,
    pub modifiers: Vec<TicketModifier>,
}

/// Snapshot of a freshly created order, shaped for the kitchen display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct KitchenTicket {
    pub order_id: String,
    pub order_type: OrderType,
    pub table: Option<TicketTable>,
    pub customer_name: Option<String>,
    pub waiter: TicketWaiter,
    pub status: OrderStatus,
    /// Two-decimal string ("430.00").
    pub total_amount: String,
    pub items: Vec<TicketItem>,
    /// RFC 3339.
    pub created_at: String,
}

impl KitchenTicket {
    pub fn from_details(details: &OrderDetails) -> Self {
        let order = &details.order;

        Self {
            order_id: order.id.clone(),
            order_type: order.order_type,
            table: details.table.as_ref().map(|t| TicketTable {
                id: t.id.clone(),
                number: t.table_number.clone(),
            }),
            customer_name: order.customer_name.clone(),
            waiter: TicketWaiter {
                id: order.staff_id.clone(),
                name: order.staff_name.clone(),
            },
            status: order.status,
            total_amount: order.total().to_string(),
            items: details
                .lines
                .iter()
                .map(|line| TicketItem {
                    id: line.item.id.clone(),
                    menu_item: TicketMenuItem {
                        id: line.item.menu_item_id.clone(),
                        name: line.item.name_snapshot.clone(),
                        category: line.category_name.clone(),
                    },
                    quantity: line.item.quantity,
                    notes: line.item.notes.clone(),
                    modifiers: line
                        .modifiers
                        .iter()
                        .map(|m| TicketModifier {
                            id: m.modifier_id.clone(),
                            name: m.name_snapshot.clone(),
                        })
                        .collect(),
                })
                .collect(),
            created_at: order.created_at.to_rfc3339(),
        }
    }
}

// =============================================================================
// Publisher
// =============================================================================

#[derive(Debug, Error)]
pub enum PublishError {
    /// Nobody is listening. Not a failure for the order, just nothing to do.
    #[error("no subscribers on channel '{channel}'")]
    NoSubscribers { channel: String },

    #[error("publisher unavailable: {0}")]
    Unavailable(String),
}

/// Outbound notification boundary.
///
/// Implementations must not block: the call happens on the request path,
/// right after the transaction commits. Delivery is at most once.
pub trait KitchenPublisher: Send + Sync {
    fn publish(&self, channel: &str, event: &str, payload: serde_json::Value) -> Result<(), PublishError>;
}

/// Publisher that drops everything. Used when no kitchen feed is wired up.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopPublisher;

impl KitchenPublisher for NoopPublisher {
    fn publish(&self, _channel: &str, _event: &str, _payload: serde_json::Value) -> Result<(), PublishError> {
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{
        DiningTable, Order, OrderItem, OrderItemModifier, OrderItemStatus, OrderLine, TableStatus,
    };
    use chrono::{TimeZone, Utc};

    fn details() -> OrderDetails {
        let at = Utc.with_ymd_and_hms(2026, 3, 1, 18, 30, 0).unwrap();
        OrderDetails {
            order: Order {
                id: "o-1".to_string(),
                table_id: Some("t-5".to_string()),
                staff_id: "s-1".to_string(),
                staff_name: "Malee".to_string(),
                order_type: OrderType::DineIn,
                customer_name: None,
                customer_phone: None,
                status: OrderStatus::Pending,
                total_cents: 26000,
                created_at: at,
                updated_at: at,
            },
            table: Some(DiningTable {
                id: "t-5".to_string(),
                table_number: "T05".to_string(),
                status: TableStatus::Occupied,
                created_at: at,
                updated_at: at,
            }),
            lines: vec![OrderLine {
                item: OrderItem {
                    id: "oi-1".to_string(),
                    order_id: "o-1".to_string(),
                    menu_item_id: "mi-1".to_string(),
                    name_snapshot: "Pad Thai".to_string(),
                    unit_price_cents: 12000,
                    modifiers_cents: 1000,
                    quantity: 2,
                    subtotal_cents: 26000,
                    notes: Some("no peanuts".to_string()),
                    status: OrderItemStatus::Pending,
                    created_at: at,
                    updated_at: at,
                },
                category_name: "Main Courses".to_string(),
                modifiers: vec![OrderItemModifier {
                    order_item_id: "oi-1".to_string(),
                    modifier_id: "m-1".to_string(),
                    name_snapshot: "Extra Spicy".to_string(),
                    price_change_cents: 1000,
                }],
            }],
            payment: None,
        }
    }

    #[test]
    fn test_ticket_payload_shape() {
        let ticket = KitchenTicket::from_details(&details());
        let json = serde_json::to_value(&ticket).unwrap();

        assert_eq!(json["order_type"], "dine-in");
        assert_eq!(json["table"]["number"], "T05");
        assert_eq!(json["waiter"]["name"], "Malee");
        assert_eq!(json["status"], "pending");
        assert_eq!(json["total_amount"], "260.00");
        assert_eq!(json["items"][0]["menu_item"]["category"], "Main Courses");
        assert_eq!(json["items"][0]["modifiers"][0]["name"], "Extra Spicy");
        assert_eq!(json["created_at"], "2026-03-01T18:30:00+00:00");
    }

    #[test]
    fn test_takeaway_ticket_has_no_table() {
        let mut details = details();
        details.table = None;
        details.order.table_id = None;
        details.order.order_type = OrderType::Takeaway;
        details.order.customer_name = Some("Somchai".to_string());

        let json = serde_json::to_value(KitchenTicket::from_details(&details)).unwrap();
        assert!(json["table"].is_null());
        assert_eq!(json["customer_name"], "Somchai");
    }

    #[test]
    fn test_noop_publisher_accepts() {
        let publisher: &dyn KitchenPublisher = &NoopPublisher;
        assert!(publisher.publish(KITCHEN_CHANNEL, ORDER_PLACED_EVENT, serde_json::json!({})).is_ok());
    }
}
