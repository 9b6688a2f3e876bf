//! # Request / Response Bodies
//!
//! Wire shapes for the HTTP API. Money leaves the server as a two-decimal
//! string (`"430.00"`) and enters it as a string or a JSON number, both
//! parsed exactly.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use saffron_core::{
    Category, CoreResult, DiningTable, LineRequest, MenuItem, MenuItemDetails, Modifier, Money, Order, OrderDetails, OrderItem,
    OrderItemStatus, OrderLine, OrderStatus, OrderType, Payment, PaymentMethod, TableOverview, TableStatus,
    ValidationError,
};

// =============================================================================
// Requests
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct OrderItemRequest {
    pub menu_item_id: String,
    pub quantity: i64,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub modifier_ids: Vec<String>,
    /// Accepted for client compatibility; lines are always appended.
    #[serde(default)]
    #[allow(dead_code)]
    pub order_item_id: Option<String>,
}

impl OrderItemRequest {
    pub fn to_line(&self) -> CoreResult<LineRequest> {
        LineRequest::new(
            &self.menu_item_id,
            self.quantity,
            self.notes.as_deref(),
            self.modifier_ids.iter().cloned(),
        )
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    /// Absent or null means dine-in.
    #[serde(default)]
    pub order_type: Option<String>,
    #[serde(default)]
    pub table_id: Option<String>,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub customer_phone: Option<String>,
    #[serde(default)]
    pub order_items: Vec<OrderItemRequest>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateOrderRequest {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub order_items: Vec<OrderItemRequest>,
}

#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateTableRequest {
    pub table_number: String,
    #[serde(default)]
    pub status: Option<String>,
}

/// A payment amount as sent by the till: `"380.00"` or `380`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum AmountInput {
    Text(String),
    Number(serde_json::Number),
}

impl AmountInput {
    pub fn to_money(&self) -> Result<Money, ValidationError> {
        match self {
            AmountInput::Text(text) => Money::parse_decimal("amount", text),
            AmountInput::Number(number) => Money::parse_decimal("amount", &number.to_string()),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreatePaymentRequest {
    pub order_id: String,
    pub payment_method: String,
    pub amount: AmountInput,
}

#[derive(Debug, Default, Deserialize)]
pub struct MenuItemQuery {
    pub category_id: Option<String>,
    #[serde(default)]
    pub available: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
pub struct OrderListQuery {
    pub order_type: Option<String>,
    /// Comma-separated statuses.
    pub status: Option<String>,
}

/// Parses a `status=pending,confirmed` filter. Blank entries are skipped.
pub fn parse_status_list(raw: Option<&str>) -> Result<Vec<OrderStatus>, ValidationError> {
    raw.unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::parse)
        .collect()
}

pub fn parse_optional<T>(raw: Option<&str>) -> Result<Option<T>, ValidationError>
where
    T: std::str::FromStr<Err = ValidationError>,
{
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::parse)
        .transpose()
}

// =============================================================================
// Catalog Responses
// =============================================================================

#[derive(Debug, Serialize)]
pub struct CategoryResponse {
    pub id: String,
    pub name: String,
}

impl From<Category> for CategoryResponse {
    fn from(c: Category) -> Self {
        CategoryResponse { id: c.id, name: c.name }
    }
}

#[derive(Debug, Serialize)]
pub struct ModifierResponse {
    pub id: String,
    pub name: String,
    pub price_change: String,
}

impl From<Modifier> for ModifierResponse {
    fn from(m: Modifier) -> Self {
        ModifierResponse {
            price_change: m.price_change().to_string(),
            id: m.id,
            name: m.name,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MenuItemResponse {
    pub id: String,
    pub category_id: String,
    pub name: String,
    pub description: Option<String>,
    pub price: String,
    pub is_available: bool,
}

impl From<MenuItem> for MenuItemResponse {
    fn from(item: MenuItem) -> Self {
        MenuItemResponse {
            price: item.price().to_string(),
            id: item.id,
            category_id: item.category_id,
            name: item.name,
            description: item.description,
            is_available: item.is_available,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MenuItemDetailsResponse {
    #[serde(flatten)]
    pub item: MenuItemResponse,
    pub category_name: String,
    pub modifiers: Vec<ModifierResponse>,
}

impl From<MenuItemDetails> for MenuItemDetailsResponse {
    fn from(details: MenuItemDetails) -> Self {
        MenuItemDetailsResponse {
            item: details.item.into(),
            category_name: details.category_name,
            modifiers: details.modifiers.into_iter().map(Into::into).collect(),
        }
    }
}

// =============================================================================
// Table Responses
// =============================================================================

#[derive(Debug, Serialize)]
pub struct TableResponse {
    pub id: String,
    pub table_number: String,
    pub status: TableStatus,
}

impl From<DiningTable> for TableResponse {
    fn from(t: DiningTable) -> Self {
        TableResponse {
            id: t.id,
            table_number: t.table_number,
            status: t.status,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct OrderSummary {
    pub id: String,
    pub order_type: OrderType,
    pub status: OrderStatus,
    pub total_amount: String,
    pub created_at: DateTime<Utc>,
}

impl From<Order> for OrderSummary {
    fn from(o: Order) -> Self {
        OrderSummary {
            total_amount: o.total().to_string(),
            id: o.id,
            order_type: o.order_type,
            status: o.status,
            created_at: o.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TableOverviewResponse {
    #[serde(flatten)]
    pub table: TableResponse,
    pub active_orders: Vec<OrderSummary>,
}

impl From<TableOverview> for TableOverviewResponse {
    fn from(overview: TableOverview) -> Self {
        TableOverviewResponse {
            table: overview.table.into(),
            active_orders: overview.active_orders.into_iter().map(Into::into).collect(),
        }
    }
}

// =============================================================================
// Order Responses
// =============================================================================

#[derive(Debug, Serialize)]
pub struct StaffResponse {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct LineModifierResponse {
    pub id: String,
    pub name: String,
    pub price_change: String,
}

#[derive(Debug, Serialize)]
pub struct OrderItemResponse {
    pub id: String,
    pub menu_item_id: String,
    pub name: String,
    pub category: String,
    pub unit_price: String,
    pub modifiers_total: String,
    pub quantity: i64,
    pub subtotal: String,
    pub notes: Option<String>,
    pub status: OrderItemStatus,
    pub modifiers: Vec<LineModifierResponse>,
}

impl From<OrderLine> for OrderItemResponse {
    fn from(line: OrderLine) -> Self {
        let OrderLine {
            item,
            category_name,
            modifiers,
        } = line;

        OrderItemResponse {
            unit_price: Money::from_cents(item.unit_price_cents).to_string(),
            modifiers_total: Money::from_cents(item.modifiers_cents).to_string(),
            subtotal: item.subtotal().to_string(),
            id: item.id,
            menu_item_id: item.menu_item_id,
            name: item.name_snapshot,
            category: category_name,
            quantity: item.quantity,
            notes: item.notes,
            status: item.status,
            modifiers: modifiers
                .into_iter()
                .map(|m| LineModifierResponse {
                    price_change: Money::from_cents(m.price_change_cents).to_string(),
                    id: m.modifier_id,
                    name: m.name_snapshot,
                })
                .collect(),
        }
    }
}

/// Kitchen status change result.
#[derive(Debug, Serialize)]
pub struct ItemStatusResponse {
    pub id: String,
    pub order_id: String,
    pub status: OrderItemStatus,
}

impl From<OrderItem> for ItemStatusResponse {
    fn from(item: OrderItem) -> Self {
        ItemStatusResponse {
            id: item.id,
            order_id: item.order_id,
            status: item.status,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PaymentResponse {
    pub id: String,
    pub order_id: String,
    pub payment_method: PaymentMethod,
    pub amount: String,
    pub created_at: DateTime<Utc>,
}

impl From<Payment> for PaymentResponse {
    fn from(p: Payment) -> Self {
        PaymentResponse {
            amount: p.amount().to_string(),
            id: p.id,
            order_id: p.order_id,
            payment_method: p.payment_method,
            created_at: p.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct OrderResponse {
    pub id: String,
    pub order_type: OrderType,
    pub status: OrderStatus,
    pub table: Option<TableResponse>,
    pub staff: StaffResponse,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub total_amount: String,
    pub items: Vec<OrderItemResponse>,
    pub payment: Option<PaymentResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<OrderDetails> for OrderResponse {
    fn from(details: OrderDetails) -> Self {
        let OrderDetails {
            order,
            table,
            lines,
            payment,
        } = details;

        OrderResponse {
            total_amount: order.total().to_string(),
            id: order.id,
            order_type: order.order_type,
            status: order.status,
            table: table.map(Into::into),
            staff: StaffResponse {
                id: order.staff_id,
                name: order.staff_name,
            },
            customer_name: order.customer_name,
            customer_phone: order.customer_phone,
            items: lines.into_iter().map(Into::into).collect(),
            payment: payment.map(Into::into),
            created_at: order.created_at,
            updated_at: order.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PaymentReceiptResponse {
    pub payment: PaymentResponse,
    pub order: OrderResponse,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amount_accepts_string_or_number() {
        let body: CreatePaymentRequest =
            serde_json::from_str(r#"{"order_id":"o-1","payment_method":"Cash","amount":"380.00"}"#).unwrap();
        assert_eq!(body.amount.to_money().unwrap(), Money::from_cents(38_000));

        let body: CreatePaymentRequest =
            serde_json::from_str(r#"{"order_id":"o-1","payment_method":"Cash","amount":380}"#).unwrap();
        assert_eq!(body.amount.to_money().unwrap(), Money::from_cents(38_000));

        let body: CreatePaymentRequest =
            serde_json::from_str(r#"{"order_id":"o-1","payment_method":"Cash","amount":379.5}"#).unwrap();
        assert_eq!(body.amount.to_money().unwrap(), Money::from_cents(37_950));
    }

    #[test]
    fn test_amount_rejects_three_decimals() {
        let amount = AmountInput::Text("380.001".to_string());
        assert!(amount.to_money().is_err());

        let amount: AmountInput = serde_json::from_str("0.30000000000000004").unwrap();
        assert!(amount.to_money().is_err());
    }

    #[test]
    fn test_order_type_may_be_absent_or_null() {
        let body: CreateOrderRequest = serde_json::from_str(r#"{"table_id":"t-5","order_items":[]}"#).unwrap();
        assert_eq!(body.order_type, None);

        let body: CreateOrderRequest = serde_json::from_str(r#"{"order_type":null,"table_id":"t-5"}"#).unwrap();
        let order_type: OrderType = parse_optional(body.order_type.as_deref()).unwrap().unwrap_or_default();
        assert_eq!(order_type, OrderType::DineIn);
    }

    #[test]
    fn test_status_list() {
        let statuses = parse_status_list(Some("pending, ready,")).unwrap();
        assert_eq!(statuses, vec![OrderStatus::Pending, OrderStatus::Ready]);
        assert!(parse_status_list(None).unwrap().is_empty());
        assert!(parse_status_list(Some("pending,eaten")).is_err());
    }

    #[test]
    fn test_parse_optional() {
        let t: Option<OrderType> = parse_optional(Some("dine-in")).unwrap();
        assert_eq!(t, Some(OrderType::DineIn));
        let t: Option<OrderType> = parse_optional(Some("  ")).unwrap();
        assert_eq!(t, None);
        assert!(parse_optional::<OrderType>(Some("delivery")).is_err());
    }
}
