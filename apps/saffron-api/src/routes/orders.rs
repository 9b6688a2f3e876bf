//! # Order Endpoints
//!
//! Request bodies are validated into core requests ([`NewOrder`],
//! [`OrderUpdate`]) before any service call, so a malformed body never
//! opens a transaction.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use tracing::info;

use super::ApiJson;
use crate::auth::CurrentStaff;
use crate::dto::{
    parse_optional, parse_status_list, CreateOrderRequest, ItemStatusResponse, OrderItemRequest, OrderListQuery,
    OrderResponse, StatusRequest, UpdateOrderRequest,
};
use crate::error::ApiError;
use crate::AppState;
use saffron_core::{CoreResult, LineRequest, NewOrder, OrderItemStatus, OrderKind, OrderStatus, OrderType, OrderUpdate};
use saffron_db::OrderFilter;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/orders", get(list).post(create))
        .route("/api/orders/active", get(list_active))
        .route("/api/orders/{id}", get(get_by_id).patch(update))
        .route("/api/orders/{id}/cancel", post(cancel))
        .route("/api/order-items/{id}/status", patch(set_item_status))
}

fn to_lines(items: &[OrderItemRequest]) -> CoreResult<Vec<LineRequest>> {
    items.iter().map(OrderItemRequest::to_line).collect()
}

/// GET /api/orders?order_type=dine-in&status=pending,ready
async fn list(
    State(state): State<AppState>,
    _staff: CurrentStaff,
    Query(query): Query<OrderListQuery>,
) -> Result<Json<Vec<OrderResponse>>, ApiError> {
    let filter = OrderFilter {
        order_type: parse_optional(query.order_type.as_deref())?,
        statuses: parse_status_list(query.status.as_deref())?,
    };

    let orders = state.orders.list(&filter).await?;
    Ok(Json(orders.into_iter().map(Into::into).collect()))
}

/// GET /api/orders/active
async fn list_active(State(state): State<AppState>, _staff: CurrentStaff) -> Result<Json<Vec<OrderResponse>>, ApiError> {
    let orders = state.orders.list_active().await?;
    Ok(Json(orders.into_iter().map(Into::into).collect()))
}

/// GET /api/orders/{id}
async fn get_by_id(
    State(state): State<AppState>,
    _staff: CurrentStaff,
    Path(id): Path<String>,
) -> Result<Json<OrderResponse>, ApiError> {
    Ok(Json(state.orders.get(&id).await?.into()))
}

/// POST /api/orders
///
/// ## Errors
/// - 400: missing table for dine-in, missing customer for takeaway, bad lines
/// - 404: table, menu item or modifier does not exist
/// - 422: table occupied, menu item unavailable
async fn create(
    State(state): State<AppState>,
    staff: CurrentStaff,
    ApiJson(body): ApiJson<CreateOrderRequest>,
) -> Result<(StatusCode, Json<OrderResponse>), ApiError> {
    let order_type: OrderType = parse_optional(body.order_type.as_deref())?.unwrap_or_default();
    let kind = OrderKind::resolve(
        order_type,
        body.table_id.as_deref(),
        body.customer_name.as_deref(),
        body.customer_phone.as_deref(),
    )?;
    let new_order = NewOrder::new(kind, staff.staff_ref(), to_lines(&body.order_items)?)?;

    let details = state.orders.create(new_order).await?;

    info!(
        order_id = %details.order.id,
        staff_id = %staff.id,
        total = %details.order.total(),
        "Order placed"
    );
    Ok((StatusCode::CREATED, Json(details.into())))
}

/// PATCH /api/orders/{id} - status change, appended lines, or both
async fn update(
    State(state): State<AppState>,
    staff: CurrentStaff,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<UpdateOrderRequest>,
) -> Result<Json<OrderResponse>, ApiError> {
    let status: Option<OrderStatus> = parse_optional(body.status.as_deref())?;
    let update = OrderUpdate::new(status, to_lines(&body.order_items)?)?;

    let details = state.orders.update(&id, update).await?;

    info!(order_id = %id, staff_id = %staff.id, status = %details.order.status, "Order updated");
    Ok(Json(details.into()))
}

/// POST /api/orders/{id}/cancel
async fn cancel(
    State(state): State<AppState>,
    staff: CurrentStaff,
    Path(id): Path<String>,
) -> Result<Json<OrderResponse>, ApiError> {
    let details = state.orders.cancel(&id).await?;

    info!(order_id = %id, staff_id = %staff.id, "Order cancelled");
    Ok(Json(details.into()))
}

/// PATCH /api/order-items/{id}/status
async fn set_item_status(
    State(state): State<AppState>,
    _staff: CurrentStaff,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<StatusRequest>,
) -> Result<Json<ItemStatusResponse>, ApiError> {
    let status: OrderItemStatus = body.status.parse()?;
    let item = state.orders.update_item_status(&id, status).await?;
    Ok(Json(item.into()))
}
