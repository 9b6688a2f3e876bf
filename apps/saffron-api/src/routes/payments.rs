//! Payment endpoint.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use tracing::info;

use super::ApiJson;
use crate::auth::CurrentStaff;
use crate::dto::{CreatePaymentRequest, PaymentReceiptResponse};
use crate::error::ApiError;
use crate::AppState;
use saffron_core::PaymentMethod;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/payments", post(create))
}

/// POST /api/payments
///
/// The amount must equal the order total exactly. On success the order is
/// completed and its table released in the same transaction.
///
/// ## Errors
/// - 400: unknown payment method, malformed or negative amount
/// - 404: order does not exist
/// - 422: amount mismatch (with `details`), order cancelled, already paid
async fn create(
    State(state): State<AppState>,
    staff: CurrentStaff,
    ApiJson(body): ApiJson<CreatePaymentRequest>,
) -> Result<(StatusCode, Json<PaymentReceiptResponse>), ApiError> {
    let method: PaymentMethod = body.payment_method.parse()?;
    let amount = body.amount.to_money()?;

    let receipt = state.payments.process(&body.order_id, method, amount).await?;

    info!(
        order_id = %body.order_id,
        payment_id = %receipt.payment.id,
        method = %method,
        amount = %amount,
        staff_id = %staff.id,
        "Payment recorded"
    );

    let response = PaymentReceiptResponse {
        payment: receipt.payment.into(),
        order: receipt.order.into(),
    };
    Ok((StatusCode::CREATED, Json(response)))
}
