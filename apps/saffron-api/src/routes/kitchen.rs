//! # Kitchen Display Feed
//!
//! `GET /ws/kitchen?token=<jwt>` upgrades to a WebSocket subscribed to the
//! kitchen channel. Browsers cannot set headers on a WebSocket handshake, so
//! the token rides in the query string; an `Authorization` header is
//! accepted as well.
//!
//! ```text
//! token? ── no ──► 401
//!   │
//! verify ── bad ──► 401
//!   │
//! role ∈ {admin, manager}? ── no ──► 403
//!   │
//! upgrade? ── no ──► 400
//!   │
//! KitchenHub::attach(socket, "kitchen-channel", subscriber)
//! ```

use axum::extract::ws::rejection::WebSocketUpgradeRejection;
use axum::extract::ws::WebSocketUpgrade;
use axum::extract::{Query, State};
use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use serde::Deserialize;
use tracing::info;

use crate::auth::{extract_bearer_token, CurrentStaff, KITCHEN_ROLES};
use crate::error::ApiError;
use crate::AppState;
use saffron_core::KITCHEN_CHANNEL;
use saffron_kitchen::Subscriber;

#[derive(Debug, Default, Deserialize)]
pub struct KitchenQuery {
    pub token: Option<String>,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/ws/kitchen", get(kitchen_feed))
}

async fn kitchen_feed(
    State(state): State<AppState>,
    Query(query): Query<KitchenQuery>,
    headers: HeaderMap,
    upgrade: Result<WebSocketUpgrade, WebSocketUpgradeRejection>,
) -> Result<Response, ApiError> {
    let token = query
        .token
        .filter(|t| !t.is_empty())
        .or_else(|| {
            headers
                .get(AUTHORIZATION)
                .and_then(|h| h.to_str().ok())
                .and_then(extract_bearer_token)
                .map(str::to_string)
        })
        .ok_or_else(|| ApiError::unauthorized("Missing token"))?;

    let staff = CurrentStaff::from(state.jwt.verify(&token)?);
    staff.require_role(KITCHEN_ROLES)?;

    let ws = upgrade.map_err(|rejection| ApiError::validation(rejection.body_text()))?;

    info!(staff_id = %staff.id, role = %staff.role, "Kitchen display connecting");

    let subscriber = Subscriber {
        staff_id: staff.id,
        name: staff.name,
    };
    let hub = state.hub.clone();
    Ok(ws.on_upgrade(move |socket| hub.attach(socket, KITCHEN_CHANNEL.to_string(), subscriber)))
}
