//! # Saffron API
//!
//! axum HTTP server for waiter tablets, tills and kitchen displays.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Saffron API Server                             │
//! │                                                                         │
//! │  Tablet / Till ──► HTTP ──► routes ──► OrderService ──► SQLite         │
//! │                      │              PaymentService                     │
//! │                      │              TableService                       │
//! │                      │                    │ order.placed                │
//! │                      │                    ▼                             │
//! │  Kitchen display ◄── /ws/kitchen ◄── KitchenHub                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The binary in `main.rs` loads [`config::ApiConfig`], opens the database,
//! builds an [`AppState`] and serves [`create_app`]. Tests build the same
//! router over an in-memory database.

pub mod auth;
pub mod config;
pub mod dto;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth::JwtManager;
use saffron_db::{Database, OrderService, PaymentService, TableService};
use saffron_kitchen::KitchenHub;

pub use config::{ApiConfig, ConfigError};
pub use error::{ApiError, ErrorCode};

/// Shared application state, cloned into every handler.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub orders: OrderService,
    pub payments: PaymentService,
    pub tables: TableService,
    pub hub: KitchenHub,
    pub jwt: Arc<JwtManager>,
}

impl AppState {
    /// Wires the services; the order service publishes into `hub`.
    pub fn new(db: Database, hub: KitchenHub, jwt: JwtManager) -> Self {
        AppState {
            orders: OrderService::new(db.clone(), Arc::new(hub.clone())),
            payments: PaymentService::new(db.clone()),
            tables: TableService::new(db.clone()),
            db,
            hub,
            jwt: Arc::new(jwt),
        }
    }
}

/// Builds the full router with CORS and request tracing.
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .merge(routes::health::router())
        .merge(routes::menu::router())
        .merge(routes::tables::router())
        .merge(routes::orders::router())
        .merge(routes::payments::router())
        .merge(routes::kitchen::router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
