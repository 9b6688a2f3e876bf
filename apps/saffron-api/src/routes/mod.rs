//! # HTTP Routes
//!
//! One module per resource; each exposes `router()` and is merged by
//! [`crate::create_app`].
//!
//! ```text
//! /health                      health      (no auth)
//! /api/categories              menu
//! /api/menu-items[/{id}]       menu
//! /api/modifiers               menu
//! /api/tables[/{id}[/status]]  tables
//! /api/orders[...]             orders
//! /api/order-items/{id}/status orders
//! /api/payments                payments
//! /ws/kitchen                  kitchen     (admin, manager)
//! ```

pub mod health;
pub mod kitchen;
pub mod menu;
pub mod orders;
pub mod payments;
pub mod tables;

use axum::extract::FromRequest;

use crate::error::ApiError;

/// `axum::Json` whose rejection is an [`ApiError`] (400 `VALIDATION_ERROR`).
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);
