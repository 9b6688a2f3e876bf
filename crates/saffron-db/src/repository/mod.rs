//! # Repository Module
//!
//! Database repository implementations for Saffron POS.
//!
//! ## Two Access Paths
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Plain reads (HTTP GET handlers)                                       │
//! │       │   db.orders().list_active()                                    │
//! │       ▼                                                                 │
//! │  XxxRepository { pool }  ── acquires a pooled connection per call      │
//! │                                                                         │
//! │  Transactional steps (services)                                        │
//! │       │   order::insert_line(&mut tx, ...)                             │
//! │       ▼                                                                 │
//! │  free functions taking `&mut SqliteConnection`                         │
//! │  ── every read inside a transaction goes through the tx connection     │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`CatalogRepository`](catalog::CatalogRepository) - Categories, menu items, modifiers
//! - [`TableRepository`](table::TableRepository) - Dining tables
//! - [`OrderRepository`](order::OrderRepository) - Orders with their lines
//! - [`PaymentRepository`](payment::PaymentRepository) - Payments

pub mod catalog;
pub mod order;
pub mod payment;
pub mod table;
