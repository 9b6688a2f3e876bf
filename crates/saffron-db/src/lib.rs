//! # saffron-db: Database Layer for Saffron POS
//!
//! SQLite storage for menus, tables, orders and payments, and the
//! transactional services that run the order lifecycle on top of it.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Saffron POS Data Flow                             │
//! │                                                                         │
//! │  HTTP handler (POST /api/orders)                                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   saffron-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐   ┌───────────────┐   ┌────────────────┐  │   │
//! │  │   │   Services    │   │ Repositories  │   │   Migrations   │  │   │
//! │  │   │ OrderService  │──►│ order, table  │   │   (embedded)   │  │   │
//! │  │   │ PaymentSvc    │   │ catalog, pay  │   │ 001_initial    │  │   │
//! │  │   │ TableService  │   └───────┬───────┘   │ 002_indexes    │  │   │
//! │  │   └──────┬────────┘           │           └────────────────┘  │   │
//! │  │          │ post-commit        ▼                                │   │
//! │  │          ▼              Database (pool.rs)                     │   │
//! │  │   KitchenPublisher                                             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite (WAL)                                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations
//! - [`service`] - Order, payment and table services
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use saffron_core::NoopPublisher;
//! use saffron_db::{Database, DbConfig, OrderService};
//!
//! let db = Database::new(DbConfig::new("saffron.db")).await?;
//! let orders = OrderService::new(db.clone(), Arc::new(NoopPublisher));
//! let active = orders.list_active().await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod service;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

pub use repository::catalog::{CatalogRepository, MenuFilter};
pub use repository::order::{OrderFilter, OrderRepository};
pub use repository::payment::PaymentRepository;
pub use repository::table::TableRepository;

pub use service::order::OrderService;
pub use service::payment::{PaymentReceipt, PaymentService};
pub use service::table::TableService;
pub use service::{ServiceError, ServiceResult};
