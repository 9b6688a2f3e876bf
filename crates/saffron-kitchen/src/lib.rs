//! # saffron-kitchen: Kitchen Display Feed for Saffron POS
//!
//! Live order tickets for the kitchen. Order services publish through the
//! [`saffron_core::KitchenPublisher`] trait; [`KitchenHub`] is the
//! in-process implementation that pushes each event to every attached
//! kitchen display socket.
//!
//! ## Module Organization
//!
//! - [`hub`] - Broadcast hub and per-socket connection loop
//! - [`protocol`] - Messages sent to displays
//! - [`error`] - Kitchen feed error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use saffron_kitchen::{KitchenHub, DEFAULT_CHANNEL_CAPACITY};
//!
//! let hub = KitchenHub::new(DEFAULT_CHANNEL_CAPACITY)?;
//! let orders = OrderService::new(db.clone(), Arc::new(hub.clone()));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod hub;
pub mod protocol;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{KitchenError, KitchenResult};
pub use hub::{KitchenHub, Subscriber, DEFAULT_CHANNEL_CAPACITY};
pub use protocol::{KitchenEvent, KitchenMessage, WelcomePayload};
