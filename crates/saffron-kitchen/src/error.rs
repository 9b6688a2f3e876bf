//! # Kitchen Feed Errors
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Kitchen Feed Error Categories                       │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Configuration  │  │   Transport     │  │     Protocol            │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  InvalidConfig  │  │  SendFailed     │  │  SerializationFailed    │ │
//! │  │                 │  │  Disconnected   │  │                         │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// Result type alias for kitchen feed operations.
pub type KitchenResult<T> = Result<T, KitchenError>;

/// Kitchen feed error type.
#[derive(Debug, Error)]
pub enum KitchenError {
    /// Invalid hub configuration.
    #[error("Invalid kitchen hub configuration: {0}")]
    InvalidConfig(String),

    /// Failed to serialize a message for the wire.
    #[error("Serialization failed: {0}")]
    SerializationFailed(String),

    /// Writing to a display socket failed.
    #[error("Send failed: {0}")]
    SendFailed(String),

    /// Display went away.
    #[error("Kitchen display disconnected")]
    Disconnected,
}

impl From<serde_json::Error> for KitchenError {
    fn from(err: serde_json::Error) -> Self {
        KitchenError::SerializationFailed(err.to_string())
    }
}
