//! # Services
//!
//! Transactional orchestration over the repositories.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  request (validated by saffron-core constructors)                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  BEGIN ── first statement is a write (claim / insert / touch)          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  reads + saffron-core rules on the tx connection                       │
//! │       │                                                                 │
//! │       ├── any error ──► tx dropped ──► ROLLBACK                        │
//! │       ▼                                                                 │
//! │  COMMIT ──► post-commit side effects (kitchen publish)                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod order;
pub mod payment;
pub mod table;

use saffron_core::{CoreError, ErrorKind, ValidationError};
use thiserror::Error;

use crate::error::DbError;

/// Error from a service call: a business rule or a storage failure.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Domain(#[from] CoreError),

    #[error(transparent)]
    Db(#[from] DbError),
}

impl ServiceError {
    /// Classifies this error for the API layer.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ServiceError::Domain(err) => err.kind(),
            ServiceError::Db(err) => err.kind(),
        }
    }
}

impl From<sqlx::Error> for ServiceError {
    fn from(err: sqlx::Error) -> Self {
        ServiceError::Db(err.into())
    }
}

impl From<ValidationError> for ServiceError {
    fn from(err: ValidationError) -> Self {
        ServiceError::Domain(err.into())
    }
}

/// Result type for service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;
