//! # API Errors
//!
//! Every failure leaves the server as `{"code", "message", "details"?}`.
//!
//! ```text
//! ┌──────────────────────┬────────┬───────────────────────────────────────┐
//! │ ErrorCode            │ Status │ Raised by                             │
//! ├──────────────────────┼────────┼───────────────────────────────────────┤
//! │ VALIDATION_ERROR     │ 400    │ request shape, ValidationError        │
//! │ UNAUTHORIZED         │ 401    │ missing / bad / expired token         │
//! │ FORBIDDEN            │ 403    │ role gate                             │
//! │ NOT_FOUND            │ 404    │ DbError::NotFound                     │
//! │ BUSINESS_LOGIC       │ 422    │ CoreError (occupied, paid, ...)       │
//! │ DATABASE_ERROR       │ 500    │ any other DbError                     │
//! │ INTERNAL             │ 500    │ everything else                       │
//! └──────────────────────┴────────┴───────────────────────────────────────┘
//! ```

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::json;

use saffron_core::{CoreError, ErrorKind, ValidationError};
use saffron_db::{DbError, ServiceError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    ValidationError,
    Unauthorized,
    Forbidden,
    NotFound,
    BusinessLogic,
    DatabaseError,
    Internal,
}

impl ErrorCode {
    pub fn status(&self) -> StatusCode {
        match self {
            ErrorCode::ValidationError => StatusCode::BAD_REQUEST,
            ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorCode::Forbidden => StatusCode::FORBIDDEN,
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::BusinessLogic => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorCode::DatabaseError | ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// API-level error with its HTTP mapping.
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationError, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unauthorized, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Forbidden, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Internal, message)
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.code.status();
        if status.is_server_error() {
            tracing::error!(code = ?self.code, error = %self.message, "Request failed");
            let generic = match self.code {
                ErrorCode::DatabaseError => "A database error occurred.",
                _ => "An internal error occurred.",
            };
            return (status, Json(ApiError::new(self.code, generic))).into_response();
        }

        (status, Json(self)).into_response()
    }
}

// =============================================================================
// Conversions
// =============================================================================

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        let message = err.to_string();
        match err {
            CoreError::Validation(inner) => inner.into(),
            CoreError::PaymentAmountMismatch { expected, received } => {
                ApiError::new(ErrorCode::BusinessLogic, message).with_details(json!({
                    "expected": expected.to_string(),
                    "received": received.to_string(),
                }))
            }
            _ => ApiError::new(ErrorCode::BusinessLogic, message),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err.kind() {
            ErrorKind::NotFound => ApiError::new(ErrorCode::NotFound, err.to_string()),
            ErrorKind::Conflict => ApiError::new(ErrorCode::BusinessLogic, err.to_string()),
            ErrorKind::Validation => ApiError::validation(err.to_string()),
            ErrorKind::Unexpected => ApiError::new(ErrorCode::DatabaseError, err.to_string()),
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Domain(err) => err.into(),
            ServiceError::Db(err) => err.into(),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::validation(rejection.body_text())
    }
}
