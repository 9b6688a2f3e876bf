//! # Staff Authentication
//!
//! Staff log in against the external auth service, which signs HS256 tokens
//! with a secret shared with this server. Every `/api` route extracts
//! [`CurrentStaff`]; the kitchen feed additionally checks the role.
//!
//! ```text
//! Authorization: Bearer <jwt>
//!        │
//!        ▼
//! JwtManager::verify ── bad signature / expired / malformed ──► 401
//!        │
//!        ▼
//! CurrentStaff { id, name, role }
//!        │
//!        ▼
//! require_role(&[Admin, Manager]) ── other role ──► 403   (kitchen feed)
//! ```

use std::fmt;

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind as JwtErrorKind, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::ApiError;
use crate::AppState;
use saffron_core::StaffRef;

// =============================================================================
// Claims
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StaffRole {
    Admin,
    Manager,
    Waiter,
    Cashier,
    Kitchen,
}

impl fmt::Display for StaffRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StaffRole::Admin => "admin",
            StaffRole::Manager => "manager",
            StaffRole::Waiter => "waiter",
            StaffRole::Cashier => "cashier",
            StaffRole::Kitchen => "kitchen",
        };
        f.write_str(name)
    }
}

/// Roles allowed to subscribe to the kitchen channel.
pub const KITCHEN_ROLES: &[StaffRole] = &[StaffRole::Admin, StaffRole::Manager];

/// JWT claims carried by staff tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Staff id
    pub sub: String,
    /// Display name
    pub name: String,
    pub role: StaffRole,
    /// Expiration (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    pub fn new(staff_id: &str, name: &str, role: StaffRole, lifetime: Duration) -> Self {
        Claims {
            sub: staff_id.to_string(),
            name: name.to_string(),
            role,
            exp: (Utc::now() + lifetime).timestamp(),
        }
    }
}

// =============================================================================
// JwtManager
// =============================================================================

/// Verifies (and, for tooling and tests, issues) staff tokens.
#[derive(Clone)]
pub struct JwtManager {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl JwtManager {
    pub fn new(secret: &str) -> Self {
        JwtManager {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    pub fn issue(&self, claims: &Claims) -> Result<String, ApiError> {
        encode(&Header::default(), claims, &self.encoding)
            .map_err(|e| ApiError::internal(format!("Failed to sign token: {}", e)))
    }

    pub fn verify(&self, token: &str) -> Result<Claims, ApiError> {
        decode::<Claims>(token, &self.decoding, &Validation::default())
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                JwtErrorKind::ExpiredSignature => ApiError::unauthorized("Token has expired"),
                _ => ApiError::unauthorized("Invalid token"),
            })
    }
}

impl fmt::Debug for JwtManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtManager").finish_non_exhaustive()
    }
}

/// Extracts the token from an `Authorization` header value.
pub fn extract_bearer_token(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

// =============================================================================
// CurrentStaff
// =============================================================================

/// The authenticated staff member behind a request.
#[derive(Debug, Clone)]
pub struct CurrentStaff {
    pub id: String,
    pub name: String,
    pub role: StaffRole,
}

impl CurrentStaff {
    pub fn require_role(&self, allowed: &[StaffRole]) -> Result<(), ApiError> {
        if allowed.contains(&self.role) {
            return Ok(());
        }

        warn!(staff_id = %self.id, role = %self.role, "Role not permitted");
        Err(ApiError::forbidden("Your role does not have access to this resource"))
    }

    pub fn staff_ref(&self) -> StaffRef {
        StaffRef {
            id: self.id.clone(),
            name: self.name.clone(),
        }
    }
}

impl From<Claims> for CurrentStaff {
    fn from(claims: Claims) -> Self {
        CurrentStaff {
            id: claims.sub,
            name: claims.name,
            role: claims.role,
        }
    }
}

impl FromRequestParts<AppState> for CurrentStaff {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        if let Some(staff) = parts.extensions.get::<CurrentStaff>() {
            return Ok(staff.clone());
        }

        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or_else(|| ApiError::unauthorized("Missing bearer token"))?;

        let token = extract_bearer_token(header).ok_or_else(|| ApiError::unauthorized("Invalid authorization header"))?;

        let staff = CurrentStaff::from(state.jwt.verify(token)?);
        parts.extensions.insert(staff.clone());

        Ok(staff)
    }
}
