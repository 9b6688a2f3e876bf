//! Table registry endpoints.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, patch};
use axum::{Json, Router};

use super::ApiJson;
use crate::auth::CurrentStaff;
use crate::dto::{parse_optional, CreateTableRequest, StatusRequest, TableOverviewResponse, TableResponse};
use crate::error::ApiError;
use crate::AppState;
use saffron_core::TableStatus;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/tables", get(list).post(create))
        .route("/api/tables/{id}", get(get_by_id).delete(delete))
        .route("/api/tables/{id}/status", patch(set_status))
}

/// GET /api/tables - every table with its active orders
async fn list(State(state): State<AppState>, _staff: CurrentStaff) -> Result<Json<Vec<TableOverviewResponse>>, ApiError> {
    let tables = state.tables.list().await?;
    Ok(Json(tables.into_iter().map(Into::into).collect()))
}

/// GET /api/tables/{id}
async fn get_by_id(
    State(state): State<AppState>,
    _staff: CurrentStaff,
    Path(id): Path<String>,
) -> Result<Json<TableResponse>, ApiError> {
    Ok(Json(state.tables.get(&id).await?.into()))
}

/// POST /api/tables
async fn create(
    State(state): State<AppState>,
    _staff: CurrentStaff,
    ApiJson(body): ApiJson<CreateTableRequest>,
) -> Result<(StatusCode, Json<TableResponse>), ApiError> {
    let status: Option<TableStatus> = parse_optional(body.status.as_deref())?;
    let table = state.tables.create(&body.table_number, status).await?;
    Ok((StatusCode::CREATED, Json(table.into())))
}

/// PATCH /api/tables/{id}/status
async fn set_status(
    State(state): State<AppState>,
    _staff: CurrentStaff,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<StatusRequest>,
) -> Result<Json<TableResponse>, ApiError> {
    let status: TableStatus = body.status.parse()?;
    let table = state.tables.set_status(&id, status).await?;
    Ok(Json(table.into()))
}

/// DELETE /api/tables/{id} - rejected while the table has active orders
async fn delete(State(state): State<AppState>, _staff: CurrentStaff, Path(id): Path<String>) -> Result<StatusCode, ApiError> {
    state.tables.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
