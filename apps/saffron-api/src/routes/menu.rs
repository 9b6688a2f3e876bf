//! Catalog lookups. Read-only; the catalog is loaded by the seed tool.

use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};

use crate::auth::CurrentStaff;
use crate::dto::{CategoryResponse, MenuItemDetailsResponse, MenuItemQuery, MenuItemResponse, ModifierResponse};
use crate::error::{ApiError, ErrorCode};
use crate::AppState;
use saffron_db::MenuFilter;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/categories", get(list_categories))
        .route("/api/menu-items", get(list_menu_items))
        .route("/api/menu-items/{id}", get(get_menu_item))
        .route("/api/modifiers", get(list_modifiers))
}

/// GET /api/categories
async fn list_categories(
    State(state): State<AppState>,
    _staff: CurrentStaff,
) -> Result<Json<Vec<CategoryResponse>>, ApiError> {
    let categories = state.db.catalog().list_categories().await?;
    Ok(Json(categories.into_iter().map(Into::into).collect()))
}

/// GET /api/menu-items?category_id=&available=true
async fn list_menu_items(
    State(state): State<AppState>,
    _staff: CurrentStaff,
    Query(query): Query<MenuItemQuery>,
) -> Result<Json<Vec<MenuItemResponse>>, ApiError> {
    let filter = MenuFilter {
        category_id: query.category_id.filter(|id| !id.trim().is_empty()),
        available_only: query.available.unwrap_or(false),
    };

    let items = state.db.catalog().list_menu_items(&filter).await?;
    Ok(Json(items.into_iter().map(Into::into).collect()))
}

/// GET /api/menu-items/{id}
async fn get_menu_item(
    State(state): State<AppState>,
    _staff: CurrentStaff,
    Path(id): Path<String>,
) -> Result<Json<MenuItemDetailsResponse>, ApiError> {
    let details = state
        .db
        .catalog()
        .get_menu_item_details(&id)
        .await?
        .ok_or_else(|| ApiError::new(ErrorCode::NotFound, format!("Menu item not found: {}", id)))?;

    Ok(Json(details.into()))
}

/// GET /api/modifiers
async fn list_modifiers(
    State(state): State<AppState>,
    _staff: CurrentStaff,
) -> Result<Json<Vec<ModifierResponse>>, ApiError> {
    let modifiers = state.db.catalog().list_modifiers().await?;
    Ok(Json(modifiers.into_iter().map(Into::into).collect()))
}
