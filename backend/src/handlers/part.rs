//! HTTP handlers for the part catalog endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::part::{CreatePartInput, Part, PartSearchFilter, PartService, UpdatePartInput};
use crate::AppState;

/// Create a part
pub async fn create_part(
    State(state): State<AppState>,
    Json(input): Json<CreatePartInput>,
) -> AppResult<Json<Part>> {
    let service = PartService::new(state.db);
    let part = service.create_part(input).await?;
    Ok(Json(part))
}

/// Get a part by ID
pub async fn get_part(
    State(state): State<AppState>,
    Path(part_id): Path<Uuid>,
) -> AppResult<Json<Part>> {
    let service = PartService::new(state.db);
    let part = service.get_part(part_id).await?;
    Ok(Json(part))
}

/// Update a part's catalog fields
pub async fn update_part(
    State(state): State<AppState>,
    Path(part_id): Path<Uuid>,
    Json(input): Json<UpdatePartInput>,
) -> AppResult<Json<Part>> {
    let service = PartService::new(state.db);
    let part = service.update_part(part_id, input).await?;
    Ok(Json(part))
}

/// Soft-delete a part
pub async fn deactivate_part(
    State(state): State<AppState>,
    Path(part_id): Path<Uuid>,
) -> AppResult<Json<()>> {
    let service = PartService::new(state.db);
    service.deactivate_part(part_id).await?;
    Ok(Json(()))
}

/// Search parts with filters
pub async fn search_parts(
    State(state): State<AppState>,
    Query(filter): Query<PartSearchFilter>,
) -> AppResult<Json<Vec<Part>>> {
    let default_limit = state.config.inventory.search_limit;
    let service = PartService::new(state.db);
    let parts = service.search_parts(&filter, default_limit).await?;
    Ok(Json(parts))
}
