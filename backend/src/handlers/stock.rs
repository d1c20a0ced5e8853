//! HTTP handlers for stock ledger endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::stock::{
    AddStockInput, AdjustStockInput, RemoveStockInput, StockCheckReport, StockMovement,
    StockService, StockUpdate,
};
use crate::AppState;

/// Add stock to a part
pub async fn add_stock(
    State(state): State<AppState>,
    Path(part_id): Path<Uuid>,
    Json(input): Json<AddStockInput>,
) -> AppResult<Json<StockUpdate>> {
    let service = StockService::new(state.db);
    let update = service.add_stock(part_id, input).await?;
    Ok(Json(update))
}

/// Remove stock from a part
pub async fn remove_stock(
    State(state): State<AppState>,
    Path(part_id): Path<Uuid>,
    Json(input): Json<RemoveStockInput>,
) -> AppResult<Json<StockUpdate>> {
    let service = StockService::new(state.db);
    let update = service.remove_stock(part_id, input).await?;
    Ok(Json(update))
}

/// Adjust a part's stock to an absolute quantity
pub async fn adjust_stock(
    State(state): State<AppState>,
    Path(part_id): Path<Uuid>,
    Json(input): Json<AdjustStockInput>,
) -> AppResult<Json<StockUpdate>> {
    let service = StockService::new(state.db);
    let update = service.adjust_stock(part_id, input).await?;
    Ok(Json(update))
}

/// Get movement history for a part
pub async fn get_part_movements(
    State(state): State<AppState>,
    Path(part_id): Path<Uuid>,
) -> AppResult<Json<Vec<StockMovement>>> {
    let service = StockService::new(state.db);
    let movements = service.get_stock_movements(part_id).await?;
    Ok(Json(movements))
}

/// Run a threshold sweep over every active part
pub async fn perform_stock_check(
    State(state): State<AppState>,
) -> AppResult<Json<StockCheckReport>> {
    let service = StockService::new(state.db);
    let report = service.perform_stock_check().await?;
    Ok(Json(report))
}
