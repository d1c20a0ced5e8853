//! Reporting handlers for inventory analytics and data export

use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

use crate::error::AppResult;
use crate::services::reporting::{InventoryStatistics, MovementReportRow, ReportingService};
use crate::AppState;

#[derive(Deserialize)]
pub struct MovementListQuery {
    pub limit: Option<i64>,
}

/// Get aggregate inventory statistics
pub async fn get_inventory_statistics(
    State(state): State<AppState>,
) -> AppResult<Json<InventoryStatistics>> {
    let recent_limit = state.config.inventory.recent_movements;
    let service = ReportingService::new(state.db);
    let statistics = service.get_statistics(recent_limit).await?;
    Ok(Json(statistics))
}

/// List recent stock movements across all parts
pub async fn list_recent_movements(
    State(state): State<AppState>,
    Query(query): Query<MovementListQuery>,
) -> AppResult<Json<Vec<MovementReportRow>>> {
    let limit = query.limit.unwrap_or(state.config.inventory.recent_movements);
    let service = ReportingService::new(state.db);
    let movements = service.list_recent_movements(limit).await?;
    Ok(Json(movements))
}

/// Export the movement ledger as CSV
pub async fn export_movements(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let service = ReportingService::new(state.db);
    let csv = service.export_movements_csv().await?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"stock_movements.csv\"",
            ),
        ],
        csv,
    )
        .into_response())
}
