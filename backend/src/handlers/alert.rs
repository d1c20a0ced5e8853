//! HTTP handlers for inventory alert endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::stock::{InventoryAlert, StockService};
use crate::AppState;

#[derive(Deserialize)]
pub struct AlertListQuery {
    pub unacknowledged_only: Option<bool>,
}

#[derive(Deserialize)]
pub struct AcknowledgeAlertInput {
    pub acknowledged_by: String,
}

/// List inventory alerts
pub async fn list_alerts(
    State(state): State<AppState>,
    Query(query): Query<AlertListQuery>,
) -> AppResult<Json<Vec<InventoryAlert>>> {
    let service = StockService::new(state.db);
    let alerts = service
        .list_alerts(query.unacknowledged_only.unwrap_or(false))
        .await?;
    Ok(Json(alerts))
}

/// Acknowledge an alert
pub async fn acknowledge_alert(
    State(state): State<AppState>,
    Path(alert_id): Path<Uuid>,
    Json(input): Json<AcknowledgeAlertInput>,
) -> AppResult<Json<InventoryAlert>> {
    let service = StockService::new(state.db);
    let alert = service
        .acknowledge_alert(alert_id, &input.acknowledged_by)
        .await?;
    Ok(Json(alert))
}
