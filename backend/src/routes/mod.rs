//! Route definitions for the Garage Management Platform

use axum::{
    routing::{get, post},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Part catalog
        .nest("/parts", part_routes())
        // Stock ledger
        .nest("/stock", stock_routes())
        // Inventory alerts
        .nest("/alerts", alert_routes())
}

/// Part catalog routes
fn part_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::search_parts).post(handlers::create_part))
        .route(
            "/:part_id",
            get(handlers::get_part)
                .put(handlers::update_part)
                .delete(handlers::deactivate_part),
        )
        .route("/:part_id/movements", get(handlers::get_part_movements))
        // Quantity mutations go through the stock ledger
        .route("/:part_id/stock/add", post(handlers::add_stock))
        .route("/:part_id/stock/remove", post(handlers::remove_stock))
        .route("/:part_id/stock/adjust", post(handlers::adjust_stock))
}

/// Stock ledger routes
fn stock_routes() -> Router<AppState> {
    Router::new()
        .route("/movements", get(handlers::list_recent_movements))
        .route("/movements/export", get(handlers::export_movements))
        .route("/check", post(handlers::perform_stock_check))
        .route("/statistics", get(handlers::get_inventory_statistics))
}

/// Inventory alert routes
fn alert_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_alerts))
        .route("/:alert_id/acknowledge", post(handlers::acknowledge_alert))
}
