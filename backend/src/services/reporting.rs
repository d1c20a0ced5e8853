//! Reporting service for inventory analytics and data export

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::services::stock::MovementType;

/// Reporting service
#[derive(Clone)]
pub struct ReportingService {
    db: PgPool,
}

/// Aggregate inventory statistics
#[derive(Debug, Serialize)]
pub struct InventoryStatistics {
    pub total_parts: i64,
    pub active_parts: i64,
    /// Sum of quantity * selling price over active parts
    pub total_stock_value: Decimal,
    pub in_stock_parts: i64,
    pub low_stock_parts: i64,
    pub out_of_stock_parts: i64,
    pub distinct_brands: i64,
    pub distinct_locations: i64,
    pub top_value_parts: Vec<TopValuePart>,
    pub recent_movements: Vec<MovementReportRow>,
}

/// A part ranked by stock value
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct TopValuePart {
    pub part_id: Uuid,
    pub part_code: String,
    pub name: String,
    pub quantity_in_stock: i32,
    pub selling_price: Decimal,
    pub stock_value: Decimal,
}

/// Movement row joined with part identity, for reports and CSV export
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct MovementReportRow {
    pub id: Uuid,
    pub part_code: String,
    pub part_name: String,
    pub movement_type: MovementType,
    pub quantity: i32,
    pub unit_cost: Option<Decimal>,
    pub total_cost: Option<Decimal>,
    pub reference_type: Option<String>,
    pub notes: Option<String>,
    pub performed_by: String,
    pub created_at: DateTime<Utc>,
}

/// Row for the aggregate statistics query
#[derive(Debug, sqlx::FromRow)]
struct StatisticsRow {
    total_parts: i64,
    active_parts: i64,
    total_stock_value: Decimal,
    in_stock_parts: i64,
    low_stock_parts: i64,
    out_of_stock_parts: i64,
    distinct_brands: i64,
    distinct_locations: i64,
}

impl ReportingService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Get aggregate inventory statistics
    pub async fn get_statistics(&self, recent_limit: i64) -> AppResult<InventoryStatistics> {
        let row = sqlx::query_as::<_, StatisticsRow>(
            r#"
            SELECT COUNT(*) AS total_parts,
                   COUNT(*) FILTER (WHERE is_active) AS active_parts,
                   COALESCE(SUM(quantity_in_stock * selling_price) FILTER (WHERE is_active), 0)
                       AS total_stock_value,
                   COUNT(*) FILTER (WHERE is_active AND quantity_in_stock > min_stock_level)
                       AS in_stock_parts,
                   COUNT(*) FILTER (WHERE is_active AND quantity_in_stock > 0
                                      AND quantity_in_stock <= min_stock_level)
                       AS low_stock_parts,
                   COUNT(*) FILTER (WHERE is_active AND quantity_in_stock = 0)
                       AS out_of_stock_parts,
                   COUNT(DISTINCT brand) AS distinct_brands,
                   COUNT(DISTINCT location) AS distinct_locations
            FROM parts
            "#,
        )
        .fetch_one(&self.db)
        .await?;

        let top_value_parts = sqlx::query_as::<_, TopValuePart>(
            r#"
            SELECT id AS part_id, part_code, name, quantity_in_stock, selling_price,
                   quantity_in_stock * selling_price AS stock_value
            FROM parts
            WHERE is_active = true
            ORDER BY quantity_in_stock * selling_price DESC
            LIMIT 10
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        let recent_movements = self.list_recent_movements(recent_limit).await?;

        Ok(InventoryStatistics {
            total_parts: row.total_parts,
            active_parts: row.active_parts,
            total_stock_value: row.total_stock_value,
            in_stock_parts: row.in_stock_parts,
            low_stock_parts: row.low_stock_parts,
            out_of_stock_parts: row.out_of_stock_parts,
            distinct_brands: row.distinct_brands,
            distinct_locations: row.distinct_locations,
            top_value_parts,
            recent_movements,
        })
    }

    /// List recent movements across all parts, newest first
    pub async fn list_recent_movements(&self, limit: i64) -> AppResult<Vec<MovementReportRow>> {
        let movements = sqlx::query_as::<_, MovementReportRow>(
            r#"
            SELECT sm.id, p.part_code, p.name AS part_name, sm.movement_type, sm.quantity,
                   sm.unit_cost, sm.total_cost, sm.reference_type, sm.notes, sm.performed_by,
                   sm.created_at
            FROM stock_movements sm
            JOIN parts p ON p.id = sm.part_id
            ORDER BY sm.created_at DESC
            LIMIT $1
            "#,
        )
        .bind(limit.clamp(1, 1000))
        .fetch_all(&self.db)
        .await?;

        Ok(movements)
    }

    /// Export the movement ledger as CSV, oldest first
    pub async fn export_movements_csv(&self) -> AppResult<String> {
        let movements = sqlx::query_as::<_, MovementReportRow>(
            r#"
            SELECT sm.id, p.part_code, p.name AS part_name, sm.movement_type, sm.quantity,
                   sm.unit_cost, sm.total_cost, sm.reference_type, sm.notes, sm.performed_by,
                   sm.created_at
            FROM stock_movements sm
            JOIN parts p ON p.id = sm.part_id
            ORDER BY sm.created_at ASC
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Self::export_to_csv(&movements)
    }

    /// Export report data as CSV
    pub fn export_to_csv<T: Serialize>(data: &[T]) -> AppResult<String> {
        let mut wtr = csv::Writer::from_writer(vec![]);
        for record in data {
            wtr.serialize(record)
                .map_err(|e| AppError::Internal(format!("CSV serialization error: {}", e)))?;
        }
        let csv_data = String::from_utf8(
            wtr.into_inner()
                .map_err(|e| AppError::Internal(format!("CSV writer error: {}", e)))?,
        )
        .map_err(|e| AppError::Internal(format!("UTF-8 conversion error: {}", e)))?;
        Ok(csv_data)
    }
}
