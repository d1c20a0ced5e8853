//! Stock ledger service
//!
//! Owns every quantity mutation for parts: each change updates the part row,
//! appends exactly one movement record, and re-evaluates alert thresholds,
//! all inside a single database transaction. The part row is locked with
//! SELECT ... FOR UPDATE so concurrent mutations against the same part
//! serialize instead of losing updates.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use uuid::Uuid;

use shared::models::{evaluate_stock_thresholds, movement_total_cost, ThresholdBreach};
use shared::types::StockStatus;
use shared::validation::{
    validate_adjustment_reason, validate_movement_quantity, validate_target_quantity,
};

use crate::error::{AppError, AppResult};
use crate::services::part::{Part, PART_COLUMNS};

/// Stock ledger service for quantity mutations, movements, and alerts
#[derive(Clone)]
pub struct StockService {
    db: PgPool,
}

/// Why a quantity changed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "movement_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum MovementType {
    In,
    Out,
    Adjustment,
    Loss,
    Return,
}

/// Inventory alert types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "alert_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AlertType {
    LowStock,
    OutOfStock,
    Overstock,
    Expiring,
}

impl From<ThresholdBreach> for AlertType {
    fn from(breach: ThresholdBreach) -> Self {
        match breach {
            ThresholdBreach::LowStock => AlertType::LowStock,
            ThresholdBreach::OutOfStock => AlertType::OutOfStock,
            ThresholdBreach::Overstock => AlertType::Overstock,
        }
    }
}

/// Append-only audit record of a single quantity change
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct StockMovement {
    pub id: Uuid,
    pub part_id: Uuid,
    pub movement_type: MovementType,
    /// Signed delta applied to the part's quantity
    pub quantity: i32,
    pub unit_cost: Option<Decimal>,
    pub total_cost: Option<Decimal>,
    pub reference_type: Option<String>,
    pub reference_id: Option<Uuid>,
    pub notes: Option<String>,
    pub performed_by: String,
    pub created_at: DateTime<Utc>,
}

/// A generated notice that a part crossed a stock threshold
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct InventoryAlert {
    pub id: Uuid,
    pub part_id: Uuid,
    pub alert_type: AlertType,
    pub message: String,
    pub is_acknowledged: bool,
    pub acknowledged_by: Option<String>,
    pub acknowledged_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Input for adding stock (deliveries, returns to shelf)
#[derive(Debug, Deserialize)]
pub struct AddStockInput {
    pub quantity: i32,
    pub unit_cost: Decimal,
    pub performed_by: String,
    pub notes: Option<String>,
    pub reference_type: Option<String>,
    pub reference_id: Option<Uuid>,
}

/// Input for removing stock (consumption by repairs, sales)
#[derive(Debug, Deserialize)]
pub struct RemoveStockInput {
    pub quantity: i32,
    pub performed_by: String,
    pub unit_cost: Option<Decimal>,
    pub notes: Option<String>,
    pub reference_type: Option<String>,
    pub reference_id: Option<Uuid>,
}

/// Input for adjusting stock to an absolute quantity (stocktake corrections)
#[derive(Debug, Deserialize)]
pub struct AdjustStockInput {
    pub new_quantity: i32,
    /// Mandatory human-readable explanation
    pub reason: String,
    pub performed_by: String,
    pub unit_cost: Option<Decimal>,
}

/// Result of a stock mutation
#[derive(Debug, Serialize)]
pub struct StockUpdate {
    pub part: Part,
    pub movement: StockMovement,
}

/// Result of a stock check sweep
#[derive(Debug, Default, Serialize)]
pub struct StockCheckReport {
    pub parts_checked: usize,
    pub low_stock_parts: usize,
    pub out_of_stock_parts: usize,
    pub overstock_parts: usize,
    pub alerts_created: usize,
}

/// Metadata attached to a movement record
struct MovementContext {
    movement_type: MovementType,
    unit_cost: Option<Decimal>,
    notes: Option<String>,
    reference_type: Option<String>,
    reference_id: Option<Uuid>,
    performed_by: String,
}

/// How the new quantity is derived from the current one
enum QuantityChange {
    /// Absolute target quantity
    SetTo(i32),
    /// Signed delta relative to the locked current quantity
    ChangeBy(i32),
}

impl StockService {
    /// Create a new StockService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Add stock to a part (movement type "in"); unit cost is required
    pub async fn add_stock(&self, part_id: Uuid, input: AddStockInput) -> AppResult<StockUpdate> {
        validate_movement_quantity(input.quantity).map_err(|e| AppError::Validation {
            field: "quantity".to_string(),
            message: e.to_string(),
            message_vi: "Số lượng phải là số dương".to_string(),
        })?;

        self.mutate(
            part_id,
            QuantityChange::ChangeBy(input.quantity),
            MovementContext {
                movement_type: MovementType::In,
                unit_cost: Some(input.unit_cost),
                notes: input.notes,
                reference_type: input.reference_type,
                reference_id: input.reference_id,
                performed_by: input.performed_by,
            },
        )
        .await
    }

    /// Remove stock from a part (movement type "out")
    ///
    /// Fails with InsufficientStock before any write when the requested
    /// quantity exceeds what is available.
    pub async fn remove_stock(
        &self,
        part_id: Uuid,
        input: RemoveStockInput,
    ) -> AppResult<StockUpdate> {
        validate_movement_quantity(input.quantity).map_err(|e| AppError::Validation {
            field: "quantity".to_string(),
            message: e.to_string(),
            message_vi: "Số lượng phải là số dương".to_string(),
        })?;

        self.mutate(
            part_id,
            QuantityChange::ChangeBy(-input.quantity),
            MovementContext {
                movement_type: MovementType::Out,
                unit_cost: input.unit_cost,
                notes: input.notes,
                reference_type: input.reference_type,
                reference_id: input.reference_id,
                performed_by: input.performed_by,
            },
        )
        .await
    }

    /// Set a part's quantity to an absolute value (movement type "adjustment")
    pub async fn adjust_stock(
        &self,
        part_id: Uuid,
        input: AdjustStockInput,
    ) -> AppResult<StockUpdate> {
        validate_target_quantity(input.new_quantity).map_err(|e| AppError::Validation {
            field: "new_quantity".to_string(),
            message: e.to_string(),
            message_vi: "Số lượng không được âm".to_string(),
        })?;
        validate_adjustment_reason(&input.reason).map_err(|e| AppError::Validation {
            field: "reason".to_string(),
            message: e.to_string(),
            message_vi: "Phải ghi rõ lý do điều chỉnh tồn kho".to_string(),
        })?;

        self.mutate(
            part_id,
            QuantityChange::SetTo(input.new_quantity),
            MovementContext {
                movement_type: MovementType::Adjustment,
                unit_cost: input.unit_cost,
                notes: Some(input.reason),
                reference_type: None,
                reference_id: None,
                performed_by: input.performed_by,
            },
        )
        .await
    }

    /// Core mutation primitive
    ///
    /// Locks the part row, derives the new quantity, updates the part,
    /// appends the movement, and evaluates thresholds; commits all of it or
    /// none of it.
    async fn mutate(
        &self,
        part_id: Uuid,
        change: QuantityChange,
        ctx: MovementContext,
    ) -> AppResult<StockUpdate> {
        let mut tx = self.db.begin().await?;

        let current = sqlx::query_as::<_, Part>(&format!(
            "SELECT {PART_COLUMNS} FROM parts WHERE id = $1 FOR UPDATE"
        ))
        .bind(part_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Part".to_string()))?;

        let new_quantity = match change {
            QuantityChange::SetTo(target) => target,
            QuantityChange::ChangeBy(delta) => current
                .quantity_in_stock
                .checked_add(delta)
                .ok_or_else(|| AppError::Validation {
                    field: "quantity".to_string(),
                    message: "Quantity change overflows the stock counter".to_string(),
                    message_vi: "Thay đổi số lượng vượt quá giới hạn tồn kho".to_string(),
                })?,
        };

        if new_quantity < 0 {
            // Only removals can drive the quantity negative
            return Err(AppError::InsufficientStock {
                part_code: current.part_code.clone(),
                requested: current.quantity_in_stock.saturating_sub(new_quantity),
                available: current.quantity_in_stock,
            });
        }

        let delta = new_quantity - current.quantity_in_stock;

        let part = sqlx::query_as::<_, Part>(&format!(
            r#"
            UPDATE parts
            SET quantity_in_stock = $1, updated_at = NOW()
            WHERE id = $2
            RETURNING {PART_COLUMNS}
            "#
        ))
        .bind(new_quantity)
        .bind(part_id)
        .fetch_one(&mut *tx)
        .await?;

        let total_cost = ctx.unit_cost.map(|uc| movement_total_cost(delta, uc));

        let movement = sqlx::query_as::<_, StockMovement>(
            r#"
            INSERT INTO stock_movements (
                part_id, movement_type, quantity, unit_cost, total_cost,
                reference_type, reference_id, notes, performed_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id, part_id, movement_type, quantity, unit_cost, total_cost,
                      reference_type, reference_id, notes, performed_by, created_at
            "#,
        )
        .bind(part_id)
        .bind(ctx.movement_type)
        .bind(delta)
        .bind(ctx.unit_cost)
        .bind(total_cost)
        .bind(&ctx.reference_type)
        .bind(ctx.reference_id)
        .bind(&ctx.notes)
        .bind(&ctx.performed_by)
        .fetch_one(&mut *tx)
        .await?;

        insert_threshold_alerts(&mut tx, &part).await?;

        tx.commit().await?;

        Ok(StockUpdate { part, movement })
    }

    /// Get movement history for a part, newest first
    pub async fn get_stock_movements(&self, part_id: Uuid) -> AppResult<Vec<StockMovement>> {
        let part_exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM parts WHERE id = $1)")
                .bind(part_id)
                .fetch_one(&self.db)
                .await?;

        if !part_exists {
            return Err(AppError::NotFound("Part".to_string()));
        }

        let movements = sqlx::query_as::<_, StockMovement>(
            r#"
            SELECT id, part_id, movement_type, quantity, unit_cost, total_cost,
                   reference_type, reference_id, notes, performed_by, created_at
            FROM stock_movements
            WHERE part_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(part_id)
        .fetch_all(&self.db)
        .await?;

        Ok(movements)
    }

    /// Re-evaluate thresholds for every active part without mutating quantities
    ///
    /// Each part is its own unit of work; a failure on one part is logged and
    /// the sweep continues.
    pub async fn perform_stock_check(&self) -> AppResult<StockCheckReport> {
        let parts = sqlx::query_as::<_, Part>(&format!(
            "SELECT {PART_COLUMNS} FROM parts WHERE is_active = true ORDER BY part_code"
        ))
        .fetch_all(&self.db)
        .await?;

        let mut report = StockCheckReport {
            parts_checked: parts.len(),
            ..Default::default()
        };

        for part in &parts {
            match StockStatus::from_quantity(part.quantity_in_stock, part.min_stock_level) {
                StockStatus::OutOfStock => report.out_of_stock_parts += 1,
                StockStatus::LowStock => report.low_stock_parts += 1,
                StockStatus::InStock => {}
            }
            if part.quantity_in_stock > part.max_stock_level {
                report.overstock_parts += 1;
            }

            let created = async {
                let mut tx = self.db.begin().await?;
                let created = insert_threshold_alerts(&mut tx, part).await?;
                tx.commit().await?;
                Ok::<usize, AppError>(created)
            }
            .await;

            match created {
                Ok(n) => report.alerts_created += n,
                Err(e) => {
                    tracing::warn!(part_code = %part.part_code, "stock check failed for part: {}", e);
                }
            }
        }

        Ok(report)
    }

    /// List alerts, optionally only unacknowledged ones
    pub async fn list_alerts(&self, unacknowledged_only: bool) -> AppResult<Vec<InventoryAlert>> {
        let alerts = sqlx::query_as::<_, InventoryAlert>(
            r#"
            SELECT id, part_id, alert_type, message, is_acknowledged,
                   acknowledged_by, acknowledged_at, created_at
            FROM inventory_alerts
            WHERE (NOT $1 OR is_acknowledged = false)
            ORDER BY created_at DESC
            "#,
        )
        .bind(unacknowledged_only)
        .fetch_all(&self.db)
        .await?;

        Ok(alerts)
    }

    /// Mark an alert as handled
    ///
    /// Idempotent: re-acknowledging rewrites the same fields, last writer wins.
    pub async fn acknowledge_alert(
        &self,
        alert_id: Uuid,
        acknowledged_by: &str,
    ) -> AppResult<InventoryAlert> {
        let alert = sqlx::query_as::<_, InventoryAlert>(
            r#"
            UPDATE inventory_alerts
            SET is_acknowledged = true, acknowledged_by = $1, acknowledged_at = NOW()
            WHERE id = $2
            RETURNING id, part_id, alert_type, message, is_acknowledged,
                      acknowledged_by, acknowledged_at, created_at
            "#,
        )
        .bind(acknowledged_by)
        .bind(alert_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Alert".to_string()))?;

        Ok(alert)
    }
}

/// Evaluate a part's thresholds and insert alert rows on the given transaction
///
/// A partial unique index on (part_id, alert_type) over unacknowledged rows
/// keeps one open alert per part and type; the insert dedups against it with
/// ON CONFLICT DO NOTHING, so concurrent sweeps cannot pile up duplicates.
/// Returns the number of alerts created.
pub(crate) async fn insert_threshold_alerts(
    tx: &mut Transaction<'_, Postgres>,
    part: &Part,
) -> AppResult<usize> {
    let breaches = evaluate_stock_thresholds(
        part.quantity_in_stock,
        part.min_stock_level,
        part.max_stock_level,
    );

    let mut created = 0;
    for breach in breaches {
        let message = alert_message(part, breach);

        let result = sqlx::query(
            r#"
            INSERT INTO inventory_alerts (part_id, alert_type, message)
            VALUES ($1, $2, $3)
            ON CONFLICT (part_id, alert_type) WHERE is_acknowledged = false
            DO NOTHING
            "#,
        )
        .bind(part.id)
        .bind(AlertType::from(breach))
        .bind(&message)
        .execute(&mut **tx)
        .await?;

        created += result.rows_affected() as usize;
    }

    Ok(created)
}

/// Human-readable alert message referencing the part
fn alert_message(part: &Part, breach: ThresholdBreach) -> String {
    match breach {
        ThresholdBreach::OutOfStock => {
            format!("Part {} ({}) is out of stock", part.name, part.part_code)
        }
        ThresholdBreach::LowStock => format!(
            "Part {} ({}) is low on stock: {} remaining (minimum {})",
            part.name, part.part_code, part.quantity_in_stock, part.min_stock_level
        ),
        ThresholdBreach::Overstock => format!(
            "Part {} ({}) exceeds maximum stock level: {} on hand (maximum {})",
            part.name, part.part_code, part.quantity_in_stock, part.max_stock_level
        ),
    }
}
