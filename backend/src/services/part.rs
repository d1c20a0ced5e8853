//! Part catalog service for spare-part CRUD and search

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use shared::types::StockStatus;
use shared::validation::{validate_part_code, validate_price, validate_stock_levels};

use crate::error::{AppError, AppResult};
use crate::services::stock::{insert_threshold_alerts, MovementType};

/// Columns returned for every part query
pub(crate) const PART_COLUMNS: &str = "id, part_code, name, brand, unit, purchase_price, \
     selling_price, quantity_in_stock, min_stock_level, max_stock_level, location, is_active, \
     created_at, updated_at";

/// Part service for managing the spare-part catalog
#[derive(Clone)]
pub struct PartService {
    db: PgPool,
}

/// A stocked spare part
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Part {
    pub id: Uuid,
    pub part_code: String,
    pub name: String,
    pub brand: Option<String>,
    pub unit: String,
    pub purchase_price: Decimal,
    pub selling_price: Decimal,
    pub quantity_in_stock: i32,
    pub min_stock_level: i32,
    pub max_stock_level: i32,
    pub location: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a part
#[derive(Debug, Deserialize)]
pub struct CreatePartInput {
    /// Human-assigned code; generated when omitted
    pub part_code: Option<String>,
    pub name: String,
    pub brand: Option<String>,
    pub unit: Option<String>,
    pub purchase_price: Decimal,
    pub selling_price: Decimal,
    pub min_stock_level: i32,
    pub max_stock_level: i32,
    pub location: Option<String>,
    /// Opening stock; recorded as an "in" movement when nonzero
    pub initial_quantity: Option<i32>,
    pub performed_by: Option<String>,
}

/// Input for updating a part
///
/// `quantity_in_stock` is deliberately absent: quantity changes go through
/// the stock ledger so every change leaves a movement record.
#[derive(Debug, Deserialize)]
pub struct UpdatePartInput {
    pub name: Option<String>,
    pub brand: Option<String>,
    pub unit: Option<String>,
    pub purchase_price: Option<Decimal>,
    pub selling_price: Option<Decimal>,
    pub min_stock_level: Option<i32>,
    pub max_stock_level: Option<i32>,
    pub location: Option<String>,
    pub is_active: Option<bool>,
}

/// Filter parameters for part search
#[derive(Debug, Default, Deserialize)]
pub struct PartSearchFilter {
    /// Free text matched against name, code, and brand
    pub q: Option<String>,
    pub brand: Option<String>,
    pub location: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub stock_status: Option<StockStatus>,
    pub include_inactive: Option<bool>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl PartService {
    /// Create a new PartService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Create a part, optionally with opening stock
    pub async fn create_part(&self, input: CreatePartInput) -> AppResult<Part> {
        // Validate input
        if input.name.trim().is_empty() {
            return Err(AppError::Validation {
                field: "name".to_string(),
                message: "Part name cannot be empty".to_string(),
                message_vi: "Tên phụ tùng không được để trống".to_string(),
            });
        }

        let part_code = match &input.part_code {
            Some(code) => {
                validate_part_code(code).map_err(|e| AppError::Validation {
                    field: "part_code".to_string(),
                    message: e.to_string(),
                    message_vi: "Mã phụ tùng không hợp lệ".to_string(),
                })?;
                code.clone()
            }
            None => Self::generate_part_code(),
        };

        validate_price(input.purchase_price).map_err(|e| AppError::Validation {
            field: "purchase_price".to_string(),
            message: e.to_string(),
            message_vi: "Giá nhập không được âm".to_string(),
        })?;
        validate_price(input.selling_price).map_err(|e| AppError::Validation {
            field: "selling_price".to_string(),
            message: e.to_string(),
            message_vi: "Giá bán không được âm".to_string(),
        })?;
        validate_stock_levels(input.min_stock_level, input.max_stock_level).map_err(|e| {
            AppError::Validation {
                field: "min_stock_level/max_stock_level".to_string(),
                message: e.to_string(),
                message_vi: "Mức tồn kho tối thiểu không được vượt quá mức tối đa".to_string(),
            }
        })?;

        let initial_quantity = input.initial_quantity.unwrap_or(0);
        if initial_quantity < 0 {
            return Err(AppError::Validation {
                field: "initial_quantity".to_string(),
                message: "Initial quantity cannot be negative".to_string(),
                message_vi: "Số lượng ban đầu không được âm".to_string(),
            });
        }

        // Check for duplicate part code
        let code_exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM parts WHERE part_code = $1)",
        )
        .bind(&part_code)
        .fetch_one(&self.db)
        .await?;

        if code_exists {
            return Err(AppError::DuplicateEntry("part_code".to_string()));
        }

        let unit = input.unit.unwrap_or_else(|| "pcs".to_string());
        let performed_by = input.performed_by.unwrap_or_else(|| "system".to_string());

        // Part insert, opening movement, and alert evaluation are one unit of work
        let mut tx = self.db.begin().await?;

        let part = sqlx::query_as::<_, Part>(&format!(
            r#"
            INSERT INTO parts (
                part_code, name, brand, unit, purchase_price, selling_price,
                quantity_in_stock, min_stock_level, max_stock_level, location
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {PART_COLUMNS}
            "#
        ))
        .bind(&part_code)
        .bind(input.name.trim())
        .bind(&input.brand)
        .bind(&unit)
        .bind(input.purchase_price)
        .bind(input.selling_price)
        .bind(initial_quantity)
        .bind(input.min_stock_level)
        .bind(input.max_stock_level)
        .bind(&input.location)
        .fetch_one(&mut *tx)
        .await?;

        if initial_quantity > 0 {
            let total_cost = input.purchase_price * Decimal::from(initial_quantity);
            sqlx::query(
                r#"
                INSERT INTO stock_movements (part_id, movement_type, quantity, unit_cost, total_cost, notes, performed_by)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                "#,
            )
            .bind(part.id)
            .bind(MovementType::In)
            .bind(initial_quantity)
            .bind(input.purchase_price)
            .bind(total_cost)
            .bind("Opening stock")
            .bind(&performed_by)
            .execute(&mut *tx)
            .await?;
        }

        insert_threshold_alerts(&mut tx, &part).await?;

        tx.commit().await?;

        Ok(part)
    }

    /// Get a part by ID
    pub async fn get_part(&self, part_id: Uuid) -> AppResult<Part> {
        let part = sqlx::query_as::<_, Part>(&format!(
            "SELECT {PART_COLUMNS} FROM parts WHERE id = $1"
        ))
        .bind(part_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Part".to_string()))?;

        Ok(part)
    }

    /// Update a part's catalog fields
    pub async fn update_part(&self, part_id: Uuid, input: UpdatePartInput) -> AppResult<Part> {
        let existing = self.get_part(part_id).await?;

        let name = input.name.unwrap_or(existing.name);
        if name.trim().is_empty() {
            return Err(AppError::Validation {
                field: "name".to_string(),
                message: "Part name cannot be empty".to_string(),
                message_vi: "Tên phụ tùng không được để trống".to_string(),
            });
        }
        let brand = input.brand.or(existing.brand);
        let unit = input.unit.unwrap_or(existing.unit);
        let purchase_price = input.purchase_price.unwrap_or(existing.purchase_price);
        let selling_price = input.selling_price.unwrap_or(existing.selling_price);
        let min_stock_level = input.min_stock_level.unwrap_or(existing.min_stock_level);
        let max_stock_level = input.max_stock_level.unwrap_or(existing.max_stock_level);
        let location = input.location.or(existing.location);
        let is_active = input.is_active.unwrap_or(existing.is_active);

        validate_price(purchase_price).map_err(|e| AppError::Validation {
            field: "purchase_price".to_string(),
            message: e.to_string(),
            message_vi: "Giá nhập không được âm".to_string(),
        })?;
        validate_price(selling_price).map_err(|e| AppError::Validation {
            field: "selling_price".to_string(),
            message: e.to_string(),
            message_vi: "Giá bán không được âm".to_string(),
        })?;
        validate_stock_levels(min_stock_level, max_stock_level).map_err(|e| {
            AppError::Validation {
                field: "min_stock_level/max_stock_level".to_string(),
                message: e.to_string(),
                message_vi: "Mức tồn kho tối thiểu không được vượt quá mức tối đa".to_string(),
            }
        })?;

        let part = sqlx::query_as::<_, Part>(&format!(
            r#"
            UPDATE parts
            SET name = $1, brand = $2, unit = $3, purchase_price = $4, selling_price = $5,
                min_stock_level = $6, max_stock_level = $7, location = $8, is_active = $9,
                updated_at = NOW()
            WHERE id = $10
            RETURNING {PART_COLUMNS}
            "#
        ))
        .bind(name.trim())
        .bind(&brand)
        .bind(&unit)
        .bind(purchase_price)
        .bind(selling_price)
        .bind(min_stock_level)
        .bind(max_stock_level)
        .bind(&location)
        .bind(is_active)
        .bind(part_id)
        .fetch_one(&self.db)
        .await?;

        Ok(part)
    }

    /// Soft-delete a part
    ///
    /// Parts referenced by movements are never physically removed.
    pub async fn deactivate_part(&self, part_id: Uuid) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE parts SET is_active = false, updated_at = NOW() WHERE id = $1",
        )
        .bind(part_id)
        .execute(&self.db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Part".to_string()));
        }

        Ok(())
    }

    /// Search parts with free text, price range, and stock-state filters
    pub async fn search_parts(
        &self,
        filter: &PartSearchFilter,
        default_limit: i64,
    ) -> AppResult<Vec<Part>> {
        let limit = filter.limit.unwrap_or(default_limit).clamp(1, 500);
        let offset = filter.offset.unwrap_or(0).max(0);
        let include_inactive = filter.include_inactive.unwrap_or(false);

        let parts = sqlx::query_as::<_, Part>(&format!(
            r#"
            SELECT {PART_COLUMNS}
            FROM parts
            WHERE ($1::text IS NULL
                   OR name ILIKE '%' || $1 || '%'
                   OR part_code ILIKE '%' || $1 || '%'
                   OR brand ILIKE '%' || $1 || '%')
              AND ($2::text IS NULL OR brand ILIKE $2)
              AND ($3::text IS NULL OR location ILIKE '%' || $3 || '%')
              AND ($4::numeric IS NULL OR selling_price >= $4)
              AND ($5::numeric IS NULL OR selling_price <= $5)
              AND ($6::text IS NULL
                   OR ($6 = 'out_of_stock' AND quantity_in_stock = 0)
                   OR ($6 = 'low_stock' AND quantity_in_stock > 0
                       AND quantity_in_stock <= min_stock_level)
                   OR ($6 = 'in_stock' AND quantity_in_stock > min_stock_level))
              AND (is_active = true OR $7)
            ORDER BY name ASC
            LIMIT $8 OFFSET $9
            "#
        ))
        .bind(&filter.q)
        .bind(&filter.brand)
        .bind(&filter.location)
        .bind(filter.min_price)
        .bind(filter.max_price)
        .bind(filter.stock_status.map(|s| s.as_str()))
        .bind(include_inactive)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.db)
        .await?;

        Ok(parts)
    }

    /// Generate a part code: PT-XXXXXXXX
    fn generate_part_code() -> String {
        let suffix = Uuid::new_v4().simple().to_string();
        format!("PT-{}", suffix[..8].to_uppercase())
    }
}
