//! Validation utilities for the Garage Management Platform
//!
//! Input-boundary checks shared by the backend services. These run before any
//! database transaction is opened.

use rust_decimal::Decimal;

// ============================================================================
// Part Catalog Validations
// ============================================================================

/// Validate part code format (3-20 characters, uppercase alphanumeric or dash)
pub fn validate_part_code(code: &str) -> Result<(), &'static str> {
    if code.len() < 3 {
        return Err("Part code must be at least 3 characters");
    }
    if code.len() > 20 {
        return Err("Part code must be at most 20 characters");
    }
    if !code
        .chars()
        .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '-')
    {
        return Err("Part code must be uppercase alphanumeric or dashes only");
    }
    Ok(())
}

/// Validate that stock thresholds are consistent
pub fn validate_stock_levels(min_stock_level: i32, max_stock_level: i32) -> Result<(), &'static str> {
    if min_stock_level < 0 || max_stock_level < 0 {
        return Err("Stock levels cannot be negative");
    }
    if min_stock_level > max_stock_level {
        return Err("Minimum stock level cannot exceed maximum stock level");
    }
    Ok(())
}

/// Validate a price field
pub fn validate_price(price: Decimal) -> Result<(), &'static str> {
    if price < Decimal::ZERO {
        return Err("Price cannot be negative");
    }
    Ok(())
}

// ============================================================================
// Stock Ledger Validations
// ============================================================================

/// Validate a requested movement quantity (add/remove amounts)
pub fn validate_movement_quantity(quantity: i32) -> Result<(), &'static str> {
    if quantity <= 0 {
        return Err("Quantity must be positive");
    }
    Ok(())
}

/// Validate an absolute target quantity (adjustments)
pub fn validate_target_quantity(quantity: i32) -> Result<(), &'static str> {
    if quantity < 0 {
        return Err("Quantity cannot be negative");
    }
    Ok(())
}

/// Validate the mandatory reason for a stock adjustment
pub fn validate_adjustment_reason(reason: &str) -> Result<(), &'static str> {
    if reason.trim().is_empty() {
        return Err("Adjustment reason is required");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn part_code_format() {
        assert!(validate_part_code("BRK-PAD-01").is_ok());
        assert!(validate_part_code("OIL10W40").is_ok());
        assert!(validate_part_code("ab").is_err());
        assert!(validate_part_code("lowercase").is_err());
        assert!(validate_part_code("TOO-LONG-PART-CODE-123").is_err());
    }

    #[test]
    fn stock_levels_must_be_ordered() {
        assert!(validate_stock_levels(10, 100).is_ok());
        assert!(validate_stock_levels(10, 10).is_ok());
        assert!(validate_stock_levels(20, 10).is_err());
        assert!(validate_stock_levels(-1, 10).is_err());
    }

    #[test]
    fn prices_cannot_be_negative() {
        assert!(validate_price(Decimal::from_str("0").unwrap()).is_ok());
        assert!(validate_price(Decimal::from_str("15000").unwrap()).is_ok());
        assert!(validate_price(Decimal::from_str("-0.01").unwrap()).is_err());
    }

    #[test]
    fn movement_quantity_must_be_positive() {
        assert!(validate_movement_quantity(1).is_ok());
        assert!(validate_movement_quantity(0).is_err());
        assert!(validate_movement_quantity(-5).is_err());
    }

    #[test]
    fn adjustment_reason_is_mandatory() {
        assert!(validate_adjustment_reason("damaged in storage").is_ok());
        assert!(validate_adjustment_reason("   ").is_err());
    }
}
