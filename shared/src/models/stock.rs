//! Stock ledger domain rules
//!
//! Pure logic shared by the backend services and their tests: threshold
//! breach classification and movement cost arithmetic. Persistence lives in
//! the backend service layer.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A threshold a part's quantity has crossed
///
/// `out_of_stock` and `low_stock` are mutually exclusive (a zero quantity is
/// reported as out of stock only); `overstock` is evaluated independently.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ThresholdBreach {
    LowStock,
    OutOfStock,
    Overstock,
}

impl ThresholdBreach {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThresholdBreach::LowStock => "low_stock",
            ThresholdBreach::OutOfStock => "out_of_stock",
            ThresholdBreach::Overstock => "overstock",
        }
    }
}

/// Evaluate a quantity against the configured min/max stock levels
///
/// Returns zero, one, or two breaches. Overstock can co-fire with the
/// low/out branch in principle, though the two are quantity-exclusive for
/// any sane threshold configuration.
pub fn evaluate_stock_thresholds(
    quantity: i32,
    min_stock_level: i32,
    max_stock_level: i32,
) -> Vec<ThresholdBreach> {
    let mut breaches = Vec::new();

    if quantity == 0 {
        breaches.push(ThresholdBreach::OutOfStock);
    } else if quantity <= min_stock_level {
        breaches.push(ThresholdBreach::LowStock);
    }

    if quantity > max_stock_level {
        breaches.push(ThresholdBreach::Overstock);
    }

    breaches
}

/// Total cost of a movement: |delta| * unit cost
pub fn movement_total_cost(delta: i32, unit_cost: Decimal) -> Decimal {
    Decimal::from(delta.unsigned_abs()) * unit_cost
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn zero_quantity_is_out_of_stock_only() {
        let breaches = evaluate_stock_thresholds(0, 10, 100);
        assert_eq!(breaches, vec![ThresholdBreach::OutOfStock]);
    }

    #[test]
    fn quantity_at_min_is_low_stock() {
        let breaches = evaluate_stock_thresholds(10, 10, 100);
        assert_eq!(breaches, vec![ThresholdBreach::LowStock]);
    }

    #[test]
    fn quantity_above_max_is_overstock() {
        let breaches = evaluate_stock_thresholds(105, 10, 100);
        assert_eq!(breaches, vec![ThresholdBreach::Overstock]);
    }

    #[test]
    fn healthy_quantity_has_no_breaches() {
        assert!(evaluate_stock_thresholds(40, 10, 100).is_empty());
    }

    #[test]
    fn total_cost_uses_absolute_delta() {
        assert_eq!(
            movement_total_cost(-20, Decimal::from(1000)),
            Decimal::from(20000)
        );
        assert_eq!(
            movement_total_cost(3, Decimal::from(1000)),
            Decimal::from(3000)
        );
    }
}
