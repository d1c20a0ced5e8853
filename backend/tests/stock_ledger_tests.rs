//! Stock ledger tests
//!
//! Tests for the inventory stock ledger including:
//! - Non-negative quantity invariant
//! - Ledger reconciliation (sum of deltas equals quantity change)
//! - Threshold alert correctness

use proptest::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;

use shared::models::{evaluate_stock_thresholds, movement_total_cost, ThresholdBreach};
use shared::types::StockStatus;

// Helper to create Decimal from string
fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

// ============================================================================
// Simulated Ledger (mirrors the service's mutation semantics)
// ============================================================================

#[derive(Debug, Clone, Copy)]
struct LedgerPart {
    quantity: i32,
    min_stock_level: i32,
    max_stock_level: i32,
}

#[derive(Debug, PartialEq)]
enum LedgerError {
    InvalidQuantity,
    InsufficientStock { requested: i32, available: i32 },
    MissingReason,
    Overflow,
    MovementWriteFailed,
}

/// Apply an add operation; returns the recorded movement delta
fn apply_add(part: &mut LedgerPart, quantity: i32) -> Result<i32, LedgerError> {
    if quantity <= 0 {
        return Err(LedgerError::InvalidQuantity);
    }
    part.quantity = part
        .quantity
        .checked_add(quantity)
        .ok_or(LedgerError::Overflow)?;
    Ok(quantity)
}

/// Apply a remove operation; fails without mutating when stock is short
fn apply_remove(part: &mut LedgerPart, quantity: i32) -> Result<i32, LedgerError> {
    if quantity <= 0 {
        return Err(LedgerError::InvalidQuantity);
    }
    if quantity > part.quantity {
        return Err(LedgerError::InsufficientStock {
            requested: quantity,
            available: part.quantity,
        });
    }
    part.quantity -= quantity;
    Ok(-quantity)
}

/// Apply an adjustment to an absolute quantity
fn apply_adjust(part: &mut LedgerPart, new_quantity: i32, reason: &str) -> Result<i32, LedgerError> {
    if new_quantity < 0 {
        return Err(LedgerError::InvalidQuantity);
    }
    if reason.trim().is_empty() {
        return Err(LedgerError::MissingReason);
    }
    let delta = new_quantity - part.quantity;
    part.quantity = new_quantity;
    Ok(delta)
}

/// Run a quantity update and its movement insert as one unit of work
///
/// Mirrors the service transaction: when the movement insert fails, the
/// quantity update is rolled back and nothing is recorded.
fn commit_movement<F>(
    part: &mut LedgerPart,
    movements: &mut Vec<i32>,
    apply: F,
    movement_write_fails: bool,
) -> Result<i32, LedgerError>
where
    F: FnOnce(&mut LedgerPart) -> Result<i32, LedgerError>,
{
    let snapshot = *part;
    let delta = apply(part)?;
    if movement_write_fails {
        *part = snapshot;
        return Err(LedgerError::MovementWriteFailed);
    }
    movements.push(delta);
    Ok(delta)
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// Landing exactly at the minimum creates a low stock breach
    #[test]
    fn test_threshold_at_minimum_is_low_stock() {
        // quantity moves from 15 to 10 with min=10, max=100
        let breaches = evaluate_stock_thresholds(10, 10, 100);
        assert_eq!(breaches, vec![ThresholdBreach::LowStock]);
    }

    /// Reaching zero creates out_of_stock only, never low_stock as well
    #[test]
    fn test_zero_quantity_is_out_of_stock_only() {
        let breaches = evaluate_stock_thresholds(0, 10, 100);
        assert_eq!(breaches, vec![ThresholdBreach::OutOfStock]);
        assert!(!breaches.contains(&ThresholdBreach::LowStock));
    }

    /// Exceeding the maximum creates an overstock breach
    #[test]
    fn test_quantity_above_maximum_is_overstock() {
        // quantity moves from 90 to 105 with min=10, max=100
        let breaches = evaluate_stock_thresholds(105, 10, 100);
        assert_eq!(breaches, vec![ThresholdBreach::Overstock]);
    }

    /// A healthy quantity creates no breach
    #[test]
    fn test_healthy_quantity_has_no_breaches() {
        // quantity moves from 50 to 40 with min=10, max=100
        assert!(evaluate_stock_thresholds(40, 10, 100).is_empty());
    }

    /// Scenario: add 3 units at cost 1000 to a part holding 5 (min=10)
    #[test]
    fn test_add_stock_scenario() {
        let mut part = LedgerPart {
            quantity: 5,
            min_stock_level: 10,
            max_stock_level: 100,
        };

        let delta = apply_add(&mut part, 3).unwrap();

        assert_eq!(part.quantity, 8);
        assert_eq!(delta, 3);
        assert_eq!(movement_total_cost(delta, dec("1000")), dec("3000"));

        // 8 <= min triggers a low stock breach
        let breaches = evaluate_stock_thresholds(
            part.quantity,
            part.min_stock_level,
            part.max_stock_level,
        );
        assert_eq!(breaches, vec![ThresholdBreach::LowStock]);
    }

    /// Scenario: removing more than available fails and leaves state unchanged
    #[test]
    fn test_remove_exceeding_stock_fails_without_mutation() {
        let mut part = LedgerPart {
            quantity: 5,
            min_stock_level: 10,
            max_stock_level: 100,
        };

        let result = apply_remove(&mut part, 10);

        assert_eq!(
            result,
            Err(LedgerError::InsufficientStock {
                requested: 10,
                available: 5,
            })
        );
        assert_eq!(part.quantity, 5);
    }

    /// Scenario: adjusting 20 down to 0 records a -20 movement and out_of_stock
    #[test]
    fn test_adjustment_to_zero() {
        let mut part = LedgerPart {
            quantity: 20,
            min_stock_level: 10,
            max_stock_level: 100,
        };

        let delta = apply_adjust(&mut part, 0, "damaged in storage").unwrap();

        assert_eq!(part.quantity, 0);
        assert_eq!(delta, -20);

        let breaches = evaluate_stock_thresholds(
            part.quantity,
            part.min_stock_level,
            part.max_stock_level,
        );
        assert_eq!(breaches, vec![ThresholdBreach::OutOfStock]);
    }

    /// Adjustments require a reason
    #[test]
    fn test_adjustment_requires_reason() {
        let mut part = LedgerPart {
            quantity: 20,
            min_stock_level: 10,
            max_stock_level: 100,
        };

        assert_eq!(apply_adjust(&mut part, 0, "  "), Err(LedgerError::MissingReason));
        assert_eq!(part.quantity, 20);
    }

    /// An addition that would overflow the quantity counter is rejected
    /// without mutating the part
    #[test]
    fn test_add_overflowing_counter_is_rejected() {
        let mut part = LedgerPart {
            quantity: 1,
            min_stock_level: 10,
            max_stock_level: 100,
        };

        assert_eq!(apply_add(&mut part, i32::MAX), Err(LedgerError::Overflow));
        assert_eq!(part.quantity, 1);
    }

    /// A failed movement insert rolls the quantity update back; neither the
    /// part nor the movement log changes
    #[test]
    fn test_failed_movement_write_rolls_back_quantity() {
        let mut part = LedgerPart {
            quantity: 50,
            min_stock_level: 10,
            max_stock_level: 100,
        };
        let mut movements: Vec<i32> = Vec::new();

        let result = commit_movement(&mut part, &mut movements, |p| apply_remove(p, 30), true);

        assert_eq!(result, Err(LedgerError::MovementWriteFailed));
        assert_eq!(part.quantity, 50);
        assert!(movements.is_empty());
    }

    /// Re-evaluating an unchanged part creates no second alert for the same
    /// breach; acknowledging it clears the way for a fresh one
    #[test]
    fn test_repeated_sweep_creates_single_alert() {
        let mut open_alerts: std::collections::HashSet<ThresholdBreach> =
            std::collections::HashSet::new();

        let sweep = |open: &mut std::collections::HashSet<ThresholdBreach>| -> usize {
            evaluate_stock_thresholds(5, 10, 100)
                .into_iter()
                .filter(|breach| open.insert(*breach))
                .count()
        };

        assert_eq!(sweep(&mut open_alerts), 1);
        assert_eq!(sweep(&mut open_alerts), 0);

        // Acknowledged alerts no longer suppress new ones
        open_alerts.remove(&ThresholdBreach::LowStock);
        assert_eq!(sweep(&mut open_alerts), 1);
    }

    /// Total cost uses the absolute delta
    #[test]
    fn test_total_cost_calculation() {
        assert_eq!(movement_total_cost(3, dec("1000")), dec("3000"));
        assert_eq!(movement_total_cost(-20, dec("250.50")), dec("5010.00"));
        assert_eq!(movement_total_cost(0, dec("99")), Decimal::ZERO);
    }

    /// Stock status classification matches the alert branches
    #[test]
    fn test_stock_status_classification() {
        assert_eq!(StockStatus::from_quantity(0, 10), StockStatus::OutOfStock);
        assert_eq!(StockStatus::from_quantity(10, 10), StockStatus::LowStock);
        assert_eq!(StockStatus::from_quantity(11, 10), StockStatus::InStock);
    }

    /// Breach labels match the persisted alert type values
    #[test]
    fn test_breach_labels() {
        assert_eq!(ThresholdBreach::LowStock.as_str(), "low_stock");
        assert_eq!(ThresholdBreach::OutOfStock.as_str(), "out_of_stock");
        assert_eq!(ThresholdBreach::Overstock.as_str(), "overstock");
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    /// A single ledger operation request
    #[derive(Debug, Clone)]
    enum LedgerOp {
        Add(i32),
        Remove(i32),
        Adjust(i32),
    }

    fn op_strategy() -> impl Strategy<Value = LedgerOp> {
        prop_oneof![
            (1i32..=500).prop_map(LedgerOp::Add),
            (1i32..=500).prop_map(LedgerOp::Remove),
            (0i32..=1000).prop_map(LedgerOp::Adjust),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Quantity never goes negative, whatever sequence of operations runs
        #[test]
        fn prop_quantity_never_negative(
            initial in 0i32..=1000,
            ops in prop::collection::vec(op_strategy(), 1..30)
        ) {
            let mut part = LedgerPart {
                quantity: initial,
                min_stock_level: 10,
                max_stock_level: 100,
            };

            for op in ops {
                let _ = match op {
                    LedgerOp::Add(q) => apply_add(&mut part, q),
                    LedgerOp::Remove(q) => apply_remove(&mut part, q),
                    LedgerOp::Adjust(q) => apply_adjust(&mut part, q, "stocktake"),
                };
                prop_assert!(part.quantity >= 0);
            }
        }

        /// The sum of recorded deltas reconciles to the quantity change
        #[test]
        fn prop_ledger_reconciliation(
            initial in 0i32..=1000,
            ops in prop::collection::vec(op_strategy(), 1..30)
        ) {
            let mut part = LedgerPart {
                quantity: initial,
                min_stock_level: 10,
                max_stock_level: 100,
            };
            let mut deltas: Vec<i32> = Vec::new();

            for op in ops {
                let result = match op {
                    LedgerOp::Add(q) => apply_add(&mut part, q),
                    LedgerOp::Remove(q) => apply_remove(&mut part, q),
                    LedgerOp::Adjust(q) => apply_adjust(&mut part, q, "stocktake"),
                };
                // Failed operations record no movement
                if let Ok(delta) = result {
                    deltas.push(delta);
                }
            }

            let total: i32 = deltas.iter().sum();
            prop_assert_eq!(total, part.quantity - initial);
        }

        /// With movement writes failing at random, failed operations leave no
        /// trace and the recorded movements still reconcile
        #[test]
        fn prop_partial_failures_leave_no_trace(
            initial in 0i32..=1000,
            ops in prop::collection::vec((op_strategy(), any::<bool>()), 1..30)
        ) {
            let mut part = LedgerPart {
                quantity: initial,
                min_stock_level: 10,
                max_stock_level: 100,
            };
            let mut movements: Vec<i32> = Vec::new();

            for (op, write_fails) in ops {
                let before = part.quantity;
                let result = commit_movement(
                    &mut part,
                    &mut movements,
                    |p| match op {
                        LedgerOp::Add(q) => apply_add(p, q),
                        LedgerOp::Remove(q) => apply_remove(p, q),
                        LedgerOp::Adjust(q) => apply_adjust(p, q, "stocktake"),
                    },
                    write_fails,
                );
                if result.is_err() {
                    prop_assert_eq!(part.quantity, before);
                }
            }

            let total: i32 = movements.iter().sum();
            prop_assert_eq!(total, part.quantity - initial);
        }

        /// A failed removal leaves the quantity untouched
        #[test]
        fn prop_failed_removal_is_a_no_op(
            available in 0i32..=100,
            extra in 1i32..=100
        ) {
            let mut part = LedgerPart {
                quantity: available,
                min_stock_level: 10,
                max_stock_level: 100,
            };

            let result = apply_remove(&mut part, available + extra);

            prop_assert!(result.is_err());
            prop_assert_eq!(part.quantity, available);
        }

        /// out_of_stock fires exactly when the quantity is zero
        #[test]
        fn prop_out_of_stock_iff_zero(
            quantity in 0i32..=2000,
            min in 0i32..=100,
            max in 100i32..=1000
        ) {
            let breaches = evaluate_stock_thresholds(quantity, min, max);
            prop_assert_eq!(
                breaches.contains(&ThresholdBreach::OutOfStock),
                quantity == 0
            );
        }

        /// low_stock fires exactly when 0 < quantity <= min
        #[test]
        fn prop_low_stock_range(
            quantity in 0i32..=2000,
            min in 0i32..=100,
            max in 100i32..=1000
        ) {
            let breaches = evaluate_stock_thresholds(quantity, min, max);
            prop_assert_eq!(
                breaches.contains(&ThresholdBreach::LowStock),
                quantity > 0 && quantity <= min
            );
        }

        /// overstock fires exactly when quantity > max
        #[test]
        fn prop_overstock_above_max(
            quantity in 0i32..=2000,
            min in 0i32..=100,
            max in 100i32..=1000
        ) {
            let breaches = evaluate_stock_thresholds(quantity, min, max);
            prop_assert_eq!(
                breaches.contains(&ThresholdBreach::Overstock),
                quantity > max
            );
        }

        /// low_stock and out_of_stock never co-fire
        #[test]
        fn prop_low_and_out_exclusive(
            quantity in 0i32..=2000,
            min in 0i32..=100,
            max in 0i32..=1000
        ) {
            let breaches = evaluate_stock_thresholds(quantity, min, max);
            prop_assert!(
                !(breaches.contains(&ThresholdBreach::LowStock)
                    && breaches.contains(&ThresholdBreach::OutOfStock))
            );
        }

        /// Total cost is never negative and scales with the delta
        #[test]
        fn prop_total_cost_non_negative(
            delta in -1000i32..=1000,
            unit_cost in (0i64..=1_000_000).prop_map(|n| Decimal::new(n, 2))
        ) {
            let total = movement_total_cost(delta, unit_cost);
            prop_assert!(total >= Decimal::ZERO);
            prop_assert_eq!(total, Decimal::from(delta.unsigned_abs()) * unit_cost);
        }
    }
}
