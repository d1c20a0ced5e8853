//! Part catalog validation tests
//!
//! Input-boundary checks run before any transaction is opened; these tests
//! cover the rejection rules for the part CRUD operations.

use proptest::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;

use shared::validation::{
    validate_adjustment_reason, validate_movement_quantity, validate_part_code, validate_price,
    validate_stock_levels, validate_target_quantity,
};

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_part_code_accepts_catalog_style_codes() {
        for code in ["BRK-PAD-01", "OIL-10W40", "SPK-NGK-CR7", "TIRE90-90"] {
            assert!(validate_part_code(code).is_ok(), "rejected {}", code);
        }
    }

    #[test]
    fn test_part_code_rejects_malformed_codes() {
        assert!(validate_part_code("ab").is_err());
        assert!(validate_part_code("lower-case").is_err());
        assert!(validate_part_code("HAS SPACE").is_err());
        assert!(validate_part_code("WAY-TOO-LONG-PART-CODE-1").is_err());
        assert!(validate_part_code("").is_err());
    }

    #[test]
    fn test_stock_levels_ordering() {
        assert!(validate_stock_levels(0, 0).is_ok());
        assert!(validate_stock_levels(10, 100).is_ok());
        // min above max rejected at the input boundary
        assert!(validate_stock_levels(101, 100).is_err());
        assert!(validate_stock_levels(-1, 100).is_err());
        assert!(validate_stock_levels(0, -1).is_err());
    }

    #[test]
    fn test_price_rejects_negative_values() {
        assert!(validate_price(Decimal::ZERO).is_ok());
        assert!(validate_price(dec("150000")).is_ok());
        assert!(validate_price(dec("-1")).is_err());
    }

    #[test]
    fn test_movement_quantity_must_be_positive() {
        assert!(validate_movement_quantity(1).is_ok());
        assert!(validate_movement_quantity(0).is_err());
        assert!(validate_movement_quantity(-3).is_err());
    }

    #[test]
    fn test_target_quantity_allows_zero() {
        assert!(validate_target_quantity(0).is_ok());
        assert!(validate_target_quantity(500).is_ok());
        assert!(validate_target_quantity(-1).is_err());
    }

    #[test]
    fn test_adjustment_reason_required() {
        assert!(validate_adjustment_reason("stocktake correction").is_ok());
        assert!(validate_adjustment_reason("").is_err());
        assert!(validate_adjustment_reason("   \t").is_err());
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;

    /// Strategy for well-formed part codes
    fn part_code_strategy() -> impl Strategy<Value = String> {
        proptest::string::string_regex("[A-Z0-9-]{3,20}").unwrap()
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Every code in the allowed alphabet and length range validates
        #[test]
        fn prop_well_formed_codes_accepted(code in part_code_strategy()) {
            prop_assert!(validate_part_code(&code).is_ok());
        }

        /// Codes outside the length range are always rejected
        #[test]
        fn prop_overlong_codes_rejected(code in proptest::string::string_regex("[A-Z0-9-]{21,40}").unwrap()) {
            prop_assert!(validate_part_code(&code).is_err());
        }

        /// Threshold validation accepts exactly the ordered, non-negative pairs
        #[test]
        fn prop_stock_levels_validation(min in -50i32..=150, max in -50i32..=150) {
            let expected = min >= 0 && max >= 0 && min <= max;
            prop_assert_eq!(validate_stock_levels(min, max).is_ok(), expected);
        }

        /// Non-negative prices always validate
        #[test]
        fn prop_non_negative_prices_accepted(n in 0i64..=10_000_000) {
            prop_assert!(validate_price(Decimal::new(n, 2)).is_ok());
        }
    }
}
