//! Property-based tests for the pricing engine.
//!
//! 1. The subtotal is the sum of price × quantity over the lines.
//! 2. Delivery is charged exactly when the subtotal is at or below ₹100.
//! 3. Past the free-delivery threshold, a larger subtotal never gives a smaller total.
//! 4. Quoting is idempotent.

use decimal_percentage::Percentage;
use proptest::prelude::*;
use rust_decimal::Decimal;
use rusty_money::{Money, iso::INR};
use slotmap::SlotMap;

use milkrun::{
    items::LineItem,
    pricing::{
        FREE_DELIVERY_THRESHOLD_MINOR, STANDARD_DELIVERY_FEE_MINOR, compute_delivery_fee,
        compute_discount_amount, compute_subtotal, compute_total,
    },
    products::{ProductKey, Unit},
    quotes::quote_cart,
};

// =============================================================================
// Strategy helpers
// =============================================================================

/// Up to eight lines priced between ₹0 and ₹1,000 with quantities up to 20.
fn lines_strategy() -> impl Strategy<Value = Vec<(i64, u32)>> {
    prop::collection::vec((0..=100_000_i64, 0..=20_u32), 0..=8)
}

/// Discounts from 0% to 100% in whole percent points.
fn discount_strategy() -> impl Strategy<Value = Percentage> {
    (0..=100_i64).prop_map(|points| Percentage::from(Decimal::new(points, 2)))
}

fn build_lines(lines: &[(i64, u32)]) -> Result<Vec<LineItem<'static>>, TestCaseError> {
    let mut keys = SlotMap::<ProductKey, ()>::with_key();

    lines
        .iter()
        .map(|&(price, quantity)| {
            LineItem::new(
                keys.insert(()),
                format!("Product {price}"),
                Money::from_minor(price, INR),
                quantity,
                Unit::Litre,
            )
            .map_err(|error| TestCaseError::fail(error.to_string()))
        })
        .collect()
}

fn fail(error: impl ToString) -> TestCaseError {
    TestCaseError::fail(error.to_string())
}

proptest! {
    #[test]
    fn subtotal_is_sum_of_line_totals(lines in lines_strategy()) {
        let items = build_lines(&lines)?;
        let subtotal = compute_subtotal(&items, INR).map_err(fail)?;

        let expected: i64 = lines
            .iter()
            .map(|&(price, quantity)| price * i64::from(quantity))
            .sum();

        prop_assert_eq!(subtotal, Money::from_minor(expected, INR));
    }

    #[test]
    fn delivery_is_free_only_above_threshold(subtotal in 0..=100_000_i64) {
        let fee = compute_delivery_fee(&Money::from_minor(subtotal, INR)).map_err(fail)?;

        let expected = if subtotal > FREE_DELIVERY_THRESHOLD_MINOR {
            0
        } else {
            STANDARD_DELIVERY_FEE_MINOR
        };

        prop_assert_eq!(fee, Money::from_minor(expected, INR));
    }

    #[test]
    fn total_is_monotonic_past_threshold(
        base in (FREE_DELIVERY_THRESHOLD_MINOR + 1)..=100_000_i64,
        extra in 0..=100_000_i64,
        discount in discount_strategy(),
    ) {
        let total_for = |minor: i64| -> Result<i64, TestCaseError> {
            let subtotal = Money::from_minor(minor, INR);
            let discount_amount = compute_discount_amount(&subtotal, &discount).map_err(fail)?;
            let delivery_fee = compute_delivery_fee(&subtotal).map_err(fail)?;
            let total = compute_total(&subtotal, &discount_amount, &delivery_fee).map_err(fail)?;

            Ok(total.to_minor_units())
        };

        prop_assert!(total_for(base)? <= total_for(base + extra)?);
    }

    #[test]
    fn quoting_is_idempotent(lines in lines_strategy(), discount in discount_strategy()) {
        let items = build_lines(&lines)?;

        let first = quote_cart(&items, INR, discount).map_err(fail)?;
        let second = quote_cart(&items, INR, discount).map_err(fail)?;

        prop_assert_eq!(first, second);
    }

    #[test]
    fn discount_never_exceeds_subtotal(
        subtotal in 0..=100_000_i64,
        discount in discount_strategy(),
    ) {
        let subtotal = Money::from_minor(subtotal, INR);
        let discount_amount = compute_discount_amount(&subtotal, &discount).map_err(fail)?;

        prop_assert!(discount_amount.to_minor_units() >= 0);
        prop_assert!(discount_amount.to_minor_units() <= subtotal.to_minor_units());
    }
}
