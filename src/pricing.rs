//! Pricing
//!
//! Pure functions that turn line items into the parts of a cart quote. Every amount is carried in
//! minor units (paise for INR) so the arithmetic stays exact; percentages are applied in decimal
//! space and rounded half away from zero.

use decimal_percentage::Percentage;
use rust_decimal::{
    Decimal, RoundingStrategy,
    prelude::{FromPrimitive, ToPrimitive},
};
use rusty_money::{Money, MoneyError, iso::Currency};
use thiserror::Error;

use crate::items::LineItem;

/// Flat delivery fee, in minor units, charged on small orders.
pub const STANDARD_DELIVERY_FEE_MINOR: i64 = 2000;

/// Subtotal, in minor units, that an order must exceed to be delivered for free.
pub const FREE_DELIVERY_THRESHOLD_MINOR: i64 = 10000;

/// Errors raised by the pricing engine.
#[derive(Debug, Error, PartialEq)]
pub enum PricingError {
    /// A price, quantity, percentage or catalog key was out of range or unknown.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The promo code is not in the code table.
    #[error("invalid promo code: {0}")]
    InvalidPromoCode(String),

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// When delivery is charged, and how much.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeliveryPolicy<'a> {
    fee: Money<'a, Currency>,
    free_over: Money<'a, Currency>,
}

impl<'a> DeliveryPolicy<'a> {
    /// The shop's standard policy: 20.00 delivery, free once the subtotal exceeds 100.00.
    pub fn standard(currency: &'a Currency) -> Self {
        Self {
            fee: Money::from_minor(STANDARD_DELIVERY_FEE_MINOR, currency),
            free_over: Money::from_minor(FREE_DELIVERY_THRESHOLD_MINOR, currency),
        }
    }

    /// Create a policy with a custom fee and free-delivery threshold.
    ///
    /// # Errors
    ///
    /// - [`PricingError::InvalidInput`]: the fee or threshold is negative.
    /// - [`PricingError::Money`]: the fee and threshold use different currencies.
    pub fn new(
        fee: Money<'a, Currency>,
        free_over: Money<'a, Currency>,
    ) -> Result<Self, PricingError> {
        ensure_non_negative("delivery fee", &fee)?;
        ensure_non_negative("free delivery threshold", &free_over)?;
        ensure_same_currency(&fee, &free_over)?;

        Ok(Self { fee, free_over })
    }

    /// Fee charged when delivery is not free.
    pub fn fee(&self) -> Money<'a, Currency> {
        self.fee
    }

    /// Subtotal that must be exceeded for free delivery.
    pub fn free_over(&self) -> Money<'a, Currency> {
        self.free_over
    }

    /// Delivery fee for a subtotal.
    ///
    /// The comparison is strict: a subtotal equal to the threshold still pays the fee.
    ///
    /// # Errors
    ///
    /// - [`PricingError::InvalidInput`]: the subtotal is negative.
    /// - [`PricingError::Money`]: the subtotal is in a different currency to the policy.
    pub fn fee_for(
        &self,
        subtotal: &Money<'a, Currency>,
    ) -> Result<Money<'a, Currency>, PricingError> {
        ensure_non_negative("subtotal", subtotal)?;
        ensure_same_currency(subtotal, &self.free_over)?;

        if subtotal.to_minor_units() > self.free_over.to_minor_units() {
            Ok(Money::from_minor(0, self.fee.currency()))
        } else {
            Ok(self.fee)
        }
    }

    /// How much more a subtotal needs before delivery is free, or `None` once it reaches the
    /// threshold.
    ///
    /// A subtotal exactly at the threshold gets no hint, though [`fee_for`](Self::fee_for) still
    /// charges it.
    ///
    /// # Errors
    ///
    /// - [`PricingError::InvalidInput`]: the subtotal is negative.
    /// - [`PricingError::Money`]: the subtotal is in a different currency to the policy.
    pub fn remaining_for_free_delivery(
        &self,
        subtotal: &Money<'a, Currency>,
    ) -> Result<Option<Money<'a, Currency>>, PricingError> {
        ensure_non_negative("subtotal", subtotal)?;
        ensure_same_currency(subtotal, &self.free_over)?;

        if subtotal.to_minor_units() < self.free_over.to_minor_units() {
            Ok(Some(self.free_over.sub(*subtotal)?))
        } else {
            Ok(None)
        }
    }
}

/// Sum of `unit price × quantity` over all items.
///
/// An empty slice prices to zero in `currency`.
///
/// # Errors
///
/// - [`PricingError::InvalidInput`]: a line total overflowed.
/// - [`PricingError::Money`]: an item is priced in a currency other than `currency`.
pub fn compute_subtotal<'a>(
    items: &[LineItem<'a>],
    currency: &'a Currency,
) -> Result<Money<'a, Currency>, PricingError> {
    items
        .iter()
        .try_fold(
            Money::from_minor(0, currency),
            |acc, item| -> Result<_, PricingError> { Ok(acc.add(item.line_total()?)?) },
        )
}

/// Discount taken off the subtotal for a percentage.
///
/// # Errors
///
/// - [`PricingError::InvalidInput`]: the subtotal is negative, the percentage is outside
///   0–100%, or the result cannot be represented.
pub fn compute_discount_amount<'a>(
    subtotal: &Money<'a, Currency>,
    discount: &Percentage,
) -> Result<Money<'a, Currency>, PricingError> {
    ensure_non_negative("subtotal", subtotal)?;
    ensure_valid_percentage(discount)?;

    let discount_minor = percent_of_minor(discount, subtotal.to_minor_units())?;

    Ok(Money::from_minor(discount_minor, subtotal.currency()))
}

/// Delivery fee for a subtotal under the standard policy.
///
/// # Errors
///
/// - [`PricingError::InvalidInput`]: the subtotal is negative.
pub fn compute_delivery_fee<'a>(
    subtotal: &Money<'a, Currency>,
) -> Result<Money<'a, Currency>, PricingError> {
    DeliveryPolicy::standard(subtotal.currency()).fee_for(subtotal)
}

/// Amount payable: the discount comes off the subtotal before delivery is added.
///
/// # Errors
///
/// - [`PricingError::InvalidInput`]: any component is negative, or the discount exceeds the
///   subtotal.
/// - [`PricingError::Money`]: the components use different currencies.
pub fn compute_total<'a>(
    subtotal: &Money<'a, Currency>,
    discount_amount: &Money<'a, Currency>,
    delivery_fee: &Money<'a, Currency>,
) -> Result<Money<'a, Currency>, PricingError> {
    ensure_non_negative("subtotal", subtotal)?;
    ensure_non_negative("discount amount", discount_amount)?;
    ensure_non_negative("delivery fee", delivery_fee)?;
    ensure_same_currency(subtotal, discount_amount)?;

    if discount_amount.to_minor_units() > subtotal.to_minor_units() {
        return Err(PricingError::InvalidInput(format!(
            "discount {discount_amount} exceeds subtotal {subtotal}"
        )));
    }

    Ok(subtotal.sub(*discount_amount)?.add(*delivery_fee)?)
}

/// Build a percentage from percent points (`10` is 10%).
///
/// # Errors
///
/// - [`PricingError::InvalidInput`]: the value is outside 0–100.
pub fn percentage_from_points(points: Decimal) -> Result<Percentage, PricingError> {
    if points < Decimal::ZERO || points > Decimal::ONE_HUNDRED {
        return Err(PricingError::InvalidInput(format!(
            "percentage {points} is outside 0-100"
        )));
    }

    Ok(Percentage::from(points / Decimal::ONE_HUNDRED))
}

/// Convert a fractional percentage to percent points for display.
pub fn percent_points(percentage: &Percentage) -> Decimal {
    // `Percentage` is a fraction (e.g. 0.25), so multiply by 100 to get percent points.
    ((*percentage) * Decimal::ONE * Decimal::ONE_HUNDRED).normalize()
}

/// Calculate a percentage of a minor unit amount, rounded to whole minor units.
pub(crate) fn percent_of_minor(percent: &Percentage, minor: i64) -> Result<i64, PricingError> {
    scale_minor(minor, (*percent) * Decimal::ONE)
}

/// Multiply a minor unit amount by a decimal factor, rounded to whole minor units.
pub(crate) fn scale_minor(minor: i64, factor: Decimal) -> Result<i64, PricingError> {
    let overflow = || PricingError::InvalidInput(format!("{minor} × {factor} overflows"));

    let minor = Decimal::from_i64(minor).ok_or_else(overflow)?;

    minor
        .checked_mul(factor)
        .ok_or_else(overflow)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or_else(overflow)
}

pub(crate) fn ensure_non_negative(
    what: &str,
    amount: &Money<'_, Currency>,
) -> Result<(), PricingError> {
    if amount.to_minor_units() < 0 {
        return Err(PricingError::InvalidInput(format!(
            "{what} must not be negative, got {amount}"
        )));
    }

    Ok(())
}

pub(crate) fn ensure_same_currency(
    left: &Money<'_, Currency>,
    right: &Money<'_, Currency>,
) -> Result<(), PricingError> {
    if left.currency() == right.currency() {
        Ok(())
    } else {
        Err(PricingError::Money(MoneyError::CurrencyMismatch {
            expected: left.currency().iso_alpha_code,
            actual: right.currency().iso_alpha_code,
        }))
    }
}

fn ensure_valid_percentage(percent: &Percentage) -> Result<(), PricingError> {
    let fraction = (*percent) * Decimal::ONE;

    if fraction < Decimal::ZERO || fraction > Decimal::ONE {
        return Err(PricingError::InvalidInput(format!(
            "discount {}% is outside 0-100",
            percent_points(percent)
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::{GBP, INR};
    use testresult::TestResult;

    use crate::products::{ProductKey, Unit};

    use super::*;

    fn line(name: &str, price_minor: i64, quantity: u32) -> TestResult<LineItem<'static>> {
        Ok(LineItem::new(
            ProductKey::default(),
            name.to_string(),
            Money::from_minor(price_minor, INR),
            quantity,
            Unit::Litre,
        )?)
    }

    #[test]
    fn subtotal_sums_price_times_quantity() -> TestResult {
        let items = [line("Fresh Cow Milk", 5400, 2)?, line("Fresh Dahi", 7000, 1)?];

        assert_eq!(compute_subtotal(&items, INR)?, Money::from_minor(17800, INR));

        Ok(())
    }

    #[test]
    fn subtotal_of_nothing_is_zero() -> TestResult {
        assert_eq!(compute_subtotal(&[], INR)?, Money::from_minor(0, INR));

        Ok(())
    }

    #[test]
    fn subtotal_rejects_foreign_currency_items() -> TestResult {
        let items = [LineItem::new(
            ProductKey::default(),
            "Imported Milk".to_string(),
            Money::from_minor(100, GBP),
            1,
            Unit::Litre,
        )?];

        let result = compute_subtotal(&items, INR);

        assert!(
            matches!(
                result,
                Err(PricingError::Money(MoneyError::CurrencyMismatch { .. }))
            ),
            "expected currency mismatch, got {result:?}"
        );

        Ok(())
    }

    #[test]
    fn discount_is_percentage_of_subtotal() -> TestResult {
        let subtotal = Money::from_minor(17800, INR);
        let discount = compute_discount_amount(&subtotal, &Percentage::from(0.1))?;

        assert_eq!(discount, Money::from_minor(1780, INR));

        Ok(())
    }

    #[test]
    fn discount_rounds_half_away_from_zero() -> TestResult {
        // 5% of 0.50 is 2.5 paise.
        let subtotal = Money::from_minor(50, INR);
        let percent = percentage_from_points(Decimal::from(5))?;
        let discount = compute_discount_amount(&subtotal, &percent)?;

        assert_eq!(discount, Money::from_minor(3, INR));

        Ok(())
    }

    #[test]
    fn discount_rejects_out_of_range_percentages() {
        let subtotal = Money::from_minor(10000, INR);

        assert!(matches!(
            compute_discount_amount(&subtotal, &Percentage::from(1.5)),
            Err(PricingError::InvalidInput(_))
        ));
        assert!(matches!(
            compute_discount_amount(&subtotal, &Percentage::from(-0.1)),
            Err(PricingError::InvalidInput(_))
        ));
    }

    #[test]
    fn discount_rejects_negative_subtotal() {
        let subtotal = Money::from_minor(-1, INR);

        assert!(matches!(
            compute_discount_amount(&subtotal, &Percentage::from(0.1)),
            Err(PricingError::InvalidInput(_))
        ));
    }

    #[test]
    fn delivery_is_charged_up_to_and_including_threshold() -> TestResult {
        assert_eq!(
            compute_delivery_fee(&Money::from_minor(10000, INR))?,
            Money::from_minor(2000, INR)
        );
        assert_eq!(
            compute_delivery_fee(&Money::from_minor(0, INR))?,
            Money::from_minor(2000, INR)
        );

        Ok(())
    }

    #[test]
    fn delivery_is_free_above_threshold() -> TestResult {
        assert_eq!(
            compute_delivery_fee(&Money::from_minor(10001, INR))?,
            Money::from_minor(0, INR)
        );

        Ok(())
    }

    #[test]
    fn delivery_fee_rejects_negative_subtotal() {
        assert!(matches!(
            compute_delivery_fee(&Money::from_minor(-100, INR)),
            Err(PricingError::InvalidInput(_))
        ));
    }

    #[test]
    fn custom_policy_uses_its_own_fee_and_threshold() -> TestResult {
        let policy =
            DeliveryPolicy::new(Money::from_minor(1500, INR), Money::from_minor(25000, INR))?;

        assert_eq!(
            policy.fee_for(&Money::from_minor(20000, INR))?,
            Money::from_minor(1500, INR)
        );
        assert_eq!(
            policy.fee_for(&Money::from_minor(25001, INR))?,
            Money::from_minor(0, INR)
        );

        Ok(())
    }

    #[test]
    fn remaining_for_free_delivery_counts_up_to_threshold() -> TestResult {
        let policy = DeliveryPolicy::standard(INR);

        assert_eq!(
            policy.remaining_for_free_delivery(&Money::from_minor(4800, INR))?,
            Some(Money::from_minor(5200, INR))
        );
        assert_eq!(
            policy.remaining_for_free_delivery(&Money::from_minor(0, INR))?,
            Some(Money::from_minor(10000, INR))
        );
        assert_eq!(
            policy.remaining_for_free_delivery(&Money::from_minor(17800, INR))?,
            None
        );

        Ok(())
    }

    #[test]
    fn remaining_for_free_delivery_at_threshold_has_no_hint_but_pays_fee() -> TestResult {
        let policy = DeliveryPolicy::standard(INR);
        let subtotal = Money::from_minor(10000, INR);

        assert_eq!(policy.remaining_for_free_delivery(&subtotal)?, None);
        assert_eq!(policy.fee_for(&subtotal)?, Money::from_minor(2000, INR));

        Ok(())
    }

    #[test]
    fn remaining_for_free_delivery_rejects_foreign_subtotal() {
        let policy = DeliveryPolicy::standard(INR);

        assert!(matches!(
            policy.remaining_for_free_delivery(&Money::from_minor(100, GBP)),
            Err(PricingError::Money(_))
        ));
    }

    #[test]
    fn custom_policy_rejects_mixed_currencies() {
        let result =
            DeliveryPolicy::new(Money::from_minor(1500, INR), Money::from_minor(1, GBP));

        assert!(matches!(result, Err(PricingError::Money(_))));
    }

    #[test]
    fn total_subtracts_discount_then_adds_delivery() -> TestResult {
        let total = compute_total(
            &Money::from_minor(4800, INR),
            &Money::from_minor(480, INR),
            &Money::from_minor(2000, INR),
        )?;

        assert_eq!(total, Money::from_minor(6320, INR));

        Ok(())
    }

    #[test]
    fn total_rejects_negative_components() {
        let result = compute_total(
            &Money::from_minor(4800, INR),
            &Money::from_minor(-1, INR),
            &Money::from_minor(2000, INR),
        );

        assert!(matches!(result, Err(PricingError::InvalidInput(_))));
    }

    #[test]
    fn total_rejects_discount_larger_than_subtotal() -> TestResult {
        let result = compute_total(
            &Money::from_minor(100, INR),
            &Money::from_minor(5000, INR),
            &Money::from_minor(0, INR),
        );

        assert!(
            matches!(result, Err(PricingError::InvalidInput(_))),
            "expected a rejected discount, got {result:?}"
        );

        // A discount of the whole subtotal is still allowed.
        let total = compute_total(
            &Money::from_minor(100, INR),
            &Money::from_minor(100, INR),
            &Money::from_minor(2000, INR),
        )?;

        assert_eq!(total, Money::from_minor(2000, INR));

        Ok(())
    }

    #[test]
    fn percentage_points_round_trip_for_display() -> TestResult {
        let percent = percentage_from_points(Decimal::from(10))?;

        assert_eq!(percent_points(&percent), Decimal::from(10));

        Ok(())
    }

    #[test]
    fn percentage_from_points_rejects_out_of_range() {
        assert!(
            percentage_from_points(Decimal::from(101)).is_err(),
            "101% should be rejected"
        );
        assert!(
            percentage_from_points(Decimal::from(-1)).is_err(),
            "-1% should be rejected"
        );
    }

    #[test]
    fn scale_minor_overflow_returns_error() {
        let result = scale_minor(i64::MAX, Decimal::from(2));

        assert!(matches!(result, Err(PricingError::InvalidInput(_))));
    }
}
