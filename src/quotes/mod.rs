//! Quotes
//!
//! A quote is the priced summary of a cart or a subscription. Quotes are derived values: they are
//! recomputed from their inputs on every change and never stored.

use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use tracing::debug;

use crate::{
    items::LineItem,
    pricing::{
        DeliveryPolicy, PricingError, compute_discount_amount, compute_subtotal, compute_total,
        percent_points,
    },
};

mod render;

pub use render::RenderError;

/// Priced summary of a cart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CartQuote<'a> {
    subtotal: Money<'a, Currency>,
    discount_percent: Percentage,
    discount_amount: Money<'a, Currency>,
    delivery_fee: Money<'a, Currency>,
    total: Money<'a, Currency>,
    remaining_for_free_delivery: Option<Money<'a, Currency>>,
}

impl<'a> CartQuote<'a> {
    /// Sum of line totals before discount and delivery
    pub fn subtotal(&self) -> Money<'a, Currency> {
        self.subtotal
    }

    /// Active promo discount, as a fraction
    pub fn discount_percent(&self) -> Percentage {
        self.discount_percent
    }

    /// Active promo discount in percent points (`10` for 10%)
    pub fn discount_points(&self) -> Decimal {
        percent_points(&self.discount_percent)
    }

    /// Amount taken off the subtotal
    pub fn discount_amount(&self) -> Money<'a, Currency> {
        self.discount_amount
    }

    /// Delivery charge; zero when delivery is free
    pub fn delivery_fee(&self) -> Money<'a, Currency> {
        self.delivery_fee
    }

    /// Amount payable
    pub fn total(&self) -> Money<'a, Currency> {
        self.total
    }

    /// Whether the order qualifies for free delivery
    pub fn has_free_delivery(&self) -> bool {
        self.delivery_fee.to_minor_units() == 0
    }

    /// Amount to add before delivery is free; `None` once the subtotal reaches the threshold
    pub fn remaining_for_free_delivery(&self) -> Option<Money<'a, Currency>> {
        self.remaining_for_free_delivery
    }
}

/// Price a cart under the standard delivery policy.
///
/// # Errors
///
/// Returns a [`PricingError`] if any input is invalid or the arithmetic fails.
pub fn quote_cart<'a>(
    items: &[LineItem<'a>],
    currency: &'a Currency,
    discount: Percentage,
) -> Result<CartQuote<'a>, PricingError> {
    quote_cart_with_policy(items, currency, discount, &DeliveryPolicy::standard(currency))
}

/// Price a cart under a specific delivery policy.
///
/// The steps always run in the same order: subtotal, discount on the subtotal, delivery fee on the
/// undiscounted subtotal, then `subtotal - discount + delivery`.
///
/// # Errors
///
/// Returns a [`PricingError`] if any input is invalid or the arithmetic fails.
pub fn quote_cart_with_policy<'a>(
    items: &[LineItem<'a>],
    currency: &'a Currency,
    discount: Percentage,
    policy: &DeliveryPolicy<'a>,
) -> Result<CartQuote<'a>, PricingError> {
    let subtotal = compute_subtotal(items, currency)?;
    let discount_amount = compute_discount_amount(&subtotal, &discount)?;
    let delivery_fee = policy.fee_for(&subtotal)?;
    let total = compute_total(&subtotal, &discount_amount, &delivery_fee)?;
    let remaining_for_free_delivery = policy.remaining_for_free_delivery(&subtotal)?;

    debug!(
        lines = items.len(),
        %subtotal,
        %discount_amount,
        %delivery_fee,
        %total,
        "quoted cart"
    );

    Ok(CartQuote {
        subtotal,
        discount_percent: discount,
        discount_amount,
        delivery_fee,
        total,
        remaining_for_free_delivery,
    })
}

/// Priced summary of a subscription.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubscriptionQuote<'a> {
    daily_cost: Money<'a, Currency>,
    deliveries_per_month: u32,
    monthly_total: Money<'a, Currency>,
}

impl<'a> SubscriptionQuote<'a> {
    pub(crate) fn new(
        daily_cost: Money<'a, Currency>,
        deliveries_per_month: u32,
        monthly_total: Money<'a, Currency>,
    ) -> Self {
        Self {
            daily_cost,
            deliveries_per_month,
            monthly_total,
        }
    }

    /// Cost of a single delivery
    pub fn daily_cost(&self) -> Money<'a, Currency> {
        self.daily_cost
    }

    /// Number of deliveries the monthly total covers
    pub fn deliveries_per_month(&self) -> u32 {
        self.deliveries_per_month
    }

    /// Amount billed per month
    pub fn monthly_total(&self) -> Money<'a, Currency> {
        self.monthly_total
    }
}
