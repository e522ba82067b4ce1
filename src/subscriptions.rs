//! Subscriptions
//!
//! Recurring delivery plans. A subscription is a plan cadence, a milk product and a daily quantity;
//! the monthly bill is `base price × daily quantity × deliveries per month`.
//!
//! Each plan also advertises a per-litre price and saving. Those figures are marketing copy only:
//! the bill is always computed from the product's base price.

use std::{fmt, str::FromStr};

use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use tracing::debug;

use crate::{
    pricing::{PricingError, ensure_non_negative, scale_minor},
    products::Unit,
    quotes::SubscriptionQuote,
};

/// Delivery cadence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubscriptionPlan {
    /// Every morning.
    Daily,

    /// Every other day.
    Alternate,

    /// Once a week, in bulk.
    Weekly,
}

impl SubscriptionPlan {
    /// Every plan, in display order.
    pub const ALL: [Self; 3] = [Self::Daily, Self::Alternate, Self::Weekly];

    /// Stable key used in configuration and on the command line.
    pub fn key(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Alternate => "alternate",
            Self::Weekly => "weekly",
        }
    }

    /// Deliveries billed per month.
    pub fn deliveries_per_month(self) -> u32 {
        match self {
            Self::Daily => 30,
            Self::Alternate => 15,
            Self::Weekly => 4,
        }
    }

    /// Display title.
    pub fn title(self) -> &'static str {
        match self {
            Self::Daily => "Daily Plan",
            Self::Alternate => "Alternate Day",
            Self::Weekly => "Weekly Bulk",
        }
    }

    /// One-line description.
    pub fn description(self) -> &'static str {
        match self {
            Self::Daily => "Delivered every morning",
            Self::Alternate => "Delivery on alternate days",
            Self::Weekly => "Once a week delivery",
        }
    }

    /// Whether the plan is highlighted as the most popular.
    pub fn is_popular(self) -> bool {
        matches!(self, Self::Daily)
    }

    /// Advertised price per litre. Display only; not used by [`compute_monthly_total`].
    pub fn advertised_price(self, currency: &Currency) -> Money<'_, Currency> {
        let minor = match self {
            Self::Daily => 5400,
            Self::Alternate => 5600,
            Self::Weekly => 5200,
        };

        Money::from_minor(minor, currency)
    }

    /// Advertised saving per litre. Display only.
    pub fn advertised_savings(self, currency: &Currency) -> Money<'_, Currency> {
        let minor = match self {
            Self::Daily | Self::Alternate => 0,
            Self::Weekly => 800,
        };

        Money::from_minor(minor, currency)
    }
}

impl fmt::Display for SubscriptionPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for SubscriptionPlan {
    type Err = PricingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();

        if wanted.is_empty() {
            return Err(PricingError::InvalidInput(
                "subscription plan must not be empty".to_string(),
            ));
        }

        Self::ALL
            .into_iter()
            .find(|plan| plan.key().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                PricingError::InvalidInput(format!("unknown subscription plan: {s:?}"))
            })
    }
}

/// A product that can be subscribed to.
#[derive(Debug, Clone, PartialEq)]
pub struct SubscriptionProduct<'a> {
    key: String,
    name: String,
    base_price: Money<'a, Currency>,
    unit: Unit,
}

impl<'a> SubscriptionProduct<'a> {
    /// Create a subscription product.
    ///
    /// # Errors
    ///
    /// - [`PricingError::InvalidInput`]: the key is blank or the base price is negative.
    pub fn new(
        key: impl Into<String>,
        name: impl Into<String>,
        base_price: Money<'a, Currency>,
        unit: Unit,
    ) -> Result<Self, PricingError> {
        let key = key.into();

        if key.trim().is_empty() {
            return Err(PricingError::InvalidInput(
                "subscription product key must not be empty".to_string(),
            ));
        }

        ensure_non_negative("base price", &base_price)?;

        Ok(Self {
            key,
            name: name.into(),
            base_price,
            unit,
        })
    }

    /// Catalog key
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Display name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Price per unit
    pub fn base_price(&self) -> Money<'a, Currency> {
        self.base_price
    }

    /// Unit of measure
    pub fn unit(&self) -> Unit {
        self.unit
    }
}

/// The products available on subscription.
#[derive(Debug, Clone)]
pub struct SubscriptionCatalog<'a> {
    products: Vec<SubscriptionProduct<'a>>,
}

impl<'a> SubscriptionCatalog<'a> {
    /// Cow, buffalo and toned milk.
    pub fn dairy(currency: &'a Currency) -> Self {
        let product = |key: &str, name: &str, minor: i64| SubscriptionProduct {
            key: key.to_string(),
            name: name.to_string(),
            base_price: Money::from_minor(minor, currency),
            unit: Unit::Litre,
        };

        Self {
            products: vec![
                product("cow-milk", "Fresh Cow Milk", 5400),
                product("buffalo-milk", "Buffalo Milk", 6200),
                product("toned-milk", "Toned Milk", 4800),
            ],
        }
    }

    /// Build a catalog from arbitrary products.
    ///
    /// # Errors
    ///
    /// - [`PricingError::InvalidInput`]: two products share a key.
    pub fn with_products(products: Vec<SubscriptionProduct<'a>>) -> Result<Self, PricingError> {
        for (idx, product) in products.iter().enumerate() {
            if products
                .iter()
                .skip(idx + 1)
                .any(|other| other.key.eq_ignore_ascii_case(&product.key))
            {
                return Err(PricingError::InvalidInput(format!(
                    "duplicate subscription product key: {}",
                    product.key
                )));
            }
        }

        Ok(Self { products })
    }

    /// Look a product up by key, ignoring case.
    ///
    /// # Errors
    ///
    /// - [`PricingError::InvalidInput`]: the key is empty or unknown.
    pub fn get(&self, key: &str) -> Result<&SubscriptionProduct<'a>, PricingError> {
        let wanted = key.trim();

        if wanted.is_empty() {
            return Err(PricingError::InvalidInput(
                "subscription product must not be empty".to_string(),
            ));
        }

        self.products
            .iter()
            .find(|product| product.key.eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                PricingError::InvalidInput(format!("unknown subscription product: {key:?}"))
            })
    }

    /// Iterate over the products in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &SubscriptionProduct<'a>> {
        self.products.iter()
    }

    /// Number of products.
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

/// Cost of one delivery: `base price × daily quantity`.
///
/// # Errors
///
/// - [`PricingError::InvalidInput`]: the quantity is negative or the result overflows.
pub fn compute_daily_cost<'a>(
    product: &SubscriptionProduct<'a>,
    daily_quantity: Decimal,
) -> Result<Money<'a, Currency>, PricingError> {
    ensure_valid_quantity(daily_quantity)?;

    let minor = scale_minor(product.base_price.to_minor_units(), daily_quantity)?;

    Ok(Money::from_minor(minor, product.base_price.currency()))
}

/// Monthly bill: `base price × daily quantity × deliveries per month`.
///
/// The plan's advertised price plays no part in this figure.
///
/// # Errors
///
/// - [`PricingError::InvalidInput`]: the quantity is negative or the result overflows.
pub fn compute_monthly_total<'a>(
    plan: SubscriptionPlan,
    product: &SubscriptionProduct<'a>,
    daily_quantity: Decimal,
) -> Result<Money<'a, Currency>, PricingError> {
    ensure_valid_quantity(daily_quantity)?;

    let factor = daily_quantity
        .checked_mul(Decimal::from(plan.deliveries_per_month()))
        .ok_or_else(|| {
            PricingError::InvalidInput(format!("daily quantity {daily_quantity} overflows"))
        })?;

    let minor = scale_minor(product.base_price.to_minor_units(), factor)?;

    Ok(Money::from_minor(minor, product.base_price.currency()))
}

/// Price a subscription.
///
/// # Errors
///
/// - [`PricingError::InvalidInput`]: the quantity is negative or the result overflows.
pub fn quote_subscription<'a>(
    plan: SubscriptionPlan,
    product: &SubscriptionProduct<'a>,
    daily_quantity: Decimal,
) -> Result<SubscriptionQuote<'a>, PricingError> {
    let daily_cost = compute_daily_cost(product, daily_quantity)?;
    let monthly_total = compute_monthly_total(plan, product, daily_quantity)?;

    debug!(
        plan = plan.key(),
        product = product.key(),
        %daily_quantity,
        %monthly_total,
        "quoted subscription"
    );

    Ok(SubscriptionQuote::new(
        daily_cost,
        plan.deliveries_per_month(),
        monthly_total,
    ))
}

fn ensure_valid_quantity(daily_quantity: Decimal) -> Result<(), PricingError> {
    if daily_quantity < Decimal::ZERO {
        return Err(PricingError::InvalidInput(format!(
            "daily quantity must not be negative, got {daily_quantity}"
        )));
    }

    Ok(())
}
