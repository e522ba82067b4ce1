//! CLI configuration

use std::path::PathBuf;

use clap::Args;
use milkrun::pricing::{DeliveryPolicy, PricingError};
use rust_decimal::{Decimal, prelude::ToPrimitive};
use rusty_money::{Money, iso::Currency};

/// Log output format.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    /// Compact, human-readable logs.
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Logging settings.
#[derive(Debug, Args)]
pub(crate) struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true, env = "RUST_LOG", default_value = "info")]
    pub(crate) log_level: String,

    /// Log format (compact, json)
    #[arg(
        long,
        global = true,
        env = "LOG_FORMAT",
        value_enum,
        default_value_t = LogFormat::Compact
    )]
    pub(crate) log_format: LogFormat,
}

/// Pricing and fixture settings.
#[derive(Debug, Args)]
pub(crate) struct PricingConfig {
    /// Directory holding the `products`, `carts` and `promo_codes` fixtures
    #[arg(long, global = true, env = "MILKRUN_FIXTURES", default_value = "./fixtures")]
    pub(crate) fixtures: PathBuf,

    /// Flat delivery fee, in major units
    #[arg(long, global = true, env = "MILKRUN_DELIVERY_FEE", default_value = "20")]
    pub(crate) delivery_fee: Decimal,

    /// Subtotal above which delivery is free, in major units
    #[arg(long, global = true, env = "MILKRUN_FREE_DELIVERY_OVER", default_value = "100")]
    pub(crate) free_delivery_over: Decimal,
}

impl PricingConfig {
    /// Delivery policy for carts priced in `currency`.
    pub(crate) fn delivery_policy(
        &self,
        currency: &'static Currency,
    ) -> Result<DeliveryPolicy<'static>, PricingError> {
        let fee = Money::from_minor(to_minor(self.delivery_fee)?, currency);
        let free_over = Money::from_minor(to_minor(self.free_delivery_over)?, currency);

        DeliveryPolicy::new(fee, free_over)
    }
}

fn to_minor(amount: Decimal) -> Result<i64, PricingError> {
    amount
        .checked_mul(Decimal::ONE_HUNDRED)
        .filter(|minor| minor.fract().is_zero())
        .and_then(|minor| minor.to_i64())
        .ok_or_else(|| PricingError::InvalidInput(format!("{amount} is not a whole minor amount")))
}
