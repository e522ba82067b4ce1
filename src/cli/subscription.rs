use std::io;

use clap::Args;
use milkrun::subscriptions::{SubscriptionCatalog, SubscriptionPlan, quote_subscription};
use rust_decimal::Decimal;
use rusty_money::iso::INR;
use tracing::info;

#[derive(Debug, Args)]
pub(crate) struct SubscriptionArgs {
    /// Delivery plan (daily, alternate, weekly)
    #[arg(long, default_value = "daily")]
    plan: SubscriptionPlan,

    /// Product key (cow-milk, buffalo-milk, toned-milk)
    #[arg(long, default_value = "cow-milk")]
    product: String,

    /// Litres per delivery
    #[arg(long, default_value = "1")]
    quantity: Decimal,
}

pub(crate) fn run(args: SubscriptionArgs) -> Result<(), String> {
    let catalog = SubscriptionCatalog::dairy(INR);

    let product = catalog
        .get(&args.product)
        .map_err(|error| error.to_string())?;

    let quote = quote_subscription(args.plan, product, args.quantity)
        .map_err(|error| format!("failed to price subscription: {error}"))?;

    info!(
        plan = %args.plan,
        product = product.key(),
        quantity = %args.quantity,
        monthly_total = %quote.monthly_total(),
        "priced subscription"
    );

    quote
        .write_to(io::stdout().lock(), args.plan, product, args.quantity)
        .map_err(|error| error.to_string())
}
