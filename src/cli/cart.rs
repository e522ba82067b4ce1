use std::io;

use clap::Args;
use milkrun::fixtures::Fixture;
use tracing::info;

use crate::cli::config::PricingConfig;

#[derive(Debug, Args)]
pub(crate) struct CartArgs {
    /// Cart fixture to load (from `<fixtures>/carts/<NAME>.yml`)
    #[arg(long, default_value = "dairy")]
    fixture: String,

    /// Product and promo code set to price against
    #[arg(long, default_value = "dairy")]
    catalog: String,

    /// Promo code to apply, replacing any code the fixture applies
    #[arg(long)]
    promo: Option<String>,

    /// Check the cart out instead of only quoting it
    #[arg(long)]
    checkout: bool,
}

pub(crate) fn run(args: CartArgs, pricing: &PricingConfig) -> Result<(), String> {
    let mut fixture = Fixture::with_base_path(&pricing.fixtures);

    fixture
        .load_products(&args.catalog)
        .and_then(|fixture| fixture.load_promo_codes(&args.catalog))
        .and_then(|fixture| fixture.load_cart(&args.fixture))
        .map_err(|error| format!("failed to load fixtures: {error}"))?;

    let currency = fixture.currency().map_err(|error| error.to_string())?;

    let policy = pricing
        .delivery_policy(currency)
        .map_err(|error| format!("invalid delivery settings: {error}"))?;

    let mut cart = fixture
        .cart()
        .and_then(|cart| Ok(cart.with_delivery_policy(policy)?))
        .map_err(|error| format!("failed to build cart: {error}"))?;

    if let Some(code) = &args.promo {
        cart.apply_promo_code(code)
            .map_err(|error| format!("promo code rejected: {error}"))?;
    }

    let items = cart.items().to_vec();
    let promo = cart.promo().map(|promo| promo.code.clone());

    let quote = if args.checkout {
        cart.checkout()
    } else {
        cart.quote()
    }
    .map_err(|error| format!("failed to price cart: {error}"))?;

    info!(
        fixture = %args.fixture,
        promo = ?promo,
        checkout = args.checkout,
        total = %quote.total(),
        "priced cart"
    );

    quote
        .write_to(io::stdout().lock(), &items)
        .map_err(|error| error.to_string())
}
