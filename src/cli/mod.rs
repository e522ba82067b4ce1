use clap::{Parser, Subcommand};

use crate::cli::config::{LoggingConfig, PricingConfig};

mod cart;
pub(crate) mod config;
pub(crate) mod logging;
mod orders;
mod products;
mod subscription;

#[derive(Debug, Parser)]
#[command(
    name = "milkrun",
    about = "Price carts and milk subscriptions",
    long_about = None
)]
pub(crate) struct Cli {
    /// Logging output settings.
    #[command(flatten)]
    pub(crate) logging: LoggingConfig,

    /// Delivery pricing and fixture settings.
    #[command(flatten)]
    pub(crate) pricing: PricingConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Price a cart loaded from a fixture
    Cart(cart::CartArgs),

    /// Price a monthly subscription
    Subscription(subscription::SubscriptionArgs),

    /// List catalog products
    Products(products::ProductsArgs),

    /// List past orders
    Orders(orders::OrdersArgs),
}

impl Cli {
    pub(crate) fn run(self) -> Result<(), String> {
        match self.command {
            Commands::Cart(args) => cart::run(args, &self.pricing),
            Commands::Subscription(args) => subscription::run(args),
            Commands::Products(args) => products::run(args, &self.pricing),
            Commands::Orders(args) => orders::run(args),
        }
    }
}
