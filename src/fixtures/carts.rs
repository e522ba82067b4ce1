//! Cart Fixtures

use serde::Deserialize;

/// Wrapper for a cart in YAML
#[derive(Debug, Deserialize)]
pub struct CartFixture {
    /// Lines in the order they are added to the cart
    pub items: Vec<CartLineFixture>,

    /// Promo code to apply after the items are added
    #[serde(default)]
    pub promo: Option<String>,
}

/// One cart line, referencing a product by its string key
#[derive(Debug, Deserialize)]
pub struct CartLineFixture {
    /// Product key (e.g. `cow-milk`)
    pub product: String,

    /// Number of units
    #[serde(default = "one")]
    pub quantity: u32,
}

fn one() -> u32 {
    1
}
