//! Fixtures
//!
//! YAML files under `<base>/<kind>/<name>.yml`, where `kind` is `products`, `carts` or
//! `promo_codes`. A fixture set is the three files sharing a name.

use std::{
    fs,
    path::{Path, PathBuf},
};

use rusty_money::iso::Currency;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

use crate::{
    cart::{Cart, CartError},
    catalog::{Catalog, CatalogError},
    fixtures::{carts::CartFixture, products::ProductsFixture, promo_codes::PromoCodesFixture},
    pricing::PricingError,
    products::{Product, ProductKey},
    promotions::PromoCodes,
};

pub mod carts;
pub mod products;
pub mod promo_codes;

/// Directory fixtures are read from when no other is given.
pub const DEFAULT_FIXTURES_DIR: &str = "./fixtures";

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file {path}: {source}")]
    Io {
        /// File that could not be read
        path: PathBuf,

        /// Underlying error
        source: std::io::Error,
    },

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Invalid percentage format
    #[error("Invalid percentage format: {0}")]
    InvalidPercentage(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Product not found
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Currency mismatch between products
    #[error("Currency mismatch: expected {0}, found {1}")]
    CurrencyMismatch(String, String),

    /// No products loaded yet
    #[error("No products loaded yet; currency unknown")]
    NoCurrency,

    /// No cart loaded
    #[error("No cart loaded")]
    NoCart,

    /// Catalog error
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Cart creation error
    #[error("Failed to create cart: {0}")]
    Cart(#[from] CartError),

    /// Pricing error
    #[error(transparent)]
    Pricing(#[from] PricingError),
}

/// Fixture
#[derive(Debug)]
pub struct Fixture<'a> {
    /// Base path for fixture files
    base_path: PathBuf,

    /// Products loaded so far; created with the currency of the first product
    catalog: Option<Catalog<'a>>,

    /// Cart lines, referencing catalog products
    cart_lines: Vec<(ProductKey, u32)>,

    /// Promo code the cart fixture applies
    cart_promo: Option<String>,

    /// Whether a cart fixture has been loaded
    cart_loaded: bool,

    /// Promo code table; the standard codes unless a fixture replaces them
    promo_codes: PromoCodes,
}

impl<'a> Fixture<'a> {
    /// Create a new empty fixture with default base path
    pub fn new() -> Self {
        Self::with_base_path(DEFAULT_FIXTURES_DIR)
    }

    /// Create a new empty fixture with custom base path
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            catalog: None,
            cart_lines: Vec::new(),
            cart_promo: None,
            cart_loaded: false,
            promo_codes: PromoCodes::standard(),
        }
    }

    /// Load products from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or if there are currency mismatches.
    pub fn load_products(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let fixture: ProductsFixture = self.read("products", name)?;

        for product_fixture in fixture.products {
            // Parse to get currency first (before creating Product)
            let (_minor_units, currency) = products::parse_price(&product_fixture.price)?;

            let key = product_fixture.key.clone();
            let product: Product<'a> = product_fixture.try_into()?;

            let catalog = self
                .catalog
                .get_or_insert_with(|| Catalog::new(currency));

            if catalog.currency() != currency {
                return Err(FixtureError::CurrencyMismatch(
                    catalog.currency().iso_alpha_code.to_string(),
                    currency.iso_alpha_code.to_string(),
                ));
            }

            catalog.insert(&key, product)?;
        }

        debug!(
            name,
            products = self.catalog.as_ref().map_or(0, Catalog::len),
            "loaded products"
        );

        Ok(self)
    }

    /// Load a cart from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or if referenced products don't exist.
    pub fn load_cart(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let fixture: CartFixture = self.read("carts", name)?;
        let catalog = self.catalog.as_ref().ok_or(FixtureError::NoCurrency)?;

        let lines = fixture
            .items
            .into_iter()
            .map(|line| {
                catalog
                    .find(&line.product)
                    .map(|key| (key, line.quantity))
                    .map_err(|_err| FixtureError::ProductNotFound(line.product))
            })
            .collect::<Result<Vec<_>, _>>()?;

        self.cart_lines = lines;
        self.cart_promo = fixture.promo;
        self.cart_loaded = true;

        Ok(self)
    }

    /// Load promo codes from a YAML fixture file, replacing the current table
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or a discount is invalid.
    pub fn load_promo_codes(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let fixture: PromoCodesFixture = self.read("promo_codes", name)?;

        self.promo_codes = fixture.try_into()?;

        Ok(self)
    }

    /// Load a complete fixture set (products, cart, and promo codes with the same name)
    ///
    /// # Errors
    ///
    /// Returns an error if any of the fixture files cannot be loaded.
    pub fn load_set(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        self.load_products(name)?
            .load_promo_codes(name)?
            .load_cart(name)
    }

    /// Load a complete fixture set from the default base path
    ///
    /// # Errors
    ///
    /// Returns an error if any of the fixture files cannot be loaded.
    pub fn from_set(name: &str) -> Result<Self, FixtureError> {
        let mut fixture = Self::new();

        fixture.load_set(name)?;

        Ok(fixture)
    }

    /// Get the loaded catalog
    ///
    /// # Errors
    ///
    /// Returns an error if no products have been loaded yet.
    pub fn catalog(&self) -> Result<&Catalog<'a>, FixtureError> {
        self.catalog.as_ref().ok_or(FixtureError::NoCurrency)
    }

    /// Get a product by its string key
    ///
    /// # Errors
    ///
    /// Returns an error if the product is not found.
    pub fn product(&self, key: &str) -> Result<&Product<'a>, FixtureError> {
        let product_key = self.product_key(key)?;

        self.catalog()?
            .get(product_key)
            .ok_or_else(|| FixtureError::ProductNotFound(key.to_string()))
    }

    /// Get a product key by its string key
    ///
    /// # Errors
    ///
    /// Returns an error if the product is not found.
    pub fn product_key(&self, key: &str) -> Result<ProductKey, FixtureError> {
        self.catalog
            .as_ref()
            .and_then(|catalog| catalog.find(key).ok())
            .ok_or_else(|| FixtureError::ProductNotFound(key.to_string()))
    }

    /// Get the promo code table
    pub fn promo_codes(&self) -> &PromoCodes {
        &self.promo_codes
    }

    /// Create a cart from the loaded cart fixture, with its promo code applied
    ///
    /// # Errors
    ///
    /// Returns an error if no cart is loaded, a product cannot be ordered, or the promo code is
    /// rejected.
    pub fn cart(&self) -> Result<Cart<'a>, FixtureError> {
        if !self.cart_loaded {
            return Err(FixtureError::NoCart);
        }

        let catalog = self.catalog()?;

        let items = self
            .cart_lines
            .iter()
            .map(|&(key, quantity)| catalog.line_item(key, quantity))
            .collect::<Result<Vec<_>, _>>()?;

        let mut cart = Cart::with_items(items, catalog.currency())?
            .with_promo_codes(self.promo_codes.clone());

        if let Some(code) = &self.cart_promo {
            cart.apply_promo_code(code)?;
        }

        Ok(cart)
    }

    /// Get the currency
    ///
    /// # Errors
    ///
    /// Returns an error if no products have been loaded yet.
    pub fn currency(&self) -> Result<&'static Currency, FixtureError> {
        self.catalog().map(Catalog::currency)
    }

    /// Base path fixtures are read from
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn read<T: DeserializeOwned>(&self, kind: &str, name: &str) -> Result<T, FixtureError> {
        let path = self.base_path.join(kind).join(format!("{name}.yml"));

        let contents = fs::read_to_string(&path).map_err(|source| FixtureError::Io {
            path: path.clone(),
            source,
        })?;

        Ok(serde_norway::from_str(&contents)?)
    }
}

impl Default for Fixture<'_> {
    fn default() -> Self {
        Self::new()
    }
}
