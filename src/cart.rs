//! Cart
//!
//! The cart is an ordered mapping from product key to line item. Lines keep the order they were
//! first added in, a product appears at most once, and a line whose quantity drops to zero is
//! removed rather than kept at zero.

use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use rusty_money::iso::Currency;
use thiserror::Error;
use tracing::debug;

use crate::{
    items::LineItem,
    pricing::{DeliveryPolicy, PricingError},
    products::ProductKey,
    promotions::PromoCodes,
    quotes::{CartQuote, quote_cart_with_policy},
};

/// Errors related to cart edits or checkout.
#[derive(Debug, Error, PartialEq)]
pub enum CartError {
    /// Checkout was attempted with nothing in the cart.
    #[error("cart is empty")]
    EmptyCart,

    /// The product is not in the cart.
    #[error("product {0:?} is not in the cart")]
    UnknownProduct(ProductKey),

    /// An item's currency differs from the cart currency (item currency, cart currency).
    #[error("item has currency {0}, but cart has currency {1}")]
    CurrencyMismatch(&'static str, &'static str),

    /// The product is already in the cart under a different price or name.
    #[error("product {0:?} is already in the cart with a different price or name")]
    LineMismatch(ProductKey),

    /// Quantity arithmetic overflowed.
    #[error("quantity overflow for product {0:?}")]
    QuantityOverflow(ProductKey),

    /// Wrapped pricing error.
    #[error(transparent)]
    Pricing(#[from] PricingError),
}

/// The promo code currently applied to a cart.
#[derive(Debug, Clone, PartialEq)]
pub struct AppliedPromo {
    /// Code as the customer typed it, trimmed
    pub code: String,

    /// Discount it grants
    pub discount: Percentage,
}

/// Cart
#[derive(Debug, Clone)]
pub struct Cart<'a> {
    lines: Vec<LineItem<'a>>,
    currency: &'static Currency,
    promo_codes: PromoCodes,
    promo: Option<AppliedPromo>,
    delivery: DeliveryPolicy<'a>,
}

impl<'a> Cart<'a> {
    /// Create an empty cart using the standard promo codes and delivery policy.
    pub fn new(currency: &'static Currency) -> Self {
        Cart {
            lines: Vec::new(),
            currency,
            promo_codes: PromoCodes::standard(),
            promo: None,
            delivery: DeliveryPolicy::standard(currency),
        }
    }

    /// Create a cart holding the given items.
    ///
    /// Items for the same product are merged, and zero-quantity items are dropped.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] if an item is in a different currency or a quantity overflows.
    pub fn with_items(
        items: impl IntoIterator<Item = LineItem<'a>>,
        currency: &'static Currency,
    ) -> Result<Self, CartError> {
        let mut cart = Self::new(currency);

        for item in items {
            cart.add(item)?;
        }

        Ok(cart)
    }

    /// Replace the promo code table. Any applied promo is cleared.
    #[must_use]
    pub fn with_promo_codes(mut self, promo_codes: PromoCodes) -> Self {
        self.promo_codes = promo_codes;
        self.promo = None;
        self
    }

    /// Replace the delivery policy.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::CurrencyMismatch`] if the policy uses a different currency.
    pub fn with_delivery_policy(mut self, delivery: DeliveryPolicy<'a>) -> Result<Self, CartError> {
        self.ensure_currency(delivery.fee().currency())?;
        self.delivery = delivery;

        Ok(self)
    }

    /// Add an item, merging its quantity into an existing line for the same product.
    ///
    /// Only items with the same unit price and name as the existing line are merged.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] if the item is in a different currency, disagrees with the existing
    /// line on price or name, or the merged quantity overflows.
    pub fn add(&mut self, item: LineItem<'a>) -> Result<(), CartError> {
        self.ensure_currency(item.unit_price().currency())?;

        let key = item.product();

        if let Some(line) = self.line_mut(key) {
            if line.unit_price() != item.unit_price() || line.name() != item.name() {
                return Err(CartError::LineMismatch(key));
            }

            let quantity = line
                .quantity()
                .checked_add(item.quantity())
                .ok_or(CartError::QuantityOverflow(key))?;

            line.set_quantity(quantity);
        } else if item.quantity() > 0 {
            self.lines.push(item);
        }

        debug!(?key, quantity = self.quantity_of(key), "added to cart");

        Ok(())
    }

    /// Add one more unit of a product already in the cart.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] if the product is not in the cart or the quantity overflows.
    pub fn increment(&mut self, key: ProductKey) -> Result<u32, CartError> {
        let line = self.line_mut(key).ok_or(CartError::UnknownProduct(key))?;

        let quantity = line
            .quantity()
            .checked_add(1)
            .ok_or(CartError::QuantityOverflow(key))?;

        line.set_quantity(quantity);

        Ok(quantity)
    }

    /// Take one unit of a product out of the cart, removing the line when none are left.
    ///
    /// Returns the remaining quantity.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::UnknownProduct`] if the product is not in the cart.
    pub fn remove_one(&mut self, key: ProductKey) -> Result<u32, CartError> {
        let current = self.quantity_of(key);

        if current == 0 {
            return Err(CartError::UnknownProduct(key));
        }

        self.set_quantity(key, current - 1)?;

        Ok(current - 1)
    }

    /// Overwrite the quantity of a line. A quantity of zero removes it.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::UnknownProduct`] if the product is not in the cart.
    pub fn set_quantity(&mut self, key: ProductKey, quantity: u32) -> Result<(), CartError> {
        if quantity == 0 {
            return self.remove(key).map(|_removed| ());
        }

        let line = self.line_mut(key).ok_or(CartError::UnknownProduct(key))?;
        line.set_quantity(quantity);

        Ok(())
    }

    /// Remove a line entirely.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::UnknownProduct`] if the product is not in the cart.
    pub fn remove(&mut self, key: ProductKey) -> Result<LineItem<'a>, CartError> {
        let idx = self
            .lines
            .iter()
            .position(|line| line.product() == key)
            .ok_or(CartError::UnknownProduct(key))?;

        debug!(?key, "removed from cart");

        Ok(self.lines.remove(idx))
    }

    /// Apply a promo code, replacing any code already applied.
    ///
    /// An unrecognised code is rejected and leaves the current discount untouched.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::InvalidPromoCode`] (wrapped) if the code is not recognised.
    pub fn apply_promo_code(&mut self, code: &str) -> Result<Percentage, CartError> {
        let discount = self.promo_codes.apply(code)?;

        self.promo = Some(AppliedPromo {
            code: code.trim().to_string(),
            discount,
        });

        Ok(discount)
    }

    /// Remove the applied promo code, if any.
    pub fn clear_promo_code(&mut self) -> Option<AppliedPromo> {
        self.promo.take()
    }

    /// The applied promo code, if any.
    pub fn promo(&self) -> Option<&AppliedPromo> {
        self.promo.as_ref()
    }

    /// Discount currently in effect; zero without a promo code.
    pub fn discount(&self) -> Percentage {
        self.promo
            .as_ref()
            .map_or_else(|| Percentage::from(Decimal::ZERO), |promo| promo.discount)
    }

    /// Price the cart as it stands.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] if the arithmetic fails.
    pub fn quote(&self) -> Result<CartQuote<'a>, CartError> {
        Ok(quote_cart_with_policy(
            &self.lines,
            self.currency,
            self.discount(),
            &self.delivery,
        )?)
    }

    /// Price the cart for the last time and empty it.
    ///
    /// The applied promo code is consumed along with the lines.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::EmptyCart`] if there is nothing to check out, or any pricing error.
    pub fn checkout(&mut self) -> Result<CartQuote<'a>, CartError> {
        if self.is_empty() {
            return Err(CartError::EmptyCart);
        }

        let quote = self.quote()?;

        debug!(
            lines = self.len(),
            units = self.item_count(),
            total = %quote.total(),
            "checked out cart"
        );

        self.lines.clear();
        self.promo = None;

        Ok(quote)
    }

    /// The line for a product, if present.
    pub fn get(&self, key: ProductKey) -> Option<&LineItem<'a>> {
        self.lines.iter().find(|line| line.product() == key)
    }

    /// Quantity of a product in the cart; zero when absent.
    pub fn quantity_of(&self, key: ProductKey) -> u32 {
        self.get(key).map_or(0, LineItem::quantity)
    }

    /// Lines in the order they were added.
    pub fn items(&self) -> &[LineItem<'a>] {
        &self.lines
    }

    /// Total units across all lines.
    pub fn item_count(&self) -> u64 {
        self.lines
            .iter()
            .map(|line| u64::from(line.quantity()))
            .sum()
    }

    /// Get the number of lines in the cart.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Check if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Get the currency of the cart.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Delivery policy used when quoting.
    pub fn delivery_policy(&self) -> &DeliveryPolicy<'a> {
        &self.delivery
    }

    fn line_mut(&mut self, key: ProductKey) -> Option<&mut LineItem<'a>> {
        self.lines.iter_mut().find(|line| line.product() == key)
    }

    fn ensure_currency(&self, currency: &Currency) -> Result<(), CartError> {
        if currency == self.currency {
            Ok(())
        } else {
            Err(CartError::CurrencyMismatch(
                currency.iso_alpha_code,
                self.currency.iso_alpha_code,
            ))
        }
    }
}
