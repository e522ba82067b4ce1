//! Items

use rusty_money::{Money, iso::Currency};

use crate::{
    pricing::{PricingError, ensure_non_negative},
    products::{ProductKey, Unit},
};

/// One priced product in a cart.
#[derive(Clone, Debug, PartialEq)]
pub struct LineItem<'a> {
    product: ProductKey,
    name: String,
    unit_price: Money<'a, Currency>,
    quantity: u32,
    unit: Unit,
}

impl<'a> LineItem<'a> {
    /// Creates a new line item.
    ///
    /// # Errors
    ///
    /// - [`PricingError::InvalidInput`]: the unit price is negative.
    pub fn new(
        product: ProductKey,
        name: String,
        unit_price: Money<'a, Currency>,
        quantity: u32,
        unit: Unit,
    ) -> Result<Self, PricingError> {
        ensure_non_negative("unit price", &unit_price)?;

        Ok(Self {
            product,
            name,
            unit_price,
            quantity,
            unit,
        })
    }

    /// Returns the product key of the item
    pub fn product(&self) -> ProductKey {
        self.product
    }

    /// Returns the display name of the item
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the price of a single unit
    pub fn unit_price(&self) -> &Money<'a, Currency> {
        &self.unit_price
    }

    /// Returns the number of units
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Returns the unit of measure
    pub fn unit(&self) -> Unit {
        self.unit
    }

    /// Returns a copy of this line with a different quantity.
    #[must_use]
    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity;
        self
    }

    pub(crate) fn set_quantity(&mut self, quantity: u32) {
        self.quantity = quantity;
    }

    /// Unit price multiplied by quantity.
    ///
    /// # Errors
    ///
    /// - [`PricingError::InvalidInput`]: the product overflows.
    pub fn line_total(&self) -> Result<Money<'a, Currency>, PricingError> {
        let minor = self
            .unit_price
            .to_minor_units()
            .checked_mul(i64::from(self.quantity))
            .ok_or_else(|| {
                PricingError::InvalidInput(format!(
                    "line total for {} overflows ({} × {})",
                    self.name, self.unit_price, self.quantity
                ))
            })?;

        Ok(Money::from_minor(minor, self.unit_price.currency()))
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::INR;
    use testresult::TestResult;

    use super::*;

    fn milk(quantity: u32) -> Result<LineItem<'static>, PricingError> {
        LineItem::new(
            ProductKey::default(),
            "Fresh Cow Milk".to_string(),
            Money::from_minor(5400, INR),
            quantity,
            Unit::Litre,
        )
    }

    #[test]
    fn line_total_multiplies_price_by_quantity() -> TestResult {
        assert_eq!(milk(2)?.line_total()?, Money::from_minor(10800, INR));
        assert_eq!(milk(0)?.line_total()?, Money::from_minor(0, INR));

        Ok(())
    }

    #[test]
    fn negative_prices_are_rejected_at_construction() {
        let result = LineItem::new(
            ProductKey::default(),
            "Refund".to_string(),
            Money::from_minor(-1, INR),
            1,
            Unit::Pack,
        );

        assert!(matches!(result, Err(PricingError::InvalidInput(_))));
    }

    #[test]
    fn line_total_overflow_is_an_error() -> TestResult {
        let item = LineItem::new(
            ProductKey::default(),
            "Gold Milk".to_string(),
            Money::from_minor(i64::MAX, INR),
            2,
            Unit::Litre,
        )?;

        assert!(matches!(item.line_total(), Err(PricingError::InvalidInput(_))));

        Ok(())
    }

    #[test]
    fn accessors_return_constructor_values() -> TestResult {
        let item = milk(3)?;

        assert_eq!(item.name(), "Fresh Cow Milk");
        assert_eq!(item.unit_price(), &Money::from_minor(5400, INR));
        assert_eq!(item.quantity(), 3);
        assert_eq!(item.unit(), Unit::Litre);
        assert_eq!(item.with_quantity(5).quantity(), 5);

        Ok(())
    }
}
