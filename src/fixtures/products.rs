//! Product Fixtures

use decimal_percentage::Percentage;
use rust_decimal::{Decimal, prelude::ToPrimitive};
use rusty_money::{
    Money,
    iso::{Currency, EUR, GBP, INR, USD},
};
use serde::Deserialize;

use crate::{
    fixtures::FixtureError,
    products::{Category, Product, Unit},
};

/// Wrapper for products in YAML
#[derive(Debug, Deserialize)]
pub struct ProductsFixture {
    /// Products in listing order
    pub products: Vec<ProductFixture>,
}

/// Product Fixture
#[derive(Debug, Deserialize)]
pub struct ProductFixture {
    /// String key used by cart fixtures and the command line (e.g. `cow-milk`)
    pub key: String,

    /// Product name
    pub name: String,

    /// Shelf the product is listed under
    pub category: Category,

    /// Product price per unit (e.g. "54 INR")
    pub price: String,

    /// Unit the price is quoted in
    pub unit: Unit,

    /// Short description
    #[serde(default)]
    pub description: String,

    /// Whether the product can be ordered
    #[serde(default = "in_stock_by_default")]
    pub in_stock: bool,

    /// Fat content (e.g. "3.5%")
    #[serde(default)]
    pub fat: Option<String>,

    /// Protein content (e.g. "3.2%")
    #[serde(default)]
    pub protein: Option<String>,
}

fn in_stock_by_default() -> bool {
    true
}

impl TryFrom<ProductFixture> for Product<'_> {
    type Error = FixtureError;

    fn try_from(fixture: ProductFixture) -> Result<Self, Self::Error> {
        let (minor_units, currency) = parse_price(&fixture.price)?;
        let price = Money::from_minor(minor_units, currency);

        let fat = fixture.fat.as_deref().map(parse_percentage).transpose()?;
        let protein = fixture.protein.as_deref().map(parse_percentage).transpose()?;

        Ok(Product {
            name: fixture.name,
            category: fixture.category,
            price,
            unit: fixture.unit,
            description: fixture.description,
            in_stock: fixture.in_stock,
            fat,
            protein,
        })
    }
}

/// Parse price string (e.g., "54 INR" or "2.99 GBP") into minor units and currency
///
/// # Errors
///
/// Returns an error if the string is not in the format "AMOUNT CURRENCY",
/// if the amount cannot be parsed as a decimal, or if the currency code
/// is not recognized.
pub fn parse_price(s: &str) -> Result<(i64, &'static Currency), FixtureError> {
    let parts: Vec<&str> = s.split_whitespace().collect();

    let [amount, currency_code] = parts.as_slice() else {
        return Err(FixtureError::InvalidPrice(format!(
            "Expected format 'AMOUNT CURRENCY', got: {s}"
        )));
    };

    let amount = amount
        .parse::<Decimal>()
        .map_err(|_err| FixtureError::InvalidPrice(s.to_string()))?;

    let minor_units = amount
        .checked_mul(Decimal::ONE_HUNDRED)
        .filter(|value| value.fract().is_zero())
        .and_then(|value| value.to_i64())
        .ok_or_else(|| FixtureError::InvalidPrice(s.to_string()))?;

    let currency = match *currency_code {
        "INR" => INR,
        "GBP" => GBP,
        "USD" => USD,
        "EUR" => EUR,
        other => return Err(FixtureError::UnknownCurrency(other.to_string())),
    };

    Ok((minor_units, currency))
}

/// Parse percentage string (e.g., "10%" or "0.10") into a `Percentage`
///
/// Accepts two formats:
/// - Percentage format: "10%" for 10%
/// - Decimal format: "0.10" for 10%
///
/// # Errors
///
/// Returns an error if the string cannot be parsed or the value lies outside 0–100%.
pub fn parse_percentage(s: &str) -> Result<Percentage, FixtureError> {
    let trimmed = s.trim();
    let invalid = || FixtureError::InvalidPercentage(s.to_string());

    let fraction = if let Some(percent_str) = trimmed.strip_suffix('%') {
        percent_str
            .trim()
            .parse::<Decimal>()
            .map_err(|_err| invalid())?
            .checked_div(Decimal::ONE_HUNDRED)
            .ok_or_else(invalid)?
    } else {
        trimmed.parse::<Decimal>().map_err(|_err| invalid())?
    };

    if fraction < Decimal::ZERO || fraction > Decimal::ONE {
        return Err(invalid());
    }

    Ok(Percentage::from(fraction))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_price_reads_rupees() -> Result<(), FixtureError> {
        let (minor, currency) = parse_price("54 INR")?;

        assert_eq!(minor, 5400);
        assert_eq!(currency, INR);

        Ok(())
    }

    #[test]
    fn parse_price_rejects_invalid_format() {
        let result = parse_price("54INR");

        assert!(matches!(result, Err(FixtureError::InvalidPrice(_))));
    }

    #[test]
    fn parse_price_rejects_fractions_of_a_paisa() {
        let result = parse_price("54.005 INR");

        assert!(matches!(result, Err(FixtureError::InvalidPrice(_))));
    }

    #[test]
    fn parse_price_rejects_unknown_currency() {
        let result = parse_price("2.99 ABC");

        assert!(matches!(result, Err(FixtureError::UnknownCurrency(code)) if code == "ABC"));
    }

    #[test]
    fn parse_price_accepts_other_currencies() -> Result<(), FixtureError> {
        let (usd_minor, usd) = parse_price("1.00 USD")?;
        let (gbp_minor, gbp) = parse_price("2.50 GBP")?;

        assert_eq!(usd_minor, 100);
        assert_eq!(usd, USD);
        assert_eq!(gbp_minor, 250);
        assert_eq!(gbp, GBP);

        Ok(())
    }

    #[test]
    fn parse_percentage_accepts_both_formats() -> Result<(), FixtureError> {
        assert_eq!(parse_percentage("10%")?, Percentage::from(Decimal::new(10, 2)));
        assert_eq!(parse_percentage("0.10")?, Percentage::from(Decimal::new(10, 2)));
        assert_eq!(parse_percentage("  3.5% ")?, Percentage::from(Decimal::new(35, 3)));
        assert_eq!(parse_percentage("100%")?, Percentage::from(Decimal::ONE));

        Ok(())
    }

    #[test]
    fn parse_percentage_rejects_invalid_values() {
        for input in ["invalid", "150%", "-5%", "1.5"] {
            assert!(
                matches!(parse_percentage(input), Err(FixtureError::InvalidPercentage(_))),
                "{input} should be rejected"
            );
        }
    }
}
