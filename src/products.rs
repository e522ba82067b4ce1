//! Products

use std::{fmt, str::FromStr};

use decimal_percentage::Percentage;
use rusty_money::{Money, iso::Currency};
use serde::Deserialize;
use slotmap::new_key_type;

use crate::pricing::PricingError;

new_key_type! {
    /// Product Key
    pub struct ProductKey;
}

/// Shelf a product is listed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Milk by the litre.
    Milk,

    /// Curd, paneer and other dairy.
    Dairy,

    /// Fresh produce.
    Fresh,
}

impl Category {
    /// Every category, in display order.
    pub const ALL: [Self; 3] = [Self::Milk, Self::Dairy, Self::Fresh];

    /// Display label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Milk => "Milk",
            Self::Dairy => "Dairy",
            Self::Fresh => "Fresh",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = PricingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();

        Self::ALL
            .into_iter()
            .find(|category| category.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| PricingError::InvalidInput(format!("unknown category: {s:?}")))
    }
}

/// Unit a product is sold by. Informational only; it never enters the arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum Unit {
    /// Litres.
    #[serde(rename = "L", alias = "litre")]
    Litre,

    /// Kilograms.
    #[serde(rename = "kg", alias = "kilogram")]
    Kilogram,

    /// Individual packs.
    #[serde(rename = "pack")]
    Pack,
}

impl Unit {
    /// Short label, as printed after a price (`₹54/L`).
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Litre => "L",
            Self::Kilogram => "kg",
            Self::Pack => "pack",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Product
#[derive(Debug, Clone, PartialEq)]
pub struct Product<'a> {
    /// Product name
    pub name: String,

    /// Shelf the product is listed under
    pub category: Category,

    /// Price per unit
    pub price: Money<'a, Currency>,

    /// Unit the price is quoted in
    pub unit: Unit,

    /// Short marketing description
    pub description: String,

    /// Whether the product can currently be ordered
    pub in_stock: bool,

    /// Fat content, when known
    pub fat: Option<Percentage>,

    /// Protein content, when known
    pub protein: Option<Percentage>,
}

impl<'a> Product<'a> {
    /// Create an in-stock product with no description or nutrition facts.
    pub fn new(
        name: impl Into<String>,
        category: Category,
        price: Money<'a, Currency>,
        unit: Unit,
    ) -> Self {
        Self {
            name: name.into(),
            category,
            price,
            unit,
            description: String::new(),
            in_stock: true,
            fat: None,
            protein: None,
        }
    }

    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set fat and protein content.
    #[must_use]
    pub fn with_nutrition(mut self, fat: Percentage, protein: Percentage) -> Self {
        self.fat = Some(fat);
        self.protein = Some(protein);
        self
    }

    /// Case-insensitive substring match on the product name.
    pub fn name_matches(&self, query: &str) -> bool {
        self.name.to_lowercase().contains(&query.trim().to_lowercase())
    }
}
