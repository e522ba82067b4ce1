//! Catalog
//!
//! The shop's product list. Products are stored in a slot map and addressed by [`ProductKey`];
//! each product also has a stable string key (`cow-milk`) for lookups from the command line and
//! fixtures. Listing order is the order products were inserted in.

use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use rusty_money::{Money, iso::Currency};
use slotmap::SlotMap;
use thiserror::Error;

use crate::{
    items::LineItem,
    pricing::{PricingError, ensure_non_negative},
    products::{Category, Product, ProductKey, Unit},
};

/// Errors related to catalog lookups and edits.
#[derive(Debug, Error, PartialEq)]
pub enum CatalogError {
    /// No product has the given string key.
    #[error("unknown product: {0}")]
    UnknownProduct(String),

    /// The slot map key does not belong to this catalog.
    #[error("product {0:?} is not in the catalog")]
    UnknownKey(ProductKey),

    /// A product with the same string key is already listed.
    #[error("duplicate product key: {0}")]
    DuplicateProduct(String),

    /// The product exists but cannot currently be ordered.
    #[error("{0} is out of stock")]
    OutOfStock(String),

    /// A product is priced in a different currency from the catalog (product, catalog).
    #[error("product has currency {0}, but catalog has currency {1}")]
    CurrencyMismatch(&'static str, &'static str),

    /// Wrapped pricing error.
    #[error(transparent)]
    Pricing(#[from] PricingError),
}

/// Catalog
#[derive(Debug, Clone)]
pub struct Catalog<'a> {
    products: SlotMap<ProductKey, Product<'a>>,
    keys: FxHashMap<String, ProductKey>,
    order: Vec<(String, ProductKey)>,
    currency: &'static Currency,
}

impl<'a> Catalog<'a> {
    /// An empty catalog in the given currency.
    pub fn new(currency: &'static Currency) -> Self {
        Self {
            products: SlotMap::with_key(),
            keys: FxHashMap::default(),
            order: Vec::new(),
            currency,
        }
    }

    /// The five dairy products the shop sells.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if a built-in product fails validation.
    pub fn dairy(currency: &'static Currency) -> Result<Self, CatalogError> {
        let nutrition = |fat: i64, protein: i64| {
            (
                Percentage::from(Decimal::new(fat, 3)),
                Percentage::from(Decimal::new(protein, 3)),
            )
        };

        let listings = [
            (
                "cow-milk",
                "Fresh Cow Milk",
                Category::Milk,
                5400,
                Unit::Litre,
                "500ml, 1L pouches available",
                nutrition(35, 32),
            ),
            (
                "buffalo-milk",
                "Buffalo Milk",
                Category::Milk,
                6200,
                Unit::Litre,
                "Higher fat content, rich taste",
                nutrition(65, 41),
            ),
            (
                "dahi",
                "Dahi (Curd)",
                Category::Dairy,
                7000,
                Unit::Kilogram,
                "Prepared fresh daily",
                nutrition(40, 35),
            ),
            (
                "paneer",
                "Fresh Paneer",
                Category::Dairy,
                24000,
                Unit::Kilogram,
                "Handmade, soft texture",
                nutrition(200, 180),
            ),
            (
                "toned-milk",
                "Toned Milk",
                Category::Milk,
                4800,
                Unit::Litre,
                "Low fat, healthy option",
                nutrition(15, 30),
            ),
        ];

        let mut catalog = Self::new(currency);

        for (key, name, category, price, unit, description, (fat, protein)) in listings {
            let product = Product::new(name, category, Money::from_minor(price, currency), unit)
                .with_description(description)
                .with_nutrition(fat, protein);

            catalog.insert(key, product)?;
        }

        Ok(catalog)
    }

    /// List a product under a string key.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if the key is taken, the price is negative or in another
    /// currency.
    pub fn insert(&mut self, key: &str, product: Product<'a>) -> Result<ProductKey, CatalogError> {
        let key = key.trim().to_lowercase();

        if key.is_empty() {
            return Err(PricingError::InvalidInput("product key must not be blank".into()).into());
        }

        if self.keys.contains_key(&key) {
            return Err(CatalogError::DuplicateProduct(key));
        }

        let currency = product.price.currency();

        if currency != self.currency {
            return Err(CatalogError::CurrencyMismatch(
                currency.iso_alpha_code,
                self.currency.iso_alpha_code,
            ));
        }

        ensure_non_negative("product price", &product.price)?;

        let product_key = self.products.insert(product);

        self.keys.insert(key.clone(), product_key);
        self.order.push((key, product_key));

        Ok(product_key)
    }

    /// Products whose name contains `query` (ignoring case) and whose category matches.
    ///
    /// An empty query and a `None` category both match everything. Catalog order is kept.
    pub fn filter(
        &self,
        query: &str,
        category: Option<Category>,
    ) -> Vec<(ProductKey, &Product<'a>)> {
        self.iter()
            .filter(|(_, product)| category.is_none_or(|wanted| product.category == wanted))
            .filter(|(_, product)| product.name_matches(query))
            .collect()
    }

    /// Get a product by slot map key.
    pub fn get(&self, key: ProductKey) -> Option<&Product<'a>> {
        self.products.get(key)
    }

    /// Look up the slot map key for a string key such as `cow-milk`. Case-insensitive.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::UnknownProduct`] if nothing is listed under the key.
    pub fn find(&self, key: &str) -> Result<ProductKey, CatalogError> {
        self.keys
            .get(&key.trim().to_lowercase())
            .copied()
            .ok_or_else(|| CatalogError::UnknownProduct(key.trim().to_string()))
    }

    /// String key a product is listed under.
    pub fn slug(&self, key: ProductKey) -> Option<&str> {
        self.order
            .iter()
            .find(|(_, listed)| *listed == key)
            .map(|(slug, _)| slug.as_str())
    }

    /// Build a cart line for a product.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if the product is unknown or out of stock.
    pub fn line_item(&self, key: ProductKey, quantity: u32) -> Result<LineItem<'a>, CatalogError> {
        let product = self.get(key).ok_or(CatalogError::UnknownKey(key))?;

        if !product.in_stock {
            return Err(CatalogError::OutOfStock(product.name.clone()));
        }

        Ok(LineItem::new(
            key,
            product.name.clone(),
            product.price,
            quantity,
            product.unit,
        )?)
    }

    /// Mark a product as in or out of stock.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::UnknownKey`] if the product is not in the catalog.
    pub fn set_in_stock(&mut self, key: ProductKey, in_stock: bool) -> Result<(), CatalogError> {
        let product = self
            .products
            .get_mut(key)
            .ok_or(CatalogError::UnknownKey(key))?;

        product.in_stock = in_stock;

        Ok(())
    }

    /// Products in listing order.
    pub fn iter(&self) -> impl Iterator<Item = (ProductKey, &Product<'a>)> {
        self.order
            .iter()
            .filter_map(|&(_, key)| self.products.get(key).map(|product| (key, product)))
    }

    /// Number of products.
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether the catalog lists nothing.
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Currency every product is priced in.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::{GBP, INR};
    use testresult::TestResult;

    use super::*;

    fn names<'c>(products: &[(ProductKey, &'c Product<'_>)]) -> Vec<&'c str> {
        products
            .iter()
            .map(|(_, product)| product.name.as_str())
            .collect()
    }

    #[test]
    fn dairy_catalog_lists_five_products_in_order() -> TestResult {
        let catalog = Catalog::dairy(INR)?;
        let all = catalog.filter("", None);

        assert_eq!(catalog.len(), 5);
        assert_eq!(
            names(&all),
            vec![
                "Fresh Cow Milk",
                "Buffalo Milk",
                "Dahi (Curd)",
                "Fresh Paneer",
                "Toned Milk"
            ]
        );

        Ok(())
    }

    #[test]
    fn filter_by_category() -> TestResult {
        let catalog = Catalog::dairy(INR)?;

        let dairy = catalog.filter("", Some(Category::Dairy));
        let fresh = catalog.filter("", Some(Category::Fresh));

        assert_eq!(names(&dairy), vec!["Dahi (Curd)", "Fresh Paneer"]);
        assert!(fresh.is_empty(), "no fresh produce is stocked");

        Ok(())
    }

    #[test]
    fn filter_by_query_and_category() -> TestResult {
        let catalog = Catalog::dairy(INR)?;

        let fresh_things = catalog.filter("FRESH", None);
        let fresh_milk = catalog.filter("fresh", Some(Category::Milk));

        assert_eq!(names(&fresh_things), vec!["Fresh Cow Milk", "Fresh Paneer"]);
        assert_eq!(names(&fresh_milk), vec!["Fresh Cow Milk"]);

        Ok(())
    }

    #[test]
    fn find_and_line_item() -> TestResult {
        let catalog = Catalog::dairy(INR)?;
        let key = catalog.find(" Paneer ")?;
        let line = catalog.line_item(key, 2)?;

        assert_eq!(catalog.slug(key), Some("paneer"));
        assert_eq!(line.name(), "Fresh Paneer");
        assert_eq!(line.unit(), Unit::Kilogram);
        assert_eq!(line.line_total()?, Money::from_minor(48000, INR));

        Ok(())
    }

    #[test]
    fn dairy_products_carry_nutrition() -> TestResult {
        let catalog = Catalog::dairy(INR)?;
        let buffalo = catalog.get(catalog.find("buffalo-milk")?).ok_or("missing")?;

        assert_eq!(buffalo.fat, Some(Percentage::from(Decimal::new(65, 3))));
        assert_eq!(buffalo.protein, Some(Percentage::from(Decimal::new(41, 3))));
        assert_eq!(buffalo.description, "Higher fat content, rich taste");

        Ok(())
    }

    #[test]
    fn unknown_products_are_reported() -> TestResult {
        let catalog = Catalog::dairy(INR)?;

        assert_eq!(
            catalog.find("ghee"),
            Err(CatalogError::UnknownProduct("ghee".to_string()))
        );

        Ok(())
    }

    #[test]
    fn out_of_stock_products_cannot_be_ordered() -> TestResult {
        let mut catalog = Catalog::dairy(INR)?;
        let key = catalog.find("dahi")?;

        catalog.set_in_stock(key, false)?;

        assert_eq!(
            catalog.line_item(key, 1),
            Err(CatalogError::OutOfStock("Dahi (Curd)".to_string()))
        );

        Ok(())
    }

    #[test]
    fn insert_rejects_duplicates_and_foreign_currency() -> TestResult {
        let mut catalog = Catalog::dairy(INR)?;

        let ghee = Product::new(
            "Desi Ghee",
            Category::Dairy,
            Money::from_minor(65000, INR),
            Unit::Kilogram,
        );

        assert_eq!(
            catalog.insert("cow-milk", ghee.clone()),
            Err(CatalogError::DuplicateProduct("cow-milk".to_string()))
        );

        let imported = Product::new(
            "Cheddar",
            Category::Dairy,
            Money::from_minor(500, GBP),
            Unit::Pack,
        );

        assert_eq!(
            catalog.insert("cheddar", imported),
            Err(CatalogError::CurrencyMismatch("GBP", "INR"))
        );

        catalog.insert("ghee", ghee)?;
        assert_eq!(catalog.len(), 6);

        Ok(())
    }
}
