//! Plain-text rendering of quotes.

use std::io;

use rust_decimal::Decimal;
use tabled::{
    builder::Builder,
    settings::{
        Alignment, Color, Style,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    items::LineItem,
    pricing::PricingError,
    quotes::{CartQuote, SubscriptionQuote},
    subscriptions::{SubscriptionPlan, SubscriptionProduct},
};

/// Errors that can occur while writing a quote.
#[derive(Debug, Error)]
pub enum RenderError {
    /// A line total could not be calculated.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// Writing to the output failed.
    #[error("failed to write quote: {0}")]
    Io(#[from] io::Error),
}

impl CartQuote<'_> {
    /// Writes the cart lines and the order summary as a table.
    ///
    /// # Errors
    ///
    /// Returns a [`RenderError`] if a line total cannot be calculated or the output fails.
    pub fn write_to(
        &self,
        mut out: impl io::Write,
        items: &[LineItem<'_>],
    ) -> Result<(), RenderError> {
        let mut builder = Builder::default();

        builder.push_record(["", "Item", "Price", "Qty", "Line Total"]);

        for (idx, item) in items.iter().enumerate() {
            builder.push_record([
                format!("#{:<3}", idx + 1),
                item.name().to_string(),
                format!("{}/{}", item.unit_price(), item.unit()),
                item.quantity().to_string(),
                item.line_total()?.to_string(),
            ]);
        }

        let mut table = builder.build();

        table.with(Style::modern_rounded());
        table.modify(Rows::first(), Color::BOLD);
        table.modify(Columns::new(2..5), Alignment::right());

        writeln!(out, "\n{table}")?;

        let mut summary = Summary::default();

        summary.line("Subtotal:", self.subtotal().to_string());

        if self.discount_amount().to_minor_units() > 0 {
            summary.line(
                format!("Discount ({}%):", self.discount_points()),
                format!("-{}", self.discount_amount()),
            );
        }

        if self.has_free_delivery() {
            summary.line("Delivery:", "FREE".to_string());
        } else {
            summary.line("Delivery:", self.delivery_fee().to_string());
        }

        if let Some(remaining) = self.remaining_for_free_delivery() {
            summary.line("Free Delivery:", format!("add {remaining} more"));
        }

        summary.line("Total:", self.total().to_string());

        summary.write_to(&mut out)
    }
}

impl SubscriptionQuote<'_> {
    /// Writes the subscription summary.
    ///
    /// # Errors
    ///
    /// Returns a [`RenderError`] if the output fails.
    pub fn write_to(
        &self,
        mut out: impl io::Write,
        plan: SubscriptionPlan,
        product: &SubscriptionProduct<'_>,
        daily_quantity: Decimal,
    ) -> Result<(), RenderError> {
        let mut summary = Summary::default();

        summary.line("Plan:", plan.title().to_string());
        summary.line("Product:", product.name().to_string());
        summary.line(
            "Daily Quantity:",
            format!("{}{}", daily_quantity.normalize(), product.unit()),
        );
        summary.line("Per Delivery:", self.daily_cost().to_string());
        summary.line(
            "Deliveries:",
            format!("{} / month", self.deliveries_per_month()),
        );
        summary.line("Monthly Total:", self.monthly_total().to_string());

        writeln!(out)?;
        summary.write_to(&mut out)
    }
}

/// Right-aligned label/value pairs printed under a table.
#[derive(Debug, Default)]
struct Summary {
    lines: Vec<(String, String)>,
}

impl Summary {
    fn line(&mut self, label: impl Into<String>, value: String) {
        self.lines.push((label.into(), value));
    }

    fn write_to(&self, out: &mut impl io::Write) -> Result<(), RenderError> {
        let label_width = self
            .lines
            .iter()
            .map(|(label, _)| label.chars().count())
            .max()
            .unwrap_or(0);

        let value_width = self
            .lines
            .iter()
            .map(|(_, value)| value.chars().count())
            .max()
            .unwrap_or(0);

        for (label, value) in &self.lines {
            writeln!(out, " {label:>label_width$}  {value:>value_width$}")?;
        }

        writeln!(out)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use decimal_percentage::Percentage;
    use rusty_money::{Money, iso::INR};
    use testresult::TestResult;

    use crate::{
        products::{ProductKey, Unit},
        quotes::quote_cart,
        subscriptions::{SubscriptionCatalog, quote_subscription},
    };

    use super::*;

    #[test]
    fn cart_quote_lists_items_and_summary() -> TestResult {
        let items = [
            LineItem::new(
                ProductKey::default(),
                "Fresh Cow Milk".to_string(),
                Money::from_minor(5400, INR),
                2,
                Unit::Litre,
            )?,
            LineItem::new(
                ProductKey::default(),
                "Fresh Dahi".to_string(),
                Money::from_minor(7000, INR),
                1,
                Unit::Kilogram,
            )?,
        ];

        let quote = quote_cart(&items, INR, Percentage::from(Decimal::new(10, 2)))?;

        let mut out = Vec::new();
        quote.write_to(&mut out, &items)?;
        let text = String::from_utf8(out)?;

        assert!(text.contains("Fresh Cow Milk"), "missing first line:\n{text}");
        assert!(text.contains("Fresh Dahi"), "missing second line:\n{text}");
        assert!(text.contains("Discount (10%):"), "missing discount:\n{text}");
        assert!(text.contains("FREE"), "178 ships free:\n{text}");
        assert!(text.contains("Total:"), "missing total:\n{text}");
        assert!(!text.contains("Free Delivery:"), "no hint once free:\n{text}");

        Ok(())
    }

    #[test]
    fn cart_quote_without_discount_omits_discount_line() -> TestResult {
        let items = [LineItem::new(
            ProductKey::default(),
            "Toned Milk".to_string(),
            Money::from_minor(4800, INR),
            1,
            Unit::Litre,
        )?];

        let quote = quote_cart(&items, INR, Percentage::from(Decimal::ZERO))?;

        let mut out = Vec::new();
        quote.write_to(&mut out, &items)?;
        let text = String::from_utf8(out)?;

        assert!(!text.contains("Discount"), "no promo applied:\n{text}");
        assert!(!text.contains("FREE"), "48 pays delivery:\n{text}");
        let hint = format!("add {} more", Money::from_minor(5200, INR));
        assert!(text.contains(&hint), "missing free delivery hint:\n{text}");

        Ok(())
    }

    #[test]
    fn subscription_quote_names_plan_and_product() -> TestResult {
        let catalog = SubscriptionCatalog::dairy(INR);
        let product = catalog.get("buffalo-milk")?;
        let quantity = Decimal::from(2);
        let quote = quote_subscription(SubscriptionPlan::Weekly, product, quantity)?;

        let mut out = Vec::new();
        quote.write_to(&mut out, SubscriptionPlan::Weekly, product, quantity)?;
        let text = String::from_utf8(out)?;

        assert!(text.contains("Weekly Bulk"), "missing plan:\n{text}");
        assert!(text.contains("Buffalo Milk"), "missing product:\n{text}");
        assert!(text.contains("2L"), "missing quantity:\n{text}");
        assert!(text.contains("4 / month"), "missing deliveries:\n{text}");

        Ok(())
    }
}
