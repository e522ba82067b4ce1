//! Order history
//!
//! Past orders are read-only records. Unlike cart lines, order lines carry a decimal quantity
//! because loose products such as paneer are sold by weight (`0.5 kg`).

use std::{fmt, str::FromStr};

use jiff::civil::{Date, date};
use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use smallvec::{SmallVec, smallvec};
use thiserror::Error;

use crate::{
    pricing::{PricingError, ensure_non_negative, scale_minor},
    products::Unit,
};

/// Errors related to order records.
#[derive(Debug, Error, PartialEq)]
pub enum OrderError {
    /// The status name is not recognised.
    #[error("unknown order status: {0:?}")]
    UnknownStatus(String),

    /// An order has no lines.
    #[error("order {0} has no lines")]
    NoLines(String),

    /// Wrapped pricing error.
    #[error(transparent)]
    Pricing(#[from] PricingError),
}

/// Where an order is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderStatus {
    /// Handed over at the door.
    Delivered,

    /// Scheduled for an upcoming delivery slot.
    Pending,

    /// Cancelled before delivery.
    Cancelled,
}

impl OrderStatus {
    /// Every status, in display order.
    pub const ALL: [Self; 3] = [Self::Delivered, Self::Pending, Self::Cancelled];

    /// Display label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Delivered => "Delivered",
            Self::Pending => "Pending",
            Self::Cancelled => "Cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for OrderStatus {
    type Err = OrderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();

        Self::ALL
            .into_iter()
            .find(|status| status.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| OrderError::UnknownStatus(s.to_string()))
    }
}

/// One product on a past order.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderLine<'a> {
    /// Product name as printed on the order
    pub name: String,

    /// Amount ordered, in `unit`
    pub quantity: Decimal,

    /// Unit the quantity is measured in
    pub unit: Unit,

    /// Price per unit at the time of ordering
    pub unit_price: Money<'a, Currency>,
}

impl<'a> OrderLine<'a> {
    /// Creates a new order line.
    ///
    /// # Errors
    ///
    /// - [`PricingError::InvalidInput`]: the quantity or the price is negative.
    pub fn new(
        name: impl Into<String>,
        quantity: Decimal,
        unit: Unit,
        unit_price: Money<'a, Currency>,
    ) -> Result<Self, PricingError> {
        ensure_non_negative("unit price", &unit_price)?;

        if quantity < Decimal::ZERO {
            return Err(PricingError::InvalidInput(format!(
                "order quantity must not be negative, got {quantity}"
            )));
        }

        Ok(Self {
            name: name.into(),
            quantity,
            unit,
            unit_price,
        })
    }

    /// Unit price times quantity, rounded to the nearest minor unit.
    ///
    /// # Errors
    ///
    /// - [`PricingError::InvalidInput`]: the product overflows.
    pub fn line_total(&self) -> Result<Money<'a, Currency>, PricingError> {
        let minor = scale_minor(self.unit_price.to_minor_units(), self.quantity)?;

        Ok(Money::from_minor(minor, self.unit_price.currency()))
    }
}

/// A past order.
#[derive(Debug, Clone, PartialEq)]
pub struct Order<'a> {
    id: String,
    date: Date,
    status: OrderStatus,
    lines: SmallVec<[OrderLine<'a>; 4]>,
    total: Money<'a, Currency>,
    delivery_time: String,
}

impl<'a> Order<'a> {
    /// Record an order. The total is computed from the lines.
    ///
    /// # Errors
    ///
    /// Returns an [`OrderError`] if there are no lines, or the lines mix currencies or overflow.
    pub fn new(
        id: impl Into<String>,
        date: Date,
        status: OrderStatus,
        lines: SmallVec<[OrderLine<'a>; 4]>,
        delivery_time: impl Into<String>,
    ) -> Result<Self, OrderError> {
        let id = id.into();
        let total = sum_lines(&id, &lines)?;

        Ok(Self {
            id,
            date,
            status,
            lines,
            total,
            delivery_time: delivery_time.into(),
        })
    }

    /// Order reference, e.g. `ORD001`
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Day the order was placed
    pub fn date(&self) -> Date {
        self.date
    }

    /// Current status
    pub fn status(&self) -> OrderStatus {
        self.status
    }

    /// Ordered products
    pub fn lines(&self) -> &[OrderLine<'a>] {
        &self.lines
    }

    /// Amount charged for the order
    pub fn total(&self) -> Money<'a, Currency> {
        self.total
    }

    /// Delivery slot, or a note such as `Cancelled`
    pub fn delivery_time(&self) -> &str {
        &self.delivery_time
    }

    /// Sum of the line totals.
    ///
    /// # Errors
    ///
    /// Returns an [`OrderError`] if the lines mix currencies or the sum overflows.
    pub fn lines_total(&self) -> Result<Money<'a, Currency>, OrderError> {
        sum_lines(&self.id, &self.lines)
    }
}

fn sum_lines<'a>(id: &str, lines: &[OrderLine<'a>]) -> Result<Money<'a, Currency>, OrderError> {
    let (first, rest) = lines
        .split_first()
        .ok_or_else(|| OrderError::NoLines(id.to_string()))?;

    rest.iter()
        .try_fold(first.line_total()?, |acc, line| -> Result<_, OrderError> {
            Ok(acc.add(line.line_total()?).map_err(PricingError::from)?)
        })
}

/// A customer's order history.
#[derive(Debug, Clone, Default)]
pub struct OrderHistory<'a> {
    orders: Vec<Order<'a>>,
}

impl<'a> OrderHistory<'a> {
    /// Wrap a list of orders, kept in the order given.
    pub fn new(orders: Vec<Order<'a>>) -> Self {
        Self { orders }
    }

    /// Four recent orders for a regular customer.
    ///
    /// # Errors
    ///
    /// Returns an [`OrderError`] if a built-in order fails validation.
    pub fn sample(currency: &'a Currency) -> Result<Self, OrderError> {
        let rupees = |amount: i64| Money::from_minor(amount * 100, currency);

        let orders = vec![
            Order::new(
                "ORD001",
                date(2024, 8, 9),
                OrderStatus::Delivered,
                smallvec![
                    OrderLine::new("Fresh Cow Milk", Decimal::from(2), Unit::Litre, rupees(54))?,
                    OrderLine::new("Dahi", Decimal::ONE, Unit::Kilogram, rupees(70))?,
                ],
                "6:15 AM",
            )?,
            Order::new(
                "ORD002",
                date(2024, 8, 8),
                OrderStatus::Delivered,
                smallvec![OrderLine::new(
                    "Buffalo Milk",
                    Decimal::ONE,
                    Unit::Litre,
                    rupees(62)
                )?],
                "6:30 AM",
            )?,
            Order::new(
                "ORD003",
                date(2024, 8, 10),
                OrderStatus::Pending,
                smallvec![
                    OrderLine::new("Fresh Cow Milk", Decimal::ONE, Unit::Litre, rupees(54))?,
                    OrderLine::new("Paneer", Decimal::new(5, 1), Unit::Kilogram, rupees(240))?,
                ],
                "Tomorrow 6:00 AM",
            )?,
            Order::new(
                "ORD004",
                date(2024, 8, 7),
                OrderStatus::Cancelled,
                smallvec![OrderLine::new(
                    "Toned Milk",
                    Decimal::ONE,
                    Unit::Litre,
                    rupees(48)
                )?],
                "Cancelled",
            )?,
        ];

        Ok(Self::new(orders))
    }

    /// Orders with the given status; `None` returns every order.
    pub fn filter(&self, status: Option<OrderStatus>) -> Vec<&Order<'a>> {
        self.orders
            .iter()
            .filter(|order| status.is_none_or(|wanted| order.status == wanted))
            .collect()
    }

    /// Look an order up by reference, ignoring case.
    pub fn get(&self, id: &str) -> Option<&Order<'a>> {
        self.orders
            .iter()
            .find(|order| order.id.eq_ignore_ascii_case(id.trim()))
    }

    /// All orders.
    pub fn orders(&self) -> &[Order<'a>] {
        &self.orders
    }

    /// Number of orders.
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    /// Whether there are no orders.
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::{GBP, INR};
    use testresult::TestResult;

    use super::*;

    fn ids<'o>(orders: &[&'o Order<'_>]) -> Vec<&'o str> {
        orders.iter().map(|order| order.id()).collect()
    }

    #[test]
    fn sample_history_has_four_orders() -> TestResult {
        let history = OrderHistory::sample(INR)?;

        assert_eq!(history.len(), 4);
        assert_eq!(
            ids(&history.filter(None)),
            vec!["ORD001", "ORD002", "ORD003", "ORD004"]
        );

        Ok(())
    }

    #[test]
    fn sample_totals_match_recorded_amounts() -> TestResult {
        let history = OrderHistory::sample(INR)?;

        let totals: Vec<i64> = history
            .orders()
            .iter()
            .map(|order| order.total().to_minor_units())
            .collect();

        assert_eq!(totals, vec![17800, 6200, 17400, 4800]);

        for order in history.orders() {
            assert_eq!(order.lines_total()?, order.total());
        }

        Ok(())
    }

    #[test]
    fn half_kilo_of_paneer_costs_half_price() -> TestResult {
        let line = OrderLine::new(
            "Paneer",
            Decimal::new(5, 1),
            Unit::Kilogram,
            Money::from_minor(24000, INR),
        )?;

        assert_eq!(line.line_total()?, Money::from_minor(12000, INR));

        Ok(())
    }

    #[test]
    fn filter_by_status() -> TestResult {
        let history = OrderHistory::sample(INR)?;

        assert_eq!(
            ids(&history.filter(Some(OrderStatus::Delivered))),
            vec!["ORD001", "ORD002"]
        );
        assert_eq!(ids(&history.filter(Some(OrderStatus::Pending))), vec!["ORD003"]);
        assert_eq!(ids(&history.filter(Some(OrderStatus::Cancelled))), vec!["ORD004"]);

        Ok(())
    }

    #[test]
    fn status_parses_case_insensitively() -> TestResult {
        assert_eq!("delivered".parse::<OrderStatus>()?, OrderStatus::Delivered);
        assert_eq!(" PENDING ".parse::<OrderStatus>()?, OrderStatus::Pending);
        assert_eq!(
            "lost".parse::<OrderStatus>(),
            Err(OrderError::UnknownStatus("lost".to_string()))
        );

        Ok(())
    }

    #[test]
    fn get_finds_orders_by_reference() -> TestResult {
        let history = OrderHistory::sample(INR)?;
        let order = history.get("ord003").ok_or("ORD003 missing")?;

        assert_eq!(order.date(), date(2024, 8, 10));
        assert_eq!(order.delivery_time(), "Tomorrow 6:00 AM");
        assert_eq!(order.lines().len(), 2);
        assert!(history.get("ORD999").is_none(), "unknown reference");

        Ok(())
    }

    #[test]
    fn orders_need_lines_in_one_currency() -> TestResult {
        let empty = Order::new(
            "ORD100",
            date(2024, 8, 11),
            OrderStatus::Pending,
            SmallVec::new(),
            "6:00 AM",
        );

        assert_eq!(empty, Err(OrderError::NoLines("ORD100".to_string())));

        let mixed = Order::new(
            "ORD101",
            date(2024, 8, 11),
            OrderStatus::Pending,
            smallvec![
                OrderLine::new("Milk", Decimal::ONE, Unit::Litre, Money::from_minor(5400, INR))?,
                OrderLine::new("Milk", Decimal::ONE, Unit::Litre, Money::from_minor(100, GBP))?,
            ],
            "6:00 AM",
        );

        assert!(matches!(mixed, Err(OrderError::Pricing(PricingError::Money(_)))));

        Ok(())
    }

    #[test]
    fn negative_quantities_are_rejected() {
        let result = OrderLine::new(
            "Milk",
            Decimal::NEGATIVE_ONE,
            Unit::Litre,
            Money::from_minor(5400, INR),
        );

        assert!(matches!(result, Err(PricingError::InvalidInput(_))));
    }
}
