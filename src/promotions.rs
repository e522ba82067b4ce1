//! Promo codes
//!
//! A promo code is a case-insensitive token worth a percentage off the cart subtotal. Codes never
//! stack: the cart keeps at most one active discount.

use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::pricing::{PricingError, percent_points, percentage_from_points};

/// Codes the shop hands out, with their discount in percent points.
const STANDARD_CODES: [(&str, i64); 2] = [("FIRST10", 10), ("WELCOME", 5)];

/// Result of looking a code up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PromoResolution {
    /// Whether the code is in the table.
    pub valid: bool,

    /// Discount granted; zero when the code is invalid.
    pub discount_percent: Percentage,
}

impl PromoResolution {
    fn rejected() -> Self {
        Self {
            valid: false,
            discount_percent: Percentage::from(Decimal::ZERO),
        }
    }

    /// Discount in percent points (`10` for 10%).
    pub fn discount_points(&self) -> Decimal {
        percent_points(&self.discount_percent)
    }
}

/// Look a code up in the shop's standard table.
pub fn resolve_promo_code(code: &str) -> PromoResolution {
    let wanted = code.trim();

    STANDARD_CODES
        .iter()
        .find(|(known, _)| known.eq_ignore_ascii_case(wanted))
        .map_or_else(PromoResolution::rejected, |&(_, points)| PromoResolution {
            valid: true,
            discount_percent: Percentage::from(Decimal::new(points, 2)),
        })
}

/// A table of promo codes.
#[derive(Debug, Clone, Default)]
pub struct PromoCodes {
    /// Lowercased code -> (code as written, discount)
    codes: FxHashMap<String, (String, Percentage)>,
}

impl PromoCodes {
    /// An empty table; every code is rejected.
    pub fn new() -> Self {
        Self::default()
    }

    /// `FIRST10` for 10% off and `WELCOME` for 5% off.
    pub fn standard() -> Self {
        let codes = STANDARD_CODES
            .iter()
            .map(|&(code, points)| {
                (
                    code.to_lowercase(),
                    (code.to_string(), Percentage::from(Decimal::new(points, 2))),
                )
            })
            .collect();

        Self { codes }
    }

    /// Add or replace a code.
    ///
    /// # Errors
    ///
    /// - [`PricingError::InvalidInput`]: the code is blank or the discount is outside 0–100%.
    pub fn insert(&mut self, code: &str, discount: Percentage) -> Result<(), PricingError> {
        let code = code.trim();

        if code.is_empty() {
            return Err(PricingError::InvalidInput(
                "promo code must not be blank".to_string(),
            ));
        }

        // Round-trip through percent points to share the 0-100 range check.
        let discount = percentage_from_points(percent_points(&discount))?;

        self.codes
            .insert(code.to_lowercase(), (code.to_string(), discount));

        Ok(())
    }

    /// Case-insensitive lookup. Unknown codes resolve to an invalid, zero discount.
    pub fn resolve(&self, code: &str) -> PromoResolution {
        let resolution = self
            .codes
            .get(&code.trim().to_lowercase())
            .map_or_else(PromoResolution::rejected, |&(_, discount)| {
                PromoResolution {
                    valid: true,
                    discount_percent: discount,
                }
            });

        debug!(
            code,
            valid = resolution.valid,
            discount_points = %resolution.discount_points(),
            "resolved promo code"
        );

        resolution
    }

    /// Resolve a code, treating unknown codes as an error.
    ///
    /// # Errors
    ///
    /// - [`PricingError::InvalidPromoCode`]: the code is not in the table.
    pub fn apply(&self, code: &str) -> Result<Percentage, PricingError> {
        let resolution = self.resolve(code);

        if resolution.valid {
            Ok(resolution.discount_percent)
        } else {
            Err(PricingError::InvalidPromoCode(code.trim().to_string()))
        }
    }

    /// The codes in the table, as written, sorted.
    pub fn codes(&self) -> Vec<&str> {
        let mut codes: Vec<&str> = self.codes.values().map(|(code, _)| code.as_str()).collect();
        codes.sort_unstable();
        codes
    }

    /// Number of codes.
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    /// Whether the table has no codes.
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}
