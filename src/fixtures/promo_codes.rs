//! Promo Code Fixtures

use rustc_hash::FxHashMap;
use serde::Deserialize;

use crate::{
    fixtures::{FixtureError, products::parse_percentage},
    promotions::PromoCodes,
};

/// Wrapper for promo codes in YAML
#[derive(Debug, Deserialize)]
pub struct PromoCodesFixture {
    /// Map of code -> discount (e.g. "10%" or "0.10")
    pub promo_codes: FxHashMap<String, String>,
}

impl TryFrom<PromoCodesFixture> for PromoCodes {
    type Error = FixtureError;

    fn try_from(fixture: PromoCodesFixture) -> Result<Self, Self::Error> {
        let mut codes = PromoCodes::new();

        for (code, discount) in fixture.promo_codes {
            codes.insert(&code, parse_percentage(&discount)?)?;
        }

        Ok(codes)
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn promo_codes_fixture_builds_table() -> TestResult {
        let fixture: PromoCodesFixture =
            serde_norway::from_str("promo_codes:\n  FIRST10: 10%\n  WELCOME: \"0.05\"\n")?;

        let codes = PromoCodes::try_from(fixture)?;

        assert_eq!(codes.codes(), vec!["FIRST10", "WELCOME"]);
        assert_eq!(codes.resolve("welcome").discount_points(), Decimal::from(5));

        Ok(())
    }

    #[test]
    fn promo_codes_fixture_rejects_bad_percentages() -> TestResult {
        let fixture: PromoCodesFixture =
            serde_norway::from_str("promo_codes:\n  HALF: fifty\n")?;

        assert!(matches!(
            PromoCodes::try_from(fixture),
            Err(FixtureError::InvalidPercentage(_))
        ));

        Ok(())
    }
}
