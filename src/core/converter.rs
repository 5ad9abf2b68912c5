//! Monthly ILS ⇄ annual world-currency salary conversion.
//!
//! All figures are plain `f64`. Rounding to display precision is left to the
//! caller.

use crate::core::currency::{Currency, RateSnapshot};
use crate::core::error::ConversionError;
use serde::{Deserialize, Serialize};
use tracing::warn;

pub const MONTHS_PER_YEAR: f64 = 12.0;

/// What to do when a supported currency is absent from the snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingRatePolicy {
    /// Use a multiplier of 1 and flag the result as degraded.
    #[default]
    Passthrough,
    /// Fail with [`ConversionError::MissingRate`].
    Strict,
}

/// Annual amounts in each world currency.
#[derive(Debug, Clone, PartialEq)]
pub struct WorldSalary {
    pub usd: f64,
    pub eur: f64,
    pub gbp: f64,
    /// Currencies computed with the fallback multiplier.
    pub degraded: Vec<Currency>,
}

impl WorldSalary {
    pub fn get(&self, currency: Currency) -> f64 {
        match currency {
            Currency::Usd => self.usd,
            Currency::Eur => self.eur,
            Currency::Gbp => self.gbp,
        }
    }

    pub fn is_degraded(&self) -> bool {
        !self.degraded.is_empty()
    }
}

/// Monthly amount in ILS.
#[derive(Debug, Clone, PartialEq)]
pub struct IsraelSalary {
    pub monthly_ils: f64,
    pub degraded: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConversionRequest {
    IsraelToWorld { monthly_ils: f64 },
    WorldToIsrael { currency: Currency, annual_amount: f64 },
}

impl ConversionRequest {
    pub fn israel_to_world(monthly_ils: f64) -> Result<Self, ConversionError> {
        Ok(Self::IsraelToWorld {
            monthly_ils: validate_amount(monthly_ils)?,
        })
    }

    pub fn world_to_israel(annual_amount: f64, currency: &str) -> Result<Self, ConversionError> {
        Ok(Self::WorldToIsrael {
            currency: currency.parse()?,
            annual_amount: validate_amount(annual_amount)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConversionResult {
    World(WorldSalary),
    Israel(IsraelSalary),
}

fn validate_amount(amount: f64) -> Result<f64, ConversionError> {
    if amount.is_finite() && amount >= 0.0 {
        Ok(amount)
    } else {
        Err(ConversionError::InvalidAmount(amount))
    }
}

/// Stateless converter; the only thing it holds is its missing-rate policy.
#[derive(Debug, Clone, Copy, Default)]
pub struct SalaryConverter {
    policy: MissingRatePolicy,
}

impl SalaryConverter {
    pub fn new(policy: MissingRatePolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> MissingRatePolicy {
        self.policy
    }

    /// Returns the multiplier for `currency` and whether the fallback was used.
    fn multiplier(
        &self,
        currency: Currency,
        rates: &RateSnapshot,
    ) -> Result<(f64, bool), ConversionError> {
        match (rates.rate(currency), self.policy) {
            (Some(rate), _) => Ok((rate, false)),
            (None, MissingRatePolicy::Passthrough) => {
                warn!(%currency, "No rate in snapshot, falling back to 1");
                Ok((1.0, true))
            }
            (None, MissingRatePolicy::Strict) => Err(ConversionError::MissingRate(currency)),
        }
    }

    /// Converts a monthly ILS salary to annual USD, EUR and GBP.
    pub fn israel_to_world(
        &self,
        monthly_ils: f64,
        rates: &RateSnapshot,
    ) -> Result<WorldSalary, ConversionError> {
        let annual_ils = monthly_ils * MONTHS_PER_YEAR;
        let mut degraded = Vec::new();
        let mut convert = |currency| -> Result<f64, ConversionError> {
            let (rate, fallback) = self.multiplier(currency, rates)?;
            if fallback {
                degraded.push(currency);
            }
            Ok(annual_ils * rate)
        };

        let usd = convert(Currency::Usd)?;
        let eur = convert(Currency::Eur)?;
        let gbp = convert(Currency::Gbp)?;

        Ok(WorldSalary {
            usd,
            eur,
            gbp,
            degraded,
        })
    }

    /// Converts an annual salary in `currency` to a monthly ILS salary.
    pub fn world_to_israel(
        &self,
        annual_amount: f64,
        currency: Currency,
        rates: &RateSnapshot,
    ) -> Result<IsraelSalary, ConversionError> {
        let (rate, degraded) = self.multiplier(currency, rates)?;
        let annual_ils = annual_amount / rate;
        Ok(IsraelSalary {
            monthly_ils: annual_ils / MONTHS_PER_YEAR,
            degraded,
        })
    }

    /// Same as [`world_to_israel`](Self::world_to_israel) for a raw currency code.
    pub fn world_to_israel_code(
        &self,
        annual_amount: f64,
        code: &str,
        rates: &RateSnapshot,
    ) -> Result<IsraelSalary, ConversionError> {
        self.world_to_israel(annual_amount, code.parse()?, rates)
    }

    pub fn convert(
        &self,
        request: &ConversionRequest,
        rates: &RateSnapshot,
    ) -> Result<ConversionResult, ConversionError> {
        match *request {
            ConversionRequest::IsraelToWorld { monthly_ils } => self
                .israel_to_world(validate_amount(monthly_ils)?, rates)
                .map(ConversionResult::World),
            ConversionRequest::WorldToIsrael {
                currency,
                annual_amount,
            } => self
                .world_to_israel(validate_amount(annual_amount)?, currency, rates)
                .map(ConversionResult::Israel),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_rates() -> RateSnapshot {
        RateSnapshot::from([("USD", 0.27), ("EUR", 0.25), ("GBP", 0.21)])
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 0.001,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_israel_to_world() {
        let converter = SalaryConverter::default();
        let result = converter.israel_to_world(15000.0, &sample_rates()).unwrap();

        assert_close(result.usd, 48600.0);
        assert_close(result.eur, 45000.0);
        assert_close(result.gbp, 37800.0);
        assert!(!result.is_degraded());
    }

    #[test]
    fn test_israel_to_world_matches_formula() {
        let converter = SalaryConverter::default();
        let rates = sample_rates();

        for monthly in [0.0, 1.0, 500.0, 12345.67, 50000.0] {
            let result = converter.israel_to_world(monthly, &rates).unwrap();
            for currency in Currency::ALL {
                let expected = monthly * 12.0 * rates.rate(currency).unwrap();
                assert_eq!(result.get(currency), expected);
            }
        }
    }

    #[test]
    fn test_world_to_israel() {
        let converter = SalaryConverter::default();
        let rates = RateSnapshot::from([("USD", 0.27)]);

        let result = converter
            .world_to_israel(50000.0, Currency::Usd, &rates)
            .unwrap();
        assert!((result.monthly_ils - 15432.10).abs() < 0.01);
        assert!(!result.degraded);
    }

    #[test]
    fn test_round_trip() {
        let converter = SalaryConverter::default();
        let rates = sample_rates();

        for monthly in [1.0, 7500.0, 15000.0, 42000.5] {
            let world = converter.israel_to_world(monthly, &rates).unwrap();
            for currency in Currency::ALL {
                let back = converter
                    .world_to_israel(world.get(currency), currency, &rates)
                    .unwrap();
                assert!((back.monthly_ils - monthly).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn test_unsupported_currency() {
        let converter = SalaryConverter::default();
        let result = converter.world_to_israel_code(1000.0, "JPY", &sample_rates());

        assert_eq!(
            result,
            Err(ConversionError::UnsupportedCurrency("JPY".to_string()))
        );
    }

    #[test]
    fn test_missing_rate_passthrough() {
        let converter = SalaryConverter::new(MissingRatePolicy::Passthrough);
        let rates = RateSnapshot::from([("USD", 0.27)]);

        let world = converter.israel_to_world(1000.0, &rates).unwrap();
        assert_close(world.usd, 3240.0);
        assert_eq!(world.eur, 12000.0);
        assert_eq!(world.gbp, 12000.0);
        assert_eq!(world.degraded, vec![Currency::Eur, Currency::Gbp]);

        let israel = converter
            .world_to_israel(12000.0, Currency::Gbp, &rates)
            .unwrap();
        assert_eq!(israel.monthly_ils, 1000.0);
        assert!(israel.degraded);
    }

    #[test]
    fn test_missing_rate_strict() {
        let converter = SalaryConverter::new(MissingRatePolicy::Strict);
        let rates = RateSnapshot::from([("USD", 0.27)]);

        assert_eq!(
            converter.israel_to_world(1000.0, &rates),
            Err(ConversionError::MissingRate(Currency::Eur))
        );
        assert_eq!(
            converter.world_to_israel(1000.0, Currency::Gbp, &rates),
            Err(ConversionError::MissingRate(Currency::Gbp))
        );
        assert!(
            converter
                .world_to_israel(1000.0, Currency::Usd, &rates)
                .is_ok()
        );
    }

    #[test]
    fn test_conversion_request_validation() {
        assert_eq!(
            ConversionRequest::israel_to_world(-1.0),
            Err(ConversionError::InvalidAmount(-1.0))
        );
        assert!(ConversionRequest::israel_to_world(f64::NAN).is_err());
        assert!(ConversionRequest::world_to_israel(f64::INFINITY, "USD").is_err());
        assert_eq!(
            ConversionRequest::world_to_israel(1000.0, "CHF"),
            Err(ConversionError::UnsupportedCurrency("CHF".to_string()))
        );
        assert_eq!(
            ConversionRequest::world_to_israel(1000.0, "eur"),
            Ok(ConversionRequest::WorldToIsrael {
                currency: Currency::Eur,
                annual_amount: 1000.0
            })
        );
    }

    #[test]
    fn test_convert_dispatch() {
        let converter = SalaryConverter::default();
        let rates = sample_rates();

        let request = ConversionRequest::israel_to_world(15000.0).unwrap();
        match converter.convert(&request, &rates).unwrap() {
            ConversionResult::World(world) => assert_close(world.usd, 48600.0),
            other => panic!("Expected world salary, got {other:?}"),
        }

        let request = ConversionRequest::world_to_israel(45000.0, "EUR").unwrap();
        match converter.convert(&request, &rates).unwrap() {
            ConversionResult::Israel(israel) => assert_close(israel.monthly_ils, 15000.0),
            other => panic!("Expected israel salary, got {other:?}"),
        }

        let invalid = ConversionRequest::IsraelToWorld { monthly_ils: -5.0 };
        assert_eq!(
            converter.convert(&invalid, &rates),
            Err(ConversionError::InvalidAmount(-5.0))
        );
    }
}
