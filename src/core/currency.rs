//! Currency and exchange-rate abstractions

use crate::core::error::{ConversionError, RateError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Base currency for every rate snapshot.
pub const BASE_CURRENCY: &str = "ILS";

/// World currencies a salary can be converted to or from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Currency {
    Usd,
    Eur,
    Gbp,
}

impl Currency {
    pub const ALL: [Currency; 3] = [Currency::Usd, Currency::Eur, Currency::Gbp];

    pub fn code(&self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
            Currency::Gbp => "GBP",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::Usd => "$",
            Currency::Eur => "€",
            Currency::Gbp => "£",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "USD" => Ok(Currency::Usd),
            "EUR" => Ok(Currency::Eur),
            "GBP" => Ok(Currency::Gbp),
            _ => Err(ConversionError::UnsupportedCurrency(s.trim().to_string())),
        }
    }
}

/// Immutable set of multipliers expressing "1 ILS = X units" for each currency code.
///
/// Codes other than USD/EUR/GBP are retained as returned by the feed but are not
/// used by the converter.
#[derive(Debug, Clone, PartialEq)]
pub struct RateSnapshot {
    base: String,
    rates: HashMap<String, f64>,
    published_at: Option<DateTime<Utc>>,
    fetched_at: DateTime<Utc>,
}

impl RateSnapshot {
    pub fn new(rates: HashMap<String, f64>) -> Self {
        Self {
            base: BASE_CURRENCY.to_string(),
            rates,
            published_at: None,
            fetched_at: Utc::now(),
        }
    }

    pub fn with_base(mut self, base: impl Into<String>) -> Self {
        self.base = base.into();
        self
    }

    pub fn with_published_at(mut self, published_at: Option<DateTime<Utc>>) -> Self {
        self.published_at = published_at;
        self
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    /// Multiplier for a supported currency, if the feed returned one.
    pub fn rate(&self, currency: Currency) -> Option<f64> {
        self.get(currency.code())
    }

    pub fn get(&self, code: &str) -> Option<f64> {
        self.rates.get(code).copied()
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    /// Time the feed reports for its last update.
    pub fn published_at(&self) -> Option<DateTime<Utc>> {
        self.published_at
    }

    pub fn fetched_at(&self) -> DateTime<Utc> {
        self.fetched_at
    }
}

impl<const N: usize> From<[(&str, f64); N]> for RateSnapshot {
    fn from(pairs: [(&str, f64); N]) -> Self {
        RateSnapshot::new(
            pairs
                .into_iter()
                .map(|(code, rate)| (code.to_string(), rate))
                .collect(),
        )
    }
}

/// A remote feed able to produce a fresh ILS-based rate snapshot.
#[async_trait]
pub trait RateSource: Send + Sync {
    async fn fetch_rates(&self) -> Result<RateSnapshot, RateError>;
}

/// Hands out the current rate snapshot, fetching only when needed.
#[async_trait]
pub trait RateProvider: Send + Sync {
    async fn get_rates(&self) -> Result<Arc<RateSnapshot>, RateError>;
}
