//! Error types surfaced by the rate pipeline and the salary converter

use crate::core::currency::Currency;
use thiserror::Error;

/// Failure to obtain a rate snapshot from the remote feed.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum RateError {
    /// Transport failure, non-success status or a malformed response body.
    #[error("Error fetching exchange rates: {0}")]
    Network(String),
}

/// Local validation failures raised while converting a salary.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConversionError {
    #[error("Unsupported currency: {0} (expected one of USD, EUR, GBP)")]
    UnsupportedCurrency(String),
    /// Only raised under [`MissingRatePolicy::Strict`](crate::core::converter::MissingRatePolicy).
    #[error("No exchange rate available for {0}")]
    MissingRate(Currency),
    #[error("Invalid salary amount: {0} (must be a non-negative number)")]
    InvalidAmount(f64),
}
