//! Core business logic abstractions

pub mod cache;
pub mod config;
pub mod converter;
pub mod currency;
pub mod error;
pub mod log;

// Re-export main types for cleaner imports
pub use converter::{
    ConversionRequest, ConversionResult, IsraelSalary, MissingRatePolicy, SalaryConverter,
    WorldSalary,
};
pub use currency::{Currency, RateProvider, RateSnapshot, RateSource};
pub use error::{ConversionError, RateError};
