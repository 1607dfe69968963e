//! Core business logic abstractions

pub mod config;
pub mod input;
pub mod log;
pub mod rates;
pub mod record;

// Re-export main types for cleaner imports
pub use input::{CurrencyCode, InputError};
pub use rates::{ExchangeRateProvider, RateError, RateTable};
pub use record::ConversionRecord;
