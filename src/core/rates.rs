//! Exchange rate abstractions

use async_trait::async_trait;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use thiserror::Error;

/// Rates relative to one base currency on one date, keyed by currency code.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RateTable {
    rates: BTreeMap<String, Decimal>,
}

impl RateTable {
    pub fn new(rates: BTreeMap<String, Decimal>) -> Self {
        Self { rates }
    }

    pub fn get(&self, code: &str) -> Option<Decimal> {
        self.rates.get(code).copied()
    }

    pub fn contains(&self, code: &str) -> bool {
        self.rates.contains_key(code)
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

impl FromIterator<(String, Decimal)> for RateTable {
    fn from_iter<I: IntoIterator<Item = (String, Decimal)>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[derive(Debug, Error)]
pub enum RateError {
    #[error("Invalid date value: {0}")]
    InvalidDate(String),

    #[error("Invalid currency code or no data for {base}")]
    UnknownCurrency { base: String },

    #[error("No exchange rate data found for {base} on {date}")]
    NoDataFound { base: String, date: String },

    #[error("HTTP error: {status} for base currency: {base}")]
    Http {
        status: reqwest::StatusCode,
        base: String,
    },

    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Failed to parse exchange rate response: {0}")]
    Malformed(#[from] serde_json::Error),
}

impl RateError {
    /// Recoverable errors send the user back to the base currency prompt.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, RateError::InvalidDate(_))
    }

    /// Short line shown on the console for a recoverable error.
    pub fn user_message(&self) -> &'static str {
        match self {
            RateError::UnknownCurrency { .. } => "Please enter a valid currency code",
            _ => "An error occurred while fetching exchange rates",
        }
    }
}

#[async_trait]
pub trait ExchangeRateProvider: Send + Sync {
    /// Fetches all rates for `base` on `date` (`YYYY-MM-DD`).
    async fn fetch_rates(&self, base: &str, date: &str) -> Result<RateTable, RateError>;
}
