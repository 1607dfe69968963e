//! Parsing of console input and the date argument

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;
use thiserror::Error;

/// Sentinel that ends a session at any prompt.
pub const END_SENTINEL: &str = "END";

/// Validation failures. The message is what the user is told before the re-prompt.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("Please enter a valid amount with up to two decimal places.")]
    MalformedAmount,
    #[error("Please enter a valid amount.")]
    UnparseableAmount,
    #[error("Please enter a valid currency code.")]
    MalformedCurrencyCode,
    #[error("Please enter a valid currency code")]
    UnknownTargetCurrency,
}

pub fn is_end(line: &str) -> bool {
    line.to_uppercase() == END_SENTINEL
}

/// Checks the `YYYY-MM-DD` shape only; `9999-99-99` passes.
pub fn is_date_shape(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}

/// Accepts digits, optionally followed by `.` and one or two digits.
pub fn parse_amount(line: &str) -> Result<Decimal, InputError> {
    let (whole, fraction) = match line.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (line, None),
    };

    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    let well_formed = all_digits(whole)
        && fraction.is_none_or(|f| all_digits(f) && f.len() <= 2);
    if !well_formed {
        return Err(InputError::MalformedAmount);
    }

    // Shape is fine but the value may not fit in a decimal
    Decimal::from_str(line).map_err(|_| InputError::UnparseableAmount)
}

/// A three letter, upper case currency code such as `USD`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CurrencyCode(String);

impl CurrencyCode {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for CurrencyCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CurrencyCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for CurrencyCode {
    type Err = InputError;

    /// Upper cases the input first, so `usd` is accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.to_uppercase();
        if code.len() == 3 && code.bytes().all(|b| b.is_ascii_uppercase()) {
            Ok(CurrencyCode(code))
        } else {
            Err(InputError::MalformedCurrencyCode)
        }
    }
}
