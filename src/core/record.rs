//! Conversion arithmetic and the logged conversion record

use crate::core::input::CurrencyCode;
use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Converts `amount` at `rate`, rounded half away from zero to two places.
///
/// Returns `None` when the product does not fit in a decimal.
pub fn convert(amount: Decimal, rate: Decimal) -> Option<Decimal> {
    amount
        .checked_mul(rate)
        .map(|value| value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionRecord {
    pub base: CurrencyCode,
    pub target: CurrencyCode,
    #[serde(with = "amount_number")]
    pub amount: Decimal,
    pub converted_amount: String,
    pub date: NaiveDate,
}

impl ConversionRecord {
    pub fn new(
        base: CurrencyCode,
        target: CurrencyCode,
        amount: Decimal,
        converted: Decimal,
        date: NaiveDate,
    ) -> Self {
        Self {
            base,
            target,
            amount,
            converted_amount: format!("{converted:.2}"),
            date,
        }
    }

    /// The line printed after a conversion, e.g. `100 USD is 90.00 EUR`.
    pub fn summary(&self) -> String {
        format!(
            "{} {} is {} {}",
            self.amount.normalize(),
            self.base,
            self.converted_amount,
            self.target
        )
    }
}

// Amounts are plain JSON numbers: `100` when whole, `12.5` otherwise.
mod amount_number {
    use rust_decimal::Decimal;
    use rust_decimal::prelude::ToPrimitive;
    use serde::de::Error as _;
    use serde::ser::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};
    use std::str::FromStr;

    pub fn serialize<S: Serializer>(amount: &Decimal, serializer: S) -> Result<S::Ok, S::Error> {
        let amount = amount.normalize();
        if amount.scale() == 0 {
            if let Some(whole) = amount.to_u64() {
                return serializer.serialize_u64(whole);
            }
        }
        let value = amount
            .to_f64()
            .ok_or_else(|| S::Error::custom(format!("amount {amount} is not a valid number")))?;
        serializer.serialize_f64(value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Decimal, D::Error> {
        let number = serde_json::Number::deserialize(deserializer)?;
        let text = number.to_string();
        Decimal::from_str(&text)
            .or_else(|_| Decimal::from_scientific(&text))
            .map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(value: &str) -> Decimal {
        Decimal::from_str(value).unwrap()
    }

    fn code(value: &str) -> CurrencyCode {
        value.parse().unwrap()
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    #[test]
    fn test_convert_rounds_to_two_places() {
        assert_eq!(convert(dec("100.00"), dec("0.9")), Some(dec("90")));
        assert_eq!(convert(dec("10"), dec("1.23456")), Some(dec("12.35")));
        assert_eq!(convert(dec("1"), dec("0.125")), Some(dec("0.13")));
        assert_eq!(convert(dec("1"), dec("0.124")), Some(dec("0.12")));
        assert_eq!(convert(dec("0"), dec("83.1")), Some(dec("0")));
    }

    #[test]
    fn test_convert_overflow() {
        assert_eq!(convert(Decimal::MAX, dec("2")), None);
    }

    #[test]
    fn test_summary_line() {
        let record = ConversionRecord::new(code("USD"), code("EUR"), dec("100.00"), dec("90"), date());
        assert_eq!(record.converted_amount, "90.00");
        assert_eq!(record.summary(), "100 USD is 90.00 EUR");

        let record = ConversionRecord::new(code("GBP"), code("JPY"), dec("12.50"), dec("2375.5"), date());
        assert_eq!(record.summary(), "12.5 GBP is 2375.50 JPY");
    }

    #[test]
    fn test_record_json_shape() {
        let record = ConversionRecord::new(code("USD"), code("EUR"), dec("100.00"), dec("90"), date());
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "base": "USD",
                "target": "EUR",
                "amount": 100,
                "convertedAmount": "90.00",
                "date": "2024-03-15"
            })
        );

        let record = ConversionRecord::new(code("USD"), code("EUR"), dec("12.50"), dec("11.25"), date());
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains(r#""amount":12.5"#), "{json}");
    }

    #[test]
    fn test_record_deserialization() {
        let record: ConversionRecord = serde_json::from_str(
            r#"{"base":"CAD","target":"USD","amount":99.99,"convertedAmount":"73.12","date":"2024-03-15"}"#,
        )
        .unwrap();
        assert_eq!(record.base, code("CAD"));
        assert_eq!(record.target, code("USD"));
        assert_eq!(record.amount, dec("99.99"));
        assert_eq!(record.converted_amount, "73.12");
        assert_eq!(record.date, date());
    }
}
