use crate::core::rates::{ExchangeRateProvider, RateError, RateTable};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{StatusCode, Url};
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{debug, instrument};

const USER_AGENT: &str = concat!("fxconv/", env!("CARGO_PKG_VERSION"));

// FastForexProvider implementation for ExchangeRateProvider
pub struct FastForexProvider {
    endpoint: Url,
    api_key: String,
    client: reqwest::Client,
}

impl FastForexProvider {
    pub fn new(base_url: &str, api_key: &str) -> Result<Self> {
        let endpoint = Url::parse(&format!("{}/fetch-all", base_url.trim_end_matches('/')))
            .with_context(|| format!("Invalid exchange rate API base URL: {base_url}"))?;
        let client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;

        Ok(FastForexProvider {
            endpoint,
            api_key: api_key.to_string(),
            client,
        })
    }
}

#[derive(Debug, Deserialize)]
struct FetchAllResponse {
    #[serde(default)]
    results: Option<HashMap<String, f64>>,
}

#[async_trait]
impl ExchangeRateProvider for FastForexProvider {
    #[instrument(
        name = "FastForexFetch",
        skip(self),
        fields(base = %base, date = %date)
    )]
    async fn fetch_rates(&self, base: &str, date: &str) -> Result<RateTable, RateError> {
        let base = base.to_uppercase();
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .map_err(|_| RateError::InvalidDate(date.to_string()))?
            .format("%Y-%m-%d")
            .to_string();

        debug!("Requesting exchange rates from {}", self.endpoint);
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("from", &base)
            .append_pair("date", &date)
            .append_pair("api_key", &self.api_key);

        let response = self.client.get(url).send().await?;
        debug!(status = %response.status(), "Received exchange rate response");

        match response.status() {
            StatusCode::BAD_REQUEST => return Err(RateError::UnknownCurrency { base }),
            status if !status.is_success() => return Err(RateError::Http { status, base }),
            _ => {}
        }

        let text = response.text().await?;
        let data: FetchAllResponse = serde_json::from_str(&text)?;

        let results = match data.results {
            Some(results) if !results.is_empty() => results,
            _ => return Err(RateError::NoDataFound { base, date }),
        };
        if !results.contains_key(&base) {
            return Err(RateError::NoDataFound { base, date });
        }

        let table: RateTable = results
            .into_iter()
            .filter_map(|(code, rate)| match Decimal::from_f64(rate) {
                Some(rate) => Some((code, rate)),
                None => {
                    debug!("Skipping unrepresentable rate {} for {}", rate, code);
                    None
                }
            })
            .collect();

        debug!("Fetched {} rates for {} on {}", table.len(), base, date);
        Ok(table)
    }
}
