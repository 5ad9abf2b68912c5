use anyhow::Result;
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use super::util::with_retry;
use crate::core::config::ProviderConfig;
use crate::core::currency::{BASE_CURRENCY, Currency, RateSnapshot, RateSource};
use crate::core::error::RateError;

/// Rate source backed by the exchangerate-api.com `v4/latest` endpoint.
pub struct ExchangeRateApiProvider {
    base_url: String,
    client: reqwest::Client,
    retries: usize,
    retry_delay: Duration,
}

impl ExchangeRateApiProvider {
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("salary-fx/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout())
            .build()?;

        Ok(ExchangeRateApiProvider {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client,
            retries: config.retries,
            retry_delay: Duration::from_millis(config.retry_delay_ms),
        })
    }

    fn url(&self) -> String {
        format!("{}/v4/latest/{}", self.base_url, BASE_CURRENCY)
    }
}

#[derive(Debug, Deserialize)]
struct LatestRatesResponse {
    base: Option<String>,
    time_last_updated: Option<i64>,
    rates: HashMap<String, f64>,
}

fn valid_rate(rate: f64) -> bool {
    rate.is_finite() && rate > 0.0
}

fn parse_snapshot(body: &str) -> Result<RateSnapshot, RateError> {
    let data: LatestRatesResponse = serde_json::from_str(body)
        .map_err(|e| RateError::Network(format!("Failed to parse rates response: {e}")))?;

    let base = data.base.unwrap_or_else(|| BASE_CURRENCY.to_string());
    if !base.eq_ignore_ascii_case(BASE_CURRENCY) {
        return Err(RateError::Network(format!(
            "Unexpected base currency {base}, expected {BASE_CURRENCY}"
        )));
    }

    // Supported currencies must be usable; anything else is only carried along
    for currency in Currency::ALL {
        if let Some(rate) = data.rates.get(currency.code()) {
            if !valid_rate(*rate) {
                return Err(RateError::Network(format!(
                    "Invalid rate {rate} for currency {currency}"
                )));
            }
        }
    }
    let rates = data
        .rates
        .into_iter()
        .filter(|(code, rate)| {
            let keep = valid_rate(*rate);
            if !keep {
                warn!(%code, %rate, "Dropping invalid rate from feed");
            }
            keep
        })
        .collect();

    let published_at = data
        .time_last_updated
        .and_then(|ts| Utc.timestamp_opt(ts, 0).single());

    Ok(RateSnapshot::new(rates)
        .with_base(BASE_CURRENCY)
        .with_published_at(published_at))
}

#[async_trait]
impl RateSource for ExchangeRateApiProvider {
    #[instrument(name = "ExchangeRateFetch", skip(self))]
    async fn fetch_rates(&self) -> Result<RateSnapshot, RateError> {
        let url = self.url();
        debug!("Requesting exchange rates from {}", url);

        let response = with_retry(
            || self.client.get(&url).send(),
            self.retries,
            self.retry_delay,
        )
        .await
        .map_err(|e| RateError::Network(format!("Request error: {e} URL: {url}")))?;

        if !response.status().is_success() {
            return Err(RateError::Network(format!(
                "HTTP error: {} URL: {}",
                response.status(),
                url
            )));
        }

        let text = response
            .text()
            .await
            .map_err(|e| RateError::Network(format!("Failed to read rates response: {e}")))?;

        let snapshot = parse_snapshot(&text)?;
        info!(currencies = snapshot.len(), "Fetched exchange rates");
        Ok(snapshot)
    }
}
