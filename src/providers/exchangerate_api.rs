use anyhow::{Result, anyhow};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument};

use crate::core::currency::{Currency, RateSource};

pub const DEFAULT_BASE_URL: &str = "https://api.exchangerate-api.com";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

// Fetches USD based rates from exchangerate-api.com and picks INR
pub struct ExchangeRateApiProvider {
    base_url: String,
    timeout: Duration,
}

impl ExchangeRateApiProvider {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        ExchangeRateApiProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        }
    }
}

impl Default for ExchangeRateApiProvider {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL, DEFAULT_TIMEOUT)
    }
}

#[derive(Debug, Deserialize)]
struct LatestRatesResponse {
    rates: Rates,
}

#[derive(Debug, Deserialize)]
struct Rates {
    #[serde(rename = "INR")]
    inr: f64,
}

#[async_trait]
impl RateSource for ExchangeRateApiProvider {
    #[instrument(name = "ExchangeRateApiFetch", skip(self))]
    async fn fetch_rate(&self) -> Result<f64> {
        let base = Currency::Usd.code();
        let url = format!("{}/v4/latest/{}", self.base_url, base);
        debug!("Requesting exchange rates from {}", url);

        let client = reqwest::Client::builder()
            .user_agent(concat!("inr-usd-converter/", env!("CARGO_PKG_VERSION")))
            .timeout(self.timeout)
            .build()?;

        let response = client
            .get(&url)
            .send()
            .await
            .map_err(|e| anyhow!("Request error: {} for base currency: {}", e, base))?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "HTTP error: {} for base currency: {}",
                response.status(),
                base
            ));
        }

        let text = response.text().await?;

        let data: LatestRatesResponse = serde_json::from_str(&text)
            .map_err(|e| anyhow!("Failed to parse JSON response for {}: {}", base, e))?;

        debug!(rate = data.rates.inr, "Received exchange rate");
        Ok(data.rates.inr)
    }
}
