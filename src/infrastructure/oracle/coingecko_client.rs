//! CoinGecko simple-price client

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::domain::price::PriceOracle;
use crate::shared::errors::PriceError;

pub const DEFAULT_ORACLE_URL: &str = "https://api.coingecko.com/api/v3";

/// `{ "<id>": { "usd": <number> } }`
#[derive(Debug, Deserialize)]
struct UsdQuote {
    usd: Option<f64>,
}

type SimplePriceResponse = HashMap<String, UsdQuote>;

pub struct CoinGeckoClient {
    http_client: Client,
    base_url: String,
}

impl CoinGeckoClient {
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> Result<Self, PriceError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            http_client: builder.build()?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl PriceOracle for CoinGeckoClient {
    fn name(&self) -> &str {
        "coingecko"
    }

    async fn usd_price(&self, oracle_id: &str) -> Result<f64, PriceError> {
        let url = format!("{}/simple/price", self.base_url);
        debug!(url = %url, id = oracle_id, "fetching oracle price");

        let response = self
            .http_client
            .get(&url)
            .query(&[("ids", oracle_id), ("vs_currencies", "usd")])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(PriceError::FeedUnavailable(format!(
                "oracle request failed with status: {}",
                response.status()
            )));
        }

        let body: SimplePriceResponse = response
            .json()
            .await
            .map_err(|e| PriceError::InvalidPriceData(format!("{}: {}", oracle_id, e)))?;

        body.get(oracle_id)
            .and_then(|quote| quote.usd)
            .ok_or_else(|| PriceError::InvalidPriceData(oracle_id.to_string()))
    }
}
