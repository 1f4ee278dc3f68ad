//! USD price lookups with static fallback

use std::sync::Arc;

use tracing::{debug, warn};

use super::PriceOracle;
use crate::domain::registry::TokenRegistry;
use crate::shared::errors::PriceError;

/// Price used for tokens missing from both the oracle and the fallback table
pub const UNKNOWN_TOKEN_PRICE: f64 = 1.0;

/// Resolves token prices through the oracle, degrading to the registry's fallback table
#[derive(Clone)]
pub struct PriceBook {
    oracle: Arc<dyn PriceOracle>,
    registry: Arc<TokenRegistry>,
}

impl PriceBook {
    pub fn new(oracle: Arc<dyn PriceOracle>, registry: Arc<TokenRegistry>) -> Self {
        Self { oracle, registry }
    }

    /// USD unit price of `symbol`. Never fails.
    pub async fn get_token_price(&self, symbol: &str) -> f64 {
        match self.fetch_oracle_price(symbol).await {
            Ok(price) => {
                debug!(token = symbol, price, oracle = self.oracle.name(), "oracle price");
                price
            }
            Err(PriceError::UnmappedToken(_)) => {
                debug!(token = symbol, "no oracle id, using fallback price");
                self.fallback_price(symbol)
            }
            Err(e) => {
                warn!(token = symbol, error = %e, "oracle price unavailable, using fallback");
                self.fallback_price(symbol)
            }
        }
    }

    /// Prices for both sides of a pair, fetched concurrently
    pub async fn get_pair_prices(&self, token_in: &str, token_out: &str) -> (f64, f64) {
        futures::future::join(
            self.get_token_price(token_in),
            self.get_token_price(token_out),
        )
        .await
    }

    pub fn fallback_price(&self, symbol: &str) -> f64 {
        self.registry
            .fallback_price(symbol)
            .unwrap_or(UNKNOWN_TOKEN_PRICE)
    }

    async fn fetch_oracle_price(&self, symbol: &str) -> Result<f64, PriceError> {
        let oracle_id = self
            .registry
            .oracle_id(symbol)
            .ok_or_else(|| PriceError::UnmappedToken(symbol.to_string()))?;

        let price = self.oracle.usd_price(oracle_id).await?;
        if price.is_finite() && price > 0.0 {
            Ok(price)
        } else {
            Err(PriceError::InvalidPriceData(oracle_id.to_string()))
        }
    }
}
