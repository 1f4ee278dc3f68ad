//! Price feed interface

use async_trait::async_trait;

use crate::shared::errors::PriceError;

/// External USD price source keyed by the oracle's canonical token id
#[async_trait]
pub trait PriceOracle: Send + Sync {
    fn name(&self) -> &str;

    async fn usd_price(&self, oracle_id: &str) -> Result<f64, PriceError>;
}

/// Oracle that never answers, forcing the fallback table
pub struct OfflineOracle;

#[async_trait]
impl PriceOracle for OfflineOracle {
    fn name(&self) -> &str {
        "offline"
    }

    async fn usd_price(&self, _oracle_id: &str) -> Result<f64, PriceError> {
        Err(PriceError::FeedUnavailable("offline mode".to_string()))
    }
}
