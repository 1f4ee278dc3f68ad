//! Debounced quoting for streaming input

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use super::services::SwapService;
use crate::domain::quote::Quote;
use crate::shared::errors::QuoteError;

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

/// Only the latest request gets an answer; superseded ones resolve to `None`
pub struct QuoteSession {
    service: Arc<SwapService>,
    debounce: Duration,
    generation: AtomicU64,
}

impl QuoteSession {
    pub fn new(service: Arc<SwapService>, debounce: Duration) -> Self {
        Self {
            service,
            debounce,
            generation: AtomicU64::new(0),
        }
    }

    pub async fn request(
        &self,
        token_in: &str,
        token_out: &str,
        amount_in: &str,
    ) -> Result<Option<Quote>, QuoteError> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        tokio::time::sleep(self.debounce).await;
        if self.is_stale(generation) {
            debug!(generation, "quote request superseded before quoting");
            return Ok(None);
        }

        let quote = self.service.get_quote(token_in, token_out, amount_in).await?;
        if self.is_stale(generation) {
            debug!(generation, "dropping stale quote");
            return Ok(None);
        }
        Ok(Some(quote))
    }

    fn is_stale(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) != generation
    }
}
