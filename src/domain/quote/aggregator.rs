//! Simulated aggregator sources

use std::time::Duration;

use serde::Deserialize;

use super::QuoteSource;

/// A simulated DEX aggregator: fixed latency, rate multiplier, fee and impact
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AggregatorSource {
    pub source: QuoteSource,
    /// Source is consulted when either side of the pair is one of these
    pub trigger_symbols: Vec<String>,
    pub latency_ms: u64,
    pub multiplier: f64,
    pub fee_rate: f64,
    pub price_impact: f64,
}

impl AggregatorSource {
    pub fn matches(&self, token_in: &str, token_out: &str) -> bool {
        self.trigger_symbols
            .iter()
            .any(|s| s == token_in || s == token_out)
    }

    pub fn latency(&self) -> Duration {
        Duration::from_millis(self.latency_ms)
    }
}

fn source(
    source: QuoteSource,
    trigger: &str,
    latency_ms: u64,
    multiplier: f64,
    fee_rate: f64,
    price_impact: f64,
) -> AggregatorSource {
    AggregatorSource {
        source,
        trigger_symbols: vec![trigger.to_string()],
        latency_ms,
        multiplier,
        fee_rate,
        price_impact,
    }
}

/// 1inch for Ethereum assets, Jupiter for Solana, PancakeSwap for BSC
pub fn default_sources() -> Vec<AggregatorSource> {
    vec![
        source(QuoteSource::OneInch, "pETH", 200, 1.02, 0.002, 0.15),
        source(QuoteSource::Jupiter, "pSOL", 160, 1.015, 0.0015, 0.12),
        source(QuoteSource::PancakeSwap, "pBNB", 180, 1.01, 0.0025, 0.2),
    ]
}
