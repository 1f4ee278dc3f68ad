//! Simulated external DEX execution venues

use std::time::Duration;

use serde::Deserialize;

use crate::domain::quote::QuoteSource;
use crate::shared::utils::{now_millis, random_base36, random_hex, to_base36};

/// An external DEX reachable in real-execution mode
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DexVenue {
    pub source: QuoteSource,
    /// Pairs touching one of these symbols are routed to this venue
    pub trigger_symbols: Vec<String>,
    pub delay_ms: u64,
}

impl DexVenue {
    pub fn matches(&self, token_in: &str, token_out: &str) -> bool {
        self.trigger_symbols
            .iter()
            .any(|s| s == token_in || s == token_out)
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    /// Pseudo-hash with the venue's recognizable shape
    pub fn synthesize_reference(&self) -> String {
        let now = now_millis();
        match self.source {
            QuoteSource::OneInch => format!("0x1inch{}{:x}", random_hex(8), now),
            QuoteSource::Jupiter => format!("{}{}jupiter", random_base36(8), to_base36(now)),
            QuoteSource::PancakeSwap => format!("0xcake{}{:x}", random_hex(8), now),
            QuoteSource::Direct => format!("0xdirect{}{:x}", random_hex(8), now),
        }
    }
}

fn venue(source: QuoteSource, trigger: &str, delay_ms: u64) -> DexVenue {
    DexVenue {
        source,
        trigger_symbols: vec![trigger.to_string()],
        delay_ms,
    }
}

/// Checked in order; the first match wins
pub fn default_venues() -> Vec<DexVenue> {
    vec![
        venue(QuoteSource::OneInch, "pETH", 3000),
        venue(QuoteSource::Jupiter, "pSOL", 2500),
        venue(QuoteSource::PancakeSwap, "pBNB", 2200),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::execution::ExecutionResult;

    #[test]
    fn test_references_classify_back_to_venue() {
        for venue in default_venues() {
            let reference = venue.synthesize_reference();
            match ExecutionResult::classify(&reference) {
                ExecutionResult::ExternalDex { venue: v, .. } => assert_eq!(v, venue.source),
                other => panic!("unexpected classification {:?}", other),
            }
        }
    }

    #[test]
    fn test_first_matching_venue() {
        let venues = default_venues();
        let hit = venues.iter().find(|v| v.matches("pSOL", "pETH"));
        assert_eq!(hit.map(|v| v.source), Some(QuoteSource::OneInch));
        assert!(venues.iter().all(|v| !v.matches("pUSDC", "USDT")));
    }
}
