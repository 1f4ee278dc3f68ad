//! Quote domain - routing, pricing and quote selection

mod aggregator;
mod pricing;
mod quote_engine;
mod route;

pub use aggregator::{default_sources, AggregatorSource};
pub use pricing::{
    calculate_fee, calculate_minimum_output, calculate_price_impact, is_stable_symbol,
    DEFAULT_SLIPPAGE_PERCENT, OUTPUT_HAIRCUT,
};
pub use quote_engine::{select_best_quote, QuoteEngine, QuoteSettings};
pub use route::find_best_route;

use std::fmt;

use rand::Rng;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::shared::types::Pool;

/// Where a quote came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuoteSource {
    #[serde(rename = "1inch")]
    OneInch,
    #[serde(rename = "jupiter")]
    Jupiter,
    #[serde(rename = "pancakeswap")]
    PancakeSwap,
    #[serde(rename = "direct")]
    Direct,
}

impl QuoteSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuoteSource::OneInch => "1inch",
            QuoteSource::Jupiter => "jupiter",
            QuoteSource::PancakeSwap => "pancakeswap",
            QuoteSource::Direct => "direct",
        }
    }
}

impl fmt::Display for QuoteSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Computed terms of a prospective swap
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Quote {
    pub token_in: String,
    pub token_out: String,
    pub amount_in: Decimal,
    pub amount_out: Decimal,
    /// Denominated in the input token
    pub fee: Decimal,
    /// Percent
    pub price_impact: f64,
    pub minimum_amount_out: Decimal,
    pub route: Vec<Pool>,
    pub source: QuoteSource,
}

/// Random rate variation applied to oracle-derived outputs
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Jitter {
    Disabled,
    /// Uniform multiplier in `[1 - w, 1 + w]`
    Uniform(f64),
}

impl Jitter {
    pub fn from_width(width: f64) -> Self {
        if width > 0.0 {
            Jitter::Uniform(width)
        } else {
            Jitter::Disabled
        }
    }

    pub fn sample(&self) -> f64 {
        match *self {
            Jitter::Disabled => 1.0,
            Jitter::Uniform(width) => 1.0 + rand::thread_rng().gen_range(-width..=width),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jitter_bounds() {
        assert_eq!(Jitter::from_width(0.0), Jitter::Disabled);
        assert_eq!(Jitter::Disabled.sample(), 1.0);

        let jitter = Jitter::from_width(0.001);
        for _ in 0..1000 {
            let m = jitter.sample();
            assert!((0.999..=1.001).contains(&m));
        }
    }

    #[test]
    fn test_source_serde_names() {
        assert_eq!(serde_json::to_string(&QuoteSource::OneInch).unwrap(), "\"1inch\"");
        let parsed: QuoteSource = serde_json::from_str("\"pancakeswap\"").unwrap();
        assert_eq!(parsed, QuoteSource::PancakeSwap);
    }

    #[test]
    fn test_display_matches_serde_name() {
        for source in [
            QuoteSource::OneInch,
            QuoteSource::Jupiter,
            QuoteSource::PancakeSwap,
            QuoteSource::Direct,
        ] {
            let json = serde_json::to_string(&source).unwrap();
            assert_eq!(json, format!("\"{}\"", source));
        }
    }
}
