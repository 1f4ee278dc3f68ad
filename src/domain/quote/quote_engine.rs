//! Quote engine - simulated multi-aggregator quoting with a direct fallback

use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::{debug, info};

use super::aggregator::AggregatorSource;
use super::pricing::{
    calculate_fee, calculate_minimum_output, calculate_price_impact, DEFAULT_SLIPPAGE_PERCENT,
    OUTPUT_HAIRCUT,
};
use super::route::find_best_route;
use super::{Jitter, Quote, QuoteSource};
use crate::domain::price::PriceBook;
use crate::domain::registry::TokenRegistry;
use crate::shared::errors::QuoteError;
use crate::shared::types::Pool;
use crate::shared::utils::{decimal_to_f64, to_amount};

/// Tunables for quote generation
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteSettings {
    pub jitter: Jitter,
    /// Sleep for each aggregator's latency before answering
    pub simulate_latency: bool,
}

impl Default for QuoteSettings {
    fn default() -> Self {
        Self {
            jitter: Jitter::Uniform(0.001),
            simulate_latency: true,
        }
    }
}

pub struct QuoteEngine {
    registry: Arc<TokenRegistry>,
    prices: PriceBook,
    sources: Vec<AggregatorSource>,
    settings: QuoteSettings,
}

impl QuoteEngine {
    pub fn new(
        registry: Arc<TokenRegistry>,
        prices: PriceBook,
        sources: Vec<AggregatorSource>,
        settings: QuoteSettings,
    ) -> Self {
        Self {
            registry,
            prices,
            sources,
            settings,
        }
    }

    pub fn registry(&self) -> &TokenRegistry {
        &self.registry
    }

    /// Best simulated aggregator quote, or a direct quote when no aggregator covers the pair.
    /// Callers must pass distinct tokens and a positive amount.
    pub async fn get_quote(
        &self,
        token_in: &str,
        token_out: &str,
        amount_in: Decimal,
    ) -> Result<Quote, QuoteError> {
        let quotes = self.fetch_aggregator_quotes(token_in, token_out, amount_in).await?;

        if let Some(best) = select_best_quote(quotes) {
            info!(
                source = %best.source,
                amount_out = %best.amount_out,
                "{} {} -> {}: best aggregator quote", amount_in, token_in, token_out
            );
            return Ok(best);
        }

        let quote = self.direct_quote(token_in, token_out, amount_in).await?;
        info!(
            amount_out = %quote.amount_out,
            hops = quote.route.len(),
            "{} {} -> {}: direct quote", amount_in, token_in, token_out
        );
        Ok(quote)
    }

    pub fn find_best_route(&self, token_in: &str, token_out: &str) -> Vec<Pool> {
        find_best_route(&self.registry, token_in, token_out)
    }

    /// Oracle-priced conversion with jitter and the flat slippage haircut
    pub async fn calculate_output_amount(
        &self,
        amount_in: Decimal,
        token_in: &str,
        token_out: &str,
    ) -> Result<Decimal, QuoteError> {
        let (price_in, price_out) = self.prices.get_pair_prices(token_in, token_out).await;

        let usd_value = decimal_to_f64(amount_in) * price_in;
        let base_output = usd_value / price_out;
        let output = base_output * self.settings.jitter.sample() * OUTPUT_HAIRCUT;

        debug!(
            token_in,
            token_out,
            price_in,
            price_out,
            usd_value,
            output,
            "oracle conversion"
        );
        to_amount(output).ok_or_else(|| out_of_range(amount_in, token_in))
    }

    async fn fetch_aggregator_quotes(
        &self,
        token_in: &str,
        token_out: &str,
        amount_in: Decimal,
    ) -> Result<Vec<Quote>, QuoteError> {
        let mut quotes = Vec::new();
        for source in self.sources.iter().filter(|s| s.matches(token_in, token_out)) {
            quotes.push(self.simulate_source(source, token_in, token_out, amount_in).await?);
        }
        Ok(quotes)
    }

    async fn simulate_source(
        &self,
        source: &AggregatorSource,
        token_in: &str,
        token_out: &str,
        amount_in: Decimal,
    ) -> Result<Quote, QuoteError> {
        if self.settings.simulate_latency {
            tokio::time::sleep(source.latency()).await;
        }

        let route = self.find_best_route(token_in, token_out);
        let base_output = self.calculate_output_amount(amount_in, token_in, token_out).await?;
        let overflow = || out_of_range(amount_in, token_in);

        debug!(source = %source.source, base_output = %base_output, "aggregator quote");
        Ok(Quote {
            token_in: token_in.to_string(),
            token_out: token_out.to_string(),
            amount_in,
            amount_out: to_amount(decimal_to_f64(base_output) * source.multiplier)
                .ok_or_else(overflow)?,
            fee: to_amount(decimal_to_f64(amount_in) * source.fee_rate).ok_or_else(overflow)?,
            price_impact: source.price_impact,
            // aggregators quote their minimum off the pre-multiplier output
            minimum_amount_out: calculate_minimum_output(base_output, DEFAULT_SLIPPAGE_PERCENT)
                .ok_or_else(overflow)?,
            route,
            source: source.source,
        })
    }

    async fn direct_quote(
        &self,
        token_in: &str,
        token_out: &str,
        amount_in: Decimal,
    ) -> Result<Quote, QuoteError> {
        let route = self.find_best_route(token_in, token_out);
        if route.iter().any(Pool::is_synthetic) {
            debug!(token_in, token_out, "no configured route, using synthetic pool");
        }

        let amount_out = self.calculate_output_amount(amount_in, token_in, token_out).await?;
        let overflow = || out_of_range(amount_in, token_in);
        let fee = calculate_fee(amount_in, &route).ok_or_else(overflow)?;
        let price_impact = calculate_price_impact(amount_in, amount_out, token_in, token_out);
        let minimum_amount_out =
            calculate_minimum_output(amount_out, DEFAULT_SLIPPAGE_PERCENT).ok_or_else(overflow)?;

        Ok(Quote {
            token_in: token_in.to_string(),
            token_out: token_out.to_string(),
            amount_in,
            amount_out,
            fee,
            price_impact,
            minimum_amount_out,
            route,
            source: QuoteSource::Direct,
        })
    }
}

fn out_of_range(amount_in: Decimal, token_in: &str) -> QuoteError {
    QuoteError::InvalidRequest(format!(
        "{} {} is too large to quote at 6 decimal places",
        amount_in, token_in
    ))
}

/// Highest output wins; ties keep the earlier quote
pub fn select_best_quote(quotes: Vec<Quote>) -> Option<Quote> {
    quotes.into_iter().fold(None, |best, current| match best {
        Some(best) if current.amount_out <= best.amount_out => Some(best),
        _ => Some(current),
    })
}
