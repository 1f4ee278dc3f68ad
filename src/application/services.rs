//! Application services and use cases

use std::str::FromStr;
use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::{info, info_span, Instrument};

use crate::domain::execution::{ExecutionResult, SwapDispatcher, SwapParams};
use crate::domain::quote::{Quote, QuoteEngine};
use crate::domain::registry::TokenRegistry;
use crate::shared::errors::{AppError, QuoteError};
use crate::shared::utils::generate_id;

/// Largest accepted input amount (one billion tokens). Outputs must fit 6
/// fractional digits after conversion at any oracle price ratio seen in practice.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

/// Parse user-entered amount text into a positive decimal
pub fn parse_amount(raw: &str) -> Result<Decimal, QuoteError> {
    let amount = Decimal::from_str(raw.trim())
        .map_err(|_| QuoteError::InvalidRequest(format!("amount is not a number: {:?}", raw)))?;
    check_amount(amount)?;
    Ok(amount)
}

fn check_amount(amount: Decimal) -> Result<(), QuoteError> {
    if amount <= Decimal::ZERO {
        return Err(QuoteError::InvalidRequest(format!(
            "amount must be positive, got {}",
            amount
        )));
    }
    if amount > MAX_AMOUNT {
        return Err(QuoteError::InvalidRequest(format!(
            "amount {} exceeds the maximum of {}",
            amount, MAX_AMOUNT
        )));
    }
    Ok(())
}

/// Entry point for quoting and executing swaps
pub struct SwapService {
    engine: Arc<QuoteEngine>,
    dispatcher: SwapDispatcher,
}

impl SwapService {
    pub fn new(engine: Arc<QuoteEngine>, dispatcher: SwapDispatcher) -> Self {
        Self { engine, dispatcher }
    }

    pub fn registry(&self) -> &TokenRegistry {
        self.engine.registry()
    }

    pub async fn get_quote(
        &self,
        token_in: &str,
        token_out: &str,
        amount_in: &str,
    ) -> Result<Quote, QuoteError> {
        self.validate_pair(token_in, token_out)?;
        let amount_in = parse_amount(amount_in)?;
        self.engine.get_quote(token_in, token_out, amount_in).await
    }

    pub async fn execute_swap(&self, params: &SwapParams) -> Result<ExecutionResult, AppError> {
        self.validate_pair(&params.token_in, &params.token_out)?;
        check_amount(params.amount_in)?;
        if !(0.0..=100.0).contains(&params.slippage_tolerance) {
            return Err(QuoteError::InvalidRequest(format!(
                "slippage tolerance must be within 0-100%, got {}",
                params.slippage_tolerance
            ))
            .into());
        }
        if params.recipient.trim().is_empty() {
            return Err(QuoteError::InvalidRequest("recipient is empty".to_string()).into());
        }

        let span = info_span!("swap", attempt = %generate_id());
        async {
            let result = self.dispatcher.execute_swap(params).await?;
            info!(result = %result, genuine = result.is_genuine(), "swap finished");
            Ok::<_, AppError>(result)
        }
        .instrument(span)
        .await
    }

    fn validate_pair(&self, token_in: &str, token_out: &str) -> Result<(), QuoteError> {
        let registry = self.engine.registry();
        for symbol in [token_in, token_out] {
            if !registry.contains(symbol) {
                return Err(QuoteError::UnknownToken(symbol.to_string()));
            }
        }
        if token_in == token_out {
            return Err(QuoteError::InvalidRequest(format!(
                "cannot swap {} for itself",
                token_in
            )));
        }
        Ok(())
    }
}
