//! Native-chain proof-of-concept execution through the user's wallet

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{info, warn};

use super::wallet::{ConfirmationRequest, TransactionConfirmer, TransferRequest, WalletProvider};
use super::{SwapParams, TxHash};
use crate::domain::registry::TokenRegistry;
use crate::shared::errors::WalletError;
use crate::shared::utils::{format_units, parse_units};

/// Target chain and the proof transfer parameters
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NativeChainConfig {
    #[serde(default = "default_chain_id")]
    pub chain_id: u64,
    /// Symbols whose balance is the wallet's native balance
    #[serde(default = "default_native_symbols")]
    pub native_symbols: Vec<String>,
    #[serde(default = "default_native_decimals")]
    pub native_decimals: u32,
    /// Native units kept aside for gas
    #[serde(default = "default_gas_reserve")]
    pub gas_reserve: Decimal,
    /// Value of the self-transfer standing in for the swap
    #[serde(default = "default_proof_amount")]
    pub proof_amount: Decimal,
    #[serde(default = "default_gas_limit")]
    pub gas_limit: u64,
}

fn default_chain_id() -> u64 {
    42069
}

fn default_native_symbols() -> Vec<String> {
    vec!["PUSH".to_string(), "ETH".to_string()]
}

fn default_native_decimals() -> u32 {
    18
}

fn default_gas_reserve() -> Decimal {
    Decimal::new(1, 3)
}

fn default_proof_amount() -> Decimal {
    Decimal::new(1, 5)
}

fn default_gas_limit() -> u64 {
    21_000
}

impl Default for NativeChainConfig {
    fn default() -> Self {
        Self {
            chain_id: default_chain_id(),
            native_symbols: default_native_symbols(),
            native_decimals: default_native_decimals(),
            gas_reserve: default_gas_reserve(),
            proof_amount: default_proof_amount(),
            gas_limit: default_gas_limit(),
        }
    }
}

/// Connected wallet on the target chain
#[derive(Debug, Clone, PartialEq)]
pub struct ChainSession {
    pub account: String,
    pub chain_id: u64,
}

pub struct NativeChainSwap {
    wallet: Arc<dyn WalletProvider>,
    confirmer: Arc<dyn TransactionConfirmer>,
    registry: Arc<TokenRegistry>,
    config: NativeChainConfig,
}

impl NativeChainSwap {
    pub fn new(
        wallet: Arc<dyn WalletProvider>,
        confirmer: Arc<dyn TransactionConfirmer>,
        registry: Arc<TokenRegistry>,
        config: NativeChainConfig,
    ) -> Self {
        Self {
            wallet,
            confirmer,
            registry,
            config,
        }
    }

    /// Verify the wallet is on the target chain and expose an account
    pub async fn connect(&self) -> Result<ChainSession, WalletError> {
        let chain_id = self.wallet.chain_id().await?;
        info!(
            chain_id,
            network = %self.registry.chain_name(chain_id),
            required = self.config.chain_id,
            "wallet network"
        );

        if chain_id != self.config.chain_id {
            warn!(
                "wrong network: switch the wallet to {} (chain id {})",
                self.registry.chain_name(self.config.chain_id),
                self.config.chain_id
            );
            return Err(WalletError::NetworkMismatch {
                expected: self.config.chain_id,
                actual: chain_id,
            });
        }

        let account = self
            .wallet
            .request_accounts()
            .await?
            .into_iter()
            .next()
            .ok_or(WalletError::NoAccount)?;

        Ok(ChainSession { account, chain_id })
    }

    /// Balance-gated, user-confirmed self-transfer standing in for the swap
    pub async fn execute_proof_transfer(
        &self,
        session: &ChainSession,
        params: &SwapParams,
        min_amount_out: Decimal,
    ) -> Result<TxHash, WalletError> {
        let decimals = self.config.native_decimals;
        let gas_symbol = self.gas_symbol(session.chain_id);
        let balance = self.wallet.balance(&session.account).await?;
        info!(
            account = %session.account,
            balance = %format_units(balance, decimals),
            symbol = %gas_symbol,
            "wallet balance"
        );

        let gas_reserve = self.to_wei(self.config.gas_reserve)?;

        if self.is_native(&params.token_in) {
            let required = self.to_wei(params.amount_in)?.saturating_add(gas_reserve);
            if balance < required {
                return Err(WalletError::InsufficientBalance {
                    token: params.token_in.clone(),
                    available: balance,
                    required,
                });
            }
        }

        if balance < gas_reserve {
            return Err(WalletError::InsufficientBalance {
                token: gas_symbol,
                available: balance,
                required: gas_reserve,
            });
        }

        let request = ConfirmationRequest {
            token_in: params.token_in.clone(),
            token_out: params.token_out.clone(),
            amount_in: params.amount_in,
            network: self.registry.chain_name(session.chain_id),
            gas_symbol,
        };
        if !self.confirmer.confirm(&request).await {
            info!("real transaction declined");
            return Err(WalletError::Declined);
        }

        let transfer = TransferRequest {
            from: session.account.clone(),
            to: session.account.clone(),
            value: self.to_wei(self.config.proof_amount)?,
            gas_limit: self.config.gas_limit,
        };
        let hash = self.wallet.send_transaction(&transfer).await?;
        info!(
            tx = %hash,
            min_amount_out = %min_amount_out,
            "proof transfer sent for {} {} -> {}", params.amount_in, params.token_in, params.token_out
        );

        match self.wallet.wait_for_receipt(&hash).await? {
            Some(receipt) if receipt.success => {
                info!(
                    tx = %hash,
                    block = receipt.block_number,
                    gas_used = receipt.gas_used,
                    "proof transfer confirmed"
                );
                Ok(hash)
            }
            _ => Err(WalletError::NotConfirmed(hash.to_string())),
        }
    }

    fn is_native(&self, symbol: &str) -> bool {
        self.config.native_symbols.iter().any(|s| s == symbol)
    }

    fn gas_symbol(&self, chain_id: u64) -> String {
        self.registry
            .chain_by_id(chain_id)
            .map(|c| c.native_currency.symbol.clone())
            .unwrap_or_else(|| "PUSH".to_string())
    }

    fn to_wei(&self, amount: Decimal) -> Result<u128, WalletError> {
        parse_units(amount, self.config.native_decimals)
            .ok_or_else(|| WalletError::Provider(format!("amount {} out of range", amount)))
    }
}
