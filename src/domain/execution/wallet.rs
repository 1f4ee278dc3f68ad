//! Wallet and user-confirmation collaborators

use async_trait::async_trait;
use rust_decimal::Decimal;

use super::TxHash;
use crate::shared::errors::WalletError;

/// Plain value transfer
#[derive(Debug, Clone, PartialEq)]
pub struct TransferRequest {
    pub from: String,
    pub to: String,
    /// Wei
    pub value: u128,
    pub gas_limit: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TxReceipt {
    pub transaction_hash: TxHash,
    pub block_number: u64,
    pub gas_used: u64,
    pub success: bool,
}

/// Account discovery, chain/balance queries and transaction submission
#[async_trait]
pub trait WalletProvider: Send + Sync {
    async fn request_accounts(&self) -> Result<Vec<String>, WalletError>;

    async fn chain_id(&self) -> Result<u64, WalletError>;

    /// Native balance in wei
    async fn balance(&self, address: &str) -> Result<u128, WalletError>;

    async fn send_transaction(&self, tx: &TransferRequest) -> Result<TxHash, WalletError>;

    /// `None` if the transaction was not mined in time
    async fn wait_for_receipt(&self, hash: &TxHash) -> Result<Option<TxReceipt>, WalletError>;
}

/// What the user is asked to approve before a real transaction
#[derive(Debug, Clone, PartialEq)]
pub struct ConfirmationRequest {
    pub token_in: String,
    pub token_out: String,
    pub amount_in: Decimal,
    pub network: String,
    pub gas_symbol: String,
}

#[async_trait]
pub trait TransactionConfirmer: Send + Sync {
    async fn confirm(&self, request: &ConfirmationRequest) -> bool;
}
