//! EIP-1193 style wallet over JSON-RPC 2.0

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::domain::execution::{TransferRequest, TxHash, TxReceipt, WalletProvider};
use crate::shared::errors::WalletError;

/// EIP-1193 "user rejected request"
const USER_REJECTED_CODE: i64 = 4001;

#[derive(Debug, Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: Value,
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    result: Option<Value>,
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RpcReceipt {
    transaction_hash: String,
    block_number: Option<String>,
    gas_used: Option<String>,
    status: Option<String>,
}

/// How long to wait for the proof transfer to be mined
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReceiptPolling {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl Default for ReceiptPolling {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(1000),
            max_attempts: 60,
        }
    }
}

pub struct JsonRpcWallet {
    http_client: Client,
    url: String,
    polling: ReceiptPolling,
    next_id: AtomicU64,
}

impl JsonRpcWallet {
    pub fn new(
        url: impl Into<String>,
        timeout: Option<Duration>,
        polling: ReceiptPolling,
    ) -> Result<Self, WalletError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            http_client: builder.build()?,
            url: url.into(),
            polling,
            next_id: AtomicU64::new(1),
        })
    }

    async fn call<T: DeserializeOwned>(&self, method: &str, params: Value) -> Result<T, WalletError> {
        let request = RpcRequest {
            jsonrpc: "2.0",
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            method,
            params,
        };
        debug!(method, id = request.id, "wallet rpc call");

        let response = self.http_client.post(&self.url).json(&request).send().await?;
        if !response.status().is_success() {
            return Err(WalletError::Provider(format!(
                "{} failed with status: {}",
                method,
                response.status()
            )));
        }

        let body: RpcResponse = response.json().await?;
        if let Some(err) = body.error {
            if err.code == USER_REJECTED_CODE {
                return Err(WalletError::Declined);
            }
            return Err(WalletError::Provider(format!(
                "{} error {}: {}",
                method, err.code, err.message
            )));
        }

        serde_json::from_value(body.result.unwrap_or(Value::Null))
            .map_err(|e| WalletError::Provider(format!("{}: malformed result: {}", method, e)))
    }
}

#[async_trait]
impl WalletProvider for JsonRpcWallet {
    async fn request_accounts(&self) -> Result<Vec<String>, WalletError> {
        self.call("eth_requestAccounts", json!([])).await
    }

    async fn chain_id(&self) -> Result<u64, WalletError> {
        let raw: String = self.call("eth_chainId", json!([])).await?;
        parse_quantity(&raw).and_then(|v| u64::try_from(v).ok()).ok_or_else(|| {
            WalletError::Provider(format!("invalid chain id: {}", raw))
        })
    }

    async fn balance(&self, address: &str) -> Result<u128, WalletError> {
        let raw: String = self.call("eth_getBalance", json!([address, "latest"])).await?;
        parse_quantity(&raw).ok_or_else(|| WalletError::Provider(format!("invalid balance: {}", raw)))
    }

    async fn send_transaction(&self, tx: &TransferRequest) -> Result<TxHash, WalletError> {
        let params = json!([{
            "from": tx.from,
            "to": tx.to,
            "value": format!("{:#x}", tx.value),
            "gas": format!("{:#x}", tx.gas_limit),
        }]);
        let raw: String = self.call("eth_sendTransaction", params).await?;
        TxHash::parse(&raw).ok_or_else(|| WalletError::Provider(format!("invalid tx hash: {}", raw)))
    }

    async fn wait_for_receipt(&self, hash: &TxHash) -> Result<Option<TxReceipt>, WalletError> {
        for attempt in 1..=self.polling.max_attempts {
            let receipt: Option<RpcReceipt> = self
                .call("eth_getTransactionReceipt", json!([hash.as_str()]))
                .await?;

            if let Some(receipt) = receipt {
                let block_number = receipt.block_number.as_deref().and_then(parse_quantity);
                if let Some(block_number) = block_number {
                    info!(tx = %hash, attempt, "receipt received");
                    let gas_used = receipt.gas_used.as_deref().and_then(parse_quantity).unwrap_or(0);
                    return Ok(Some(TxReceipt {
                        transaction_hash: TxHash::parse(&receipt.transaction_hash)
                            .unwrap_or_else(|| hash.clone()),
                        block_number: to_u64("blockNumber", block_number)?,
                        gas_used: to_u64("gasUsed", gas_used)?,
                        // pre-Byzantium receipts carry no status
                        success: receipt.status.as_deref().map_or(true, |s| parse_quantity(s) == Some(1)),
                    }));
                }
            }

            debug!(tx = %hash, attempt, "receipt pending");
            if attempt < self.polling.max_attempts {
                tokio::time::sleep(self.polling.interval).await;
            }
        }
        Ok(None)
    }
}

/// Wallet used when no provider endpoint is configured
pub struct DisconnectedWallet;

#[async_trait]
impl WalletProvider for DisconnectedWallet {
    async fn request_accounts(&self) -> Result<Vec<String>, WalletError> {
        Err(WalletError::Unavailable)
    }

    async fn chain_id(&self) -> Result<u64, WalletError> {
        Err(WalletError::Unavailable)
    }

    async fn balance(&self, _address: &str) -> Result<u128, WalletError> {
        Err(WalletError::Unavailable)
    }

    async fn send_transaction(&self, _tx: &TransferRequest) -> Result<TxHash, WalletError> {
        Err(WalletError::Unavailable)
    }

    async fn wait_for_receipt(&self, _hash: &TxHash) -> Result<Option<TxReceipt>, WalletError> {
        Err(WalletError::Unavailable)
    }
}

fn to_u64(field: &str, value: u128) -> Result<u64, WalletError> {
    u64::try_from(value)
        .map_err(|_| WalletError::Provider(format!("receipt {} {:#x} exceeds 64 bits", field, value)))
}

/// Decode a `0x`-prefixed hex quantity
pub fn parse_quantity(raw: &str) -> Option<u128> {
    let digits = raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X"))?;
    if digits.is_empty() {
        return None;
    }
    u128::from_str_radix(digits, 16).ok()
}
