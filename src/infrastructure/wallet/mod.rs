//! Wallet provider and confirmation adapters

pub mod confirm;
pub mod json_rpc_wallet;

pub use confirm::{AutoConfirm, StdinConfirmer};
pub use json_rpc_wallet::{DisconnectedWallet, JsonRpcWallet, ReceiptPolling};
