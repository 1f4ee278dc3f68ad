//! Execution domain - swap dispatch, wallet proof transfers and venue simulation

mod dex_venue;
mod native_swap;
mod outcome;
mod swap_dispatcher;
mod wallet;

pub use dex_venue::{default_venues, DexVenue};
pub use native_swap::{ChainSession, NativeChainConfig, NativeChainSwap};
pub use outcome::{ExecutionResult, Sentinel, TxHash, DEMO_HASH_PREFIX};
pub use swap_dispatcher::SwapDispatcher;
pub use wallet::{
    ConfirmationRequest, TransactionConfirmer, TransferRequest, TxReceipt, WalletProvider,
};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// Swap execution request
#[derive(Debug, Clone, PartialEq)]
pub struct SwapParams {
    pub token_in: String,
    pub token_out: String,
    pub amount_in: Decimal,
    /// Percent
    pub slippage_tolerance: f64,
    pub recipient: String,
    pub deadline: DateTime<Utc>,
}

/// How a swap is carried out, fixed when the dispatcher is built
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionMode {
    /// Simulated external DEX execution
    RealDex,
    /// Wallet self-transfer on the native chain
    #[default]
    NativeDemo,
}

impl ExecutionMode {
    pub fn from_flag(real_dex_enabled: bool) -> Self {
        if real_dex_enabled {
            ExecutionMode::RealDex
        } else {
            ExecutionMode::NativeDemo
        }
    }
}
