//! Common types used across the application

use serde::{Deserialize, Serialize};

/// Address used for pools synthesized when no configured route exists
pub const SYNTHETIC_POOL_ADDRESS: &str = "0x0000";

/// Chain a wrapped token originates from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OriginChain {
    Ethereum,
    Solana,
    Bsc,
    PushChain,
}

impl OriginChain {
    pub fn as_str(&self) -> &'static str {
        match self {
            OriginChain::Ethereum => "ethereum",
            OriginChain::Solana => "solana",
            OriginChain::Bsc => "bsc",
            OriginChain::PushChain => "push-chain",
        }
    }
}

/// Token representation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Token {
    pub symbol: String,
    pub name: String,
    pub decimals: u8,
    pub origin_chain: OriginChain,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub glyph: Option<String>,
}

impl Token {
    /// Short badge shown next to the symbol, `pETH` -> `ET` unless configured
    pub fn glyph(&self) -> String {
        match &self.glyph {
            Some(glyph) => glyph.clone(),
            None => self.symbol.chars().skip(1).take(2).collect(),
        }
    }
}

/// Liquidity pool over an unordered token pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pool {
    pub id: String,
    pub token_a: String,
    pub token_b: String,
    pub address: String,
    /// Fraction of the input amount, e.g. 0.003
    pub fee: f64,
}

impl Pool {
    pub fn synthetic(token_in: &str, token_out: &str, fee: f64) -> Self {
        Self {
            id: format!("{}-{}", token_in, token_out),
            token_a: token_in.to_string(),
            token_b: token_out.to_string(),
            address: SYNTHETIC_POOL_ADDRESS.to_string(),
            fee,
        }
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.token_a == symbol || self.token_b == symbol
    }

    /// True if the pool joins `x` and `y` in either order
    pub fn connects(&self, x: &str, y: &str) -> bool {
        (self.token_a == x && self.token_b == y) || (self.token_a == y && self.token_b == x)
    }

    pub fn is_synthetic(&self) -> bool {
        self.address == SYNTHETIC_POOL_ADDRESS
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NativeCurrency {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

/// Network metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainInfo {
    pub key: String,
    pub name: String,
    /// EVM chain id, `None` for non-EVM networks
    #[serde(default)]
    pub chain_id: Option<u64>,
    pub native_currency: NativeCurrency,
    #[serde(default)]
    pub rpc_urls: Vec<String>,
}
