//! Built-in token, pool, chain and price tables

use std::collections::HashMap;

use crate::shared::types::{ChainInfo, NativeCurrency, OriginChain, Pool, Token};

pub const DEFAULT_POOL_FEE: f64 = 0.003;

fn token(symbol: &str, name: &str, decimals: u8, origin_chain: OriginChain) -> Token {
    Token {
        symbol: symbol.to_string(),
        name: name.to_string(),
        decimals,
        origin_chain,
        address: None,
        glyph: None,
    }
}

fn pool(token_a: &str, token_b: &str) -> Pool {
    Pool {
        id: format!("{}-{}", token_a, token_b),
        token_a: token_a.to_string(),
        token_b: token_b.to_string(),
        address: "0x...".to_string(),
        fee: DEFAULT_POOL_FEE,
    }
}

fn chain(key: &str, name: &str, chain_id: Option<u64>, currency: (&str, &str, u8), rpc: &str) -> ChainInfo {
    ChainInfo {
        key: key.to_string(),
        name: name.to_string(),
        chain_id,
        native_currency: NativeCurrency {
            name: currency.0.to_string(),
            symbol: currency.1.to_string(),
            decimals: currency.2,
        },
        rpc_urls: vec![rpc.to_string()],
    }
}

/// Wrapped tokens available on Push Chain
pub fn tokens() -> Vec<Token> {
    vec![
        token("pETH", "Push Ethereum", 18, OriginChain::Ethereum),
        token("pSOL", "Push Solana", 9, OriginChain::Solana),
        token("pUSDC", "Push USDC", 6, OriginChain::Ethereum),
        token("pBNB", "Push BNB", 18, OriginChain::Bsc),
    ]
}

pub fn pools() -> Vec<Pool> {
    vec![
        pool("pETH", "pUSDC"),
        pool("pSOL", "pUSDC"),
        pool("pBNB", "pUSDC"),
    ]
}

pub fn chains() -> Vec<ChainInfo> {
    vec![
        chain("ethereum", "Ethereum", Some(1), ("Ether", "ETH", 18), "https://eth.llamarpc.com"),
        chain("solana", "Solana", None, ("Solana", "SOL", 9), "https://api.mainnet-beta.solana.com"),
        chain("bsc", "BNB Smart Chain", Some(56), ("BNB", "BNB", 18), "https://bsc-dataseed.binance.org"),
        chain(
            "push-chain",
            "Push Chain Donut Testnet",
            Some(42069),
            ("PC", "PC", 18),
            "https://evm.rpc-testnet-donut-node2.push.org/",
        ),
    ]
}

/// Intermediate tokens tried, in order, for two-hop routes
pub fn routing_tokens() -> Vec<String> {
    ["USDC", "ETH", "pUSDC"].iter().map(|s| s.to_string()).collect()
}

/// USD prices used whenever the oracle cannot answer
pub fn fallback_prices() -> HashMap<String, f64> {
    [
        ("ETH", 4151.79),
        ("SOL", 185.50),
        ("BNB", 595.20),
        ("USDC", 1.00),
        ("USDT", 0.999),
        ("DAI", 1.001),
        ("UNI", 12.80),
        ("LINK", 18.45),
        ("AAVE", 152.30),
        ("COMP", 85.60),
        ("MKR", 2150.00),
        ("SNX", 3.85),
        ("MATIC", 1.15),
        ("AVAX", 42.30),
        ("DOT", 8.95),
        ("ADA", 0.68),
        ("ATOM", 12.40),
        ("DOGE", 0.165),
        ("SHIB", 0.000028),
        ("WBTC", 98500.00),
        ("RAY", 3.20),
        ("SRM", 0.85),
        ("CAKE", 3.45),
        ("pETH", 4151.79),
        ("pSOL", 185.50),
        ("pUSDC", 1.00),
        ("pBNB", 595.20),
    ]
    .iter()
    .map(|(symbol, price)| (symbol.to_string(), *price))
    .collect()
}

/// Token symbol -> oracle canonical id. Wrapped tokens share the origin id.
pub fn oracle_ids() -> HashMap<String, String> {
    [
        ("ETH", "ethereum"),
        ("SOL", "solana"),
        ("BNB", "binancecoin"),
        ("USDC", "usd-coin"),
        ("USDT", "tether"),
        ("DAI", "dai"),
        ("UNI", "uniswap"),
        ("LINK", "chainlink"),
        ("AAVE", "aave"),
        ("MATIC", "matic-network"),
        ("AVAX", "avalanche-2"),
        ("DOT", "polkadot"),
        ("ADA", "cardano"),
        ("DOGE", "dogecoin"),
        ("SHIB", "shiba-inu"),
        ("COMP", "compound-governance-token"),
        ("MKR", "maker"),
        ("SNX", "havven"),
        ("WBTC", "wrapped-bitcoin"),
        ("ATOM", "cosmos"),
        ("RAY", "raydium"),
        ("CAKE", "pancakeswap-token"),
        ("pETH", "ethereum"),
        ("pSOL", "solana"),
        ("pUSDC", "usd-coin"),
        ("pBNB", "binancecoin"),
    ]
    .iter()
    .map(|(symbol, id)| (symbol.to_string(), id.to_string()))
    .collect()
}
