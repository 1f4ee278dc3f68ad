//! Token registry - static token, pool, chain and price tables

pub mod defaults;

use std::collections::HashMap;

use serde::Deserialize;

use crate::shared::errors::ConfigError;
use crate::shared::types::{ChainInfo, Pool, Token};

/// Registry tables as loaded from the `[registry]` config section
#[derive(Debug, Clone, Deserialize)]
pub struct RegistryConfig {
    #[serde(default = "defaults::tokens")]
    pub tokens: Vec<Token>,
    #[serde(default = "defaults::pools")]
    pub pools: Vec<Pool>,
    #[serde(default = "defaults::chains")]
    pub chains: Vec<ChainInfo>,
    #[serde(default = "defaults::routing_tokens")]
    pub routing_tokens: Vec<String>,
    #[serde(default = "defaults::fallback_prices")]
    pub fallback_prices: HashMap<String, f64>,
    #[serde(default = "defaults::oracle_ids")]
    pub oracle_ids: HashMap<String, String>,
    #[serde(default = "default_synthetic_fee")]
    pub synthetic_pool_fee: f64,
}

fn default_synthetic_fee() -> f64 {
    defaults::DEFAULT_POOL_FEE
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            tokens: defaults::tokens(),
            pools: defaults::pools(),
            chains: defaults::chains(),
            routing_tokens: defaults::routing_tokens(),
            fallback_prices: defaults::fallback_prices(),
            oracle_ids: defaults::oracle_ids(),
            synthetic_pool_fee: defaults::DEFAULT_POOL_FEE,
        }
    }
}

/// Immutable lookup tables shared by the quote engine and the dispatcher
#[derive(Debug, Clone)]
pub struct TokenRegistry {
    tokens: Vec<Token>,
    index: HashMap<String, usize>,
    pools: Vec<Pool>,
    chains: Vec<ChainInfo>,
    routing_tokens: Vec<String>,
    fallback_prices: HashMap<String, f64>,
    oracle_ids: HashMap<String, String>,
    synthetic_pool_fee: f64,
}

fn check_fee(pool: &str, fee: f64) -> Result<(), ConfigError> {
    if (0.0..1.0).contains(&fee) {
        Ok(())
    } else {
        Err(ConfigError::InvalidFeeRate {
            pool: pool.to_string(),
            fee,
        })
    }
}

impl TokenRegistry {
    /// Build the registry, rejecting pools over unknown tokens or with a fee outside [0, 1)
    pub fn from_config(cfg: &RegistryConfig) -> Result<Self, ConfigError> {
        let mut index = HashMap::new();
        for (i, token) in cfg.tokens.iter().enumerate() {
            if index.insert(token.symbol.clone(), i).is_some() {
                return Err(ConfigError::InvalidValue {
                    key: "registry.tokens".to_string(),
                    value: format!("duplicate symbol {}", token.symbol),
                });
            }
        }

        for pool in &cfg.pools {
            for symbol in [&pool.token_a, &pool.token_b] {
                if !index.contains_key(symbol) {
                    return Err(ConfigError::UnknownPoolToken {
                        pool: pool.id.clone(),
                        token: symbol.clone(),
                    });
                }
            }
            check_fee(&pool.id, pool.fee)?;
        }
        check_fee("synthetic", cfg.synthetic_pool_fee)?;

        for (symbol, price) in &cfg.fallback_prices {
            if !(price.is_finite() && *price > 0.0) {
                return Err(ConfigError::InvalidValue {
                    key: format!("registry.fallback_prices.{}", symbol),
                    value: price.to_string(),
                });
            }
        }

        Ok(Self {
            tokens: cfg.tokens.clone(),
            index,
            pools: cfg.pools.clone(),
            chains: cfg.chains.clone(),
            routing_tokens: cfg.routing_tokens.clone(),
            fallback_prices: cfg.fallback_prices.clone(),
            oracle_ids: cfg.oracle_ids.clone(),
            synthetic_pool_fee: cfg.synthetic_pool_fee,
        })
    }

    pub fn token(&self, symbol: &str) -> Option<&Token> {
        self.index.get(symbol).map(|&i| &self.tokens[i])
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.index.contains_key(symbol)
    }

    /// Tokens in configuration order
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn pools(&self) -> &[Pool] {
        &self.pools
    }

    /// First pool joining the two symbols in either order
    pub fn find_pool(&self, x: &str, y: &str) -> Option<&Pool> {
        self.pools.iter().find(|pool| pool.connects(x, y))
    }

    pub fn routing_tokens(&self) -> &[String] {
        &self.routing_tokens
    }

    pub fn synthetic_pool_fee(&self) -> f64 {
        self.synthetic_pool_fee
    }

    pub fn fallback_price(&self, symbol: &str) -> Option<f64> {
        self.fallback_prices.get(symbol).copied()
    }

    pub fn oracle_id(&self, symbol: &str) -> Option<&str> {
        self.oracle_ids.get(symbol).map(String::as_str)
    }

    pub fn chains(&self) -> &[ChainInfo] {
        &self.chains
    }

    pub fn chain_by_id(&self, chain_id: u64) -> Option<&ChainInfo> {
        self.chains.iter().find(|c| c.chain_id == Some(chain_id))
    }

    pub fn chain_name(&self, chain_id: u64) -> String {
        self.chain_by_id(chain_id)
            .map(|c| c.name.clone())
            .unwrap_or_else(|| format!("Chain {}", chain_id))
    }
}

impl Default for TokenRegistry {
    fn default() -> Self {
        let cfg = RegistryConfig::default();
        let index = cfg
            .tokens
            .iter()
            .enumerate()
            .map(|(i, t)| (t.symbol.clone(), i))
            .collect();
        Self {
            tokens: cfg.tokens,
            index,
            pools: cfg.pools,
            chains: cfg.chains,
            routing_tokens: cfg.routing_tokens,
            fallback_prices: cfg.fallback_prices,
            oracle_ids: cfg.oracle_ids,
            synthetic_pool_fee: cfg.synthetic_pool_fee,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tables() {
        let registry = TokenRegistry::default();
        assert_eq!(registry.tokens().len(), 4);
        assert_eq!(registry.token("pETH").map(|t| t.decimals), Some(18));
        assert_eq!(registry.token("pUSDC").map(|t| t.glyph()), Some("US".to_string()));
        assert_eq!(registry.fallback_price("ETH"), Some(4151.79));
        assert_eq!(registry.oracle_id("pSOL"), Some("solana"));
        assert_eq!(registry.chain_name(42069), "Push Chain Donut Testnet");
        assert_eq!(registry.chain_name(5), "Chain 5");
    }

    #[test]
    fn test_default_config_validates() {
        assert!(TokenRegistry::from_config(&RegistryConfig::default()).is_ok());
    }

    #[test]
    fn test_find_pool_either_order() {
        let registry = TokenRegistry::default();
        let forward = registry.find_pool("pETH", "pUSDC").map(|p| p.id.clone());
        let backward = registry.find_pool("pUSDC", "pETH").map(|p| p.id.clone());
        assert_eq!(forward, Some("pETH-pUSDC".to_string()));
        assert_eq!(forward, backward);
        assert!(registry.find_pool("pETH", "pSOL").is_none());
    }

    #[test]
    fn test_rejects_pool_with_unknown_token() {
        let mut cfg = RegistryConfig::default();
        cfg.pools.push(Pool {
            id: "pETH-pDOGE".to_string(),
            token_a: "pETH".to_string(),
            token_b: "pDOGE".to_string(),
            address: "0x...".to_string(),
            fee: 0.003,
        });
        let err = TokenRegistry::from_config(&cfg).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownPoolToken { token, .. } if token == "pDOGE"));
    }

    #[test]
    fn test_rejects_fee_outside_unit_interval() {
        let mut cfg = RegistryConfig::default();
        cfg.pools[0].fee = 1.0;
        assert!(matches!(
            TokenRegistry::from_config(&cfg),
            Err(ConfigError::InvalidFeeRate { .. })
        ));

        cfg.pools[0].fee = -0.01;
        assert!(TokenRegistry::from_config(&cfg).is_err());
    }
}
