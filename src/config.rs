use std::{fs, path::Path, time::Duration};

use serde::Deserialize;

use crate::domain::execution::{default_venues, DexVenue, NativeChainConfig};
use crate::domain::quote::{default_sources, AggregatorSource, Jitter, QuoteSettings};
use crate::domain::registry::RegistryConfig;
use crate::infrastructure::oracle::DEFAULT_ORACLE_URL;
use crate::infrastructure::wallet::ReceiptPolling;
use crate::shared::errors::ConfigError;
use crate::shared::utils::deadline_after;

pub const ENV_ORACLE_URL: &str = "PUSHYSWAP_ORACLE_URL";
pub const ENV_RPC_URL: &str = "PUSHYSWAP_RPC_URL";
pub const ENV_CHAIN_ID: &str = "PUSHYSWAP_CHAIN_ID";
pub const ENV_CONTRACT_ADDRESS: &str = "PUSHYSWAP_CONTRACT_ADDRESS";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OracleCfg {
    pub base_url: String,
    /// Unset keeps the HTTP client's default
    pub request_timeout_ms: Option<u64>,
    /// Skip the oracle entirely and use fallback prices
    pub offline: bool,
}

impl Default for OracleCfg {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_ORACLE_URL.to_string(),
            request_timeout_ms: None,
            offline: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WalletCfg {
    /// JSON-RPC endpoint of the wallet provider; none means no wallet
    pub rpc_url: Option<String>,
    pub request_timeout_ms: Option<u64>,
    pub receipt_poll_interval_ms: u64,
    pub receipt_max_attempts: u32,
}

impl Default for WalletCfg {
    fn default() -> Self {
        let polling = ReceiptPolling::default();
        Self {
            rpc_url: None,
            request_timeout_ms: None,
            receipt_poll_interval_ms: polling.interval.as_millis() as u64,
            receipt_max_attempts: polling.max_attempts,
        }
    }
}

impl WalletCfg {
    pub fn polling(&self) -> ReceiptPolling {
        ReceiptPolling {
            interval: Duration::from_millis(self.receipt_poll_interval_ms),
            max_attempts: self.receipt_max_attempts,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct QuoteCfg {
    /// Half-width of the uniform rate jitter; 0 disables it
    pub jitter: f64,
    pub simulate_latency: bool,
    pub debounce_ms: u64,
    pub sources: Vec<AggregatorSource>,
}

impl Default for QuoteCfg {
    fn default() -> Self {
        Self {
            jitter: 0.001,
            simulate_latency: true,
            debounce_ms: 500,
            sources: default_sources(),
        }
    }
}

impl QuoteCfg {
    pub fn settings(&self) -> QuoteSettings {
        QuoteSettings {
            jitter: Jitter::from_width(self.jitter),
            simulate_latency: self.simulate_latency,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExecutionCfg {
    pub real_dex_enabled: bool,
    pub simulate_latency: bool,
    /// Percent
    pub default_slippage: f64,
    pub deadline_minutes: i64,
    /// Deployed swap contract, informational only
    pub contract_address: Option<String>,
    pub venues: Vec<DexVenue>,
}

impl Default for ExecutionCfg {
    fn default() -> Self {
        Self {
            real_dex_enabled: false,
            simulate_latency: true,
            default_slippage: 1.0,
            deadline_minutes: 20,
            contract_address: None,
            venues: default_venues(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub oracle: OracleCfg,
    pub wallet: WalletCfg,
    pub chain: NativeChainConfig,
    pub quote: QuoteCfg,
    pub execution: ExecutionCfg,
    pub registry: RegistryConfig,
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let s = fs::read_to_string(path.as_ref())?;
        Self::from_toml(&s)
    }

    pub fn from_toml(s: &str) -> Result<Self, ConfigError> {
        let cfg: Self = toml::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Apply `PUSHYSWAP_*` endpoint overrides from the process environment
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_ORACLE_URL) {
            self.oracle.base_url = url;
        }
        if let Some(url) = lookup(ENV_RPC_URL) {
            self.wallet.rpc_url = Some(url);
        }
        if let Some(raw) = lookup(ENV_CHAIN_ID) {
            self.chain.chain_id = raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: ENV_CHAIN_ID.to_string(),
                value: raw.clone(),
            })?;
        }
        if let Some(address) = lookup(ENV_CONTRACT_ADDRESS) {
            self.execution.contract_address = Some(address);
        }
        Ok(())
    }

    pub fn oracle_timeout(&self) -> Option<Duration> {
        self.oracle.request_timeout_ms.map(Duration::from_millis)
    }

    pub fn wallet_timeout(&self) -> Option<Duration> {
        self.wallet.request_timeout_ms.map(Duration::from_millis)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..1.0).contains(&self.quote.jitter) {
            return Err(ConfigError::InvalidValue {
                key: "quote.jitter".to_string(),
                value: self.quote.jitter.to_string(),
            });
        }
        if !(0.0..=100.0).contains(&self.execution.default_slippage) {
            return Err(ConfigError::InvalidValue {
                key: "execution.default_slippage".to_string(),
                value: self.execution.default_slippage.to_string(),
            });
        }
        let deadline_minutes = self.execution.deadline_minutes;
        if deadline_minutes <= 0 || deadline_after(deadline_minutes).is_none() {
            return Err(ConfigError::InvalidValue {
                key: "execution.deadline_minutes".to_string(),
                value: deadline_minutes.to_string(),
            });
        }
        if self.wallet.receipt_max_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                key: "wallet.receipt_max_attempts".to_string(),
                value: "0".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::quote::QuoteSource;
    use rust_decimal::Decimal;
    use std::collections::HashMap;

    #[test]
    fn test_empty_file_uses_defaults() {
        let cfg = Config::from_toml("").unwrap();
        assert_eq!(cfg.oracle.base_url, DEFAULT_ORACLE_URL);
        assert!(cfg.wallet.rpc_url.is_none());
        assert_eq!(cfg.chain, NativeChainConfig::default());
        assert_eq!(cfg.chain.chain_id, 42069);
        assert_eq!(cfg.quote.sources, default_sources());
        assert!(!cfg.execution.real_dex_enabled);
        assert_eq!(cfg.execution.default_slippage, 1.0);
        assert_eq!(cfg.execution.deadline_minutes, 20);
        assert_eq!(cfg.execution.venues.len(), 3);
        assert_eq!(cfg.registry.tokens.len(), 4);
        assert_eq!(cfg.quote.settings().jitter, Jitter::Uniform(0.001));
    }

    #[test]
    fn test_sections_override_defaults() {
        let cfg = Config::from_toml(
            r#"
            [oracle]
            base_url = "http://localhost:8080"
            request_timeout_ms = 1500

            [wallet]
            rpc_url = "http://localhost:8545"
            receipt_max_attempts = 5

            [chain]
            chain_id = 1337
            gas_reserve = "0.002"

            [quote]
            jitter = 0.0
            simulate_latency = false

            [execution]
            real_dex_enabled = true

            [[execution.venues]]
            source = "jupiter"
            trigger_symbols = ["pSOL"]
            delay_ms = 10
            "#,
        )
        .unwrap();

        assert_eq!(cfg.oracle_timeout(), Some(Duration::from_millis(1500)));
        assert_eq!(cfg.wallet.rpc_url.as_deref(), Some("http://localhost:8545"));
        assert_eq!(cfg.wallet.polling().max_attempts, 5);
        assert_eq!(cfg.chain.chain_id, 1337);
        assert_eq!(cfg.chain.gas_reserve, Decimal::new(2, 3));
        assert_eq!(cfg.chain.gas_limit, 21_000);
        assert_eq!(cfg.quote.settings().jitter, Jitter::Disabled);
        assert!(cfg.execution.real_dex_enabled);
        assert_eq!(cfg.execution.venues.len(), 1);
        assert_eq!(cfg.execution.venues[0].source, QuoteSource::Jupiter);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(matches!(
            Config::from_toml("[quote]\njitter = 2.0"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            Config::from_toml("[execution]\ndefault_slippage = -1.0"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            Config::from_toml("[execution]\ndeadline_minutes = 0"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            Config::from_toml("[execution]\ndeadline_minutes = 9223372036854775807"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            Config::from_toml("[oracle\n"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            Config::from_file("/nonexistent/pushyswap.toml"),
            Err(ConfigError::Read(_))
        ));
    }

    #[test]
    fn test_env_overrides() {
        let env = HashMap::from([
            (ENV_ORACLE_URL, "http://oracle.local"),
            (ENV_RPC_URL, "http://wallet.local"),
            (ENV_CHAIN_ID, "31337"),
            (ENV_CONTRACT_ADDRESS, "0x5FbDB2315678afecb367f032d93F642f64180aa3"),
        ]);
        let mut cfg = Config::default();
        cfg.apply_overrides(|k| env.get(k).map(|v| v.to_string())).unwrap();

        assert_eq!(cfg.oracle.base_url, "http://oracle.local");
        assert_eq!(cfg.wallet.rpc_url.as_deref(), Some("http://wallet.local"));
        assert_eq!(cfg.chain.chain_id, 31337);
        assert!(cfg.execution.contract_address.is_some());

        let mut cfg = Config::default();
        let err = cfg
            .apply_overrides(|k| (k == ENV_CHAIN_ID).then(|| "push".to_string()))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }
}
