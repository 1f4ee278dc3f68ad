use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::info;

use crate::application::{Cli, CommandExecutor, Commands, QuoteSession, SwapDefaults, SwapService};
use crate::config::Config;
use crate::domain::execution::{
    ExecutionMode, NativeChainSwap, SwapDispatcher, TransactionConfirmer, WalletProvider,
};
use crate::domain::price::{OfflineOracle, PriceBook, PriceOracle};
use crate::domain::quote::QuoteEngine;
use crate::domain::registry::TokenRegistry;
use crate::infrastructure::oracle::CoinGeckoClient;
use crate::infrastructure::wallet::{AutoConfirm, DisconnectedWallet, JsonRpcWallet, StdinConfirmer};

/// Resolved runtime settings: config file, then env, then CLI flags
#[derive(Debug, Clone)]
pub struct AppCfg {
    pub config: Config,
    pub auto_confirm: bool,
    pub json: bool,
}

impl AppCfg {
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let mut config = match &cli.config {
            Some(path) => Config::from_file(path)
                .with_context(|| format!("load config {}", path.display()))?,
            None => Config::default(),
        };
        config.apply_env().context("apply environment overrides")?;

        if cli.offline {
            config.oracle.offline = true;
        }
        if let Commands::Swap { real_dex: true, .. } = cli.command {
            config.execution.real_dex_enabled = true;
        }

        Ok(Self {
            config,
            auto_confirm: cli.yes,
            json: cli.json,
        })
    }
}

/// Wire the registry, oracle, wallet and engine into a swap service
pub fn build_service(
    config: &Config,
    confirmer: Arc<dyn TransactionConfirmer>,
) -> Result<SwapService> {
    let registry = Arc::new(
        TokenRegistry::from_config(&config.registry).context("build token registry")?,
    );

    let oracle: Arc<dyn PriceOracle> = if config.oracle.offline {
        Arc::new(OfflineOracle)
    } else {
        Arc::new(CoinGeckoClient::new(
            config.oracle.base_url.clone(),
            config.oracle_timeout(),
        )?)
    };

    let wallet: Arc<dyn WalletProvider> = match &config.wallet.rpc_url {
        Some(url) => Arc::new(JsonRpcWallet::new(
            url.clone(),
            config.wallet_timeout(),
            config.wallet.polling(),
        )?),
        None => Arc::new(DisconnectedWallet),
    };

    let prices = PriceBook::new(oracle.clone(), registry.clone());
    let engine = Arc::new(QuoteEngine::new(
        registry.clone(),
        prices,
        config.quote.sources.clone(),
        config.quote.settings(),
    ));

    let mode = ExecutionMode::from_flag(config.execution.real_dex_enabled);
    let native = NativeChainSwap::new(wallet, confirmer, registry, config.chain.clone());
    let dispatcher = SwapDispatcher::new(
        engine.clone(),
        native,
        config.execution.venues.clone(),
        mode,
        config.execution.simulate_latency,
    );

    info!(
        oracle = oracle.name(),
        wallet = config.wallet.rpc_url.as_deref().unwrap_or("none"),
        chain_id = config.chain.chain_id,
        contract = config.execution.contract_address.as_deref().unwrap_or("none"),
        mode = ?mode,
        "swap service ready"
    );
    Ok(SwapService::new(engine, dispatcher))
}

pub async fn run(cli: Cli) -> Result<()> {
    let app_cfg = AppCfg::from_cli(&cli)?;

    let confirmer: Arc<dyn TransactionConfirmer> = if app_cfg.auto_confirm {
        Arc::new(AutoConfirm(true))
    } else {
        Arc::new(StdinConfirmer)
    };

    let config = &app_cfg.config;
    let service = Arc::new(build_service(config, confirmer)?);
    let session = Arc::new(QuoteSession::new(
        service.clone(),
        Duration::from_millis(config.quote.debounce_ms),
    ));
    let defaults = SwapDefaults {
        slippage: config.execution.default_slippage,
        deadline_minutes: config.execution.deadline_minutes,
    };

    CommandExecutor::new(service, session, defaults, app_cfg.json)
        .execute(cli.command)
        .await
}
