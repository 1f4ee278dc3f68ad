//! Swap dispatch - re-quote, then execute on a DEX venue or the native chain

use std::sync::Arc;

use chrono::Utc;
use tracing::{error, info, warn};

use super::dex_venue::DexVenue;
use super::native_swap::NativeChainSwap;
use super::outcome::{ExecutionResult, Sentinel};
use super::{ExecutionMode, SwapParams};
use crate::domain::quote::{calculate_minimum_output, QuoteEngine};
use crate::shared::errors::{ExecutionError, QuoteError, WalletError};

pub struct SwapDispatcher {
    engine: Arc<QuoteEngine>,
    native: NativeChainSwap,
    venues: Vec<DexVenue>,
    mode: ExecutionMode,
    /// Sleep for the venue delay before answering
    simulate_latency: bool,
}

impl SwapDispatcher {
    pub fn new(
        engine: Arc<QuoteEngine>,
        native: NativeChainSwap,
        venues: Vec<DexVenue>,
        mode: ExecutionMode,
        simulate_latency: bool,
    ) -> Self {
        Self {
            engine,
            native,
            venues,
            mode,
            simulate_latency,
        }
    }

    /// Only an unquotable amount or an unsupported pair in DEX mode is an error;
    /// every other failure collapses into a sentinel or a demo hash.
    pub async fn execute_swap(
        &self,
        params: &SwapParams,
    ) -> Result<ExecutionResult, ExecutionError> {
        if params.deadline < Utc::now() {
            warn!(deadline = %params.deadline, "swap deadline already passed, executing anyway");
        }

        let quote = self
            .engine
            .get_quote(&params.token_in, &params.token_out, params.amount_in)
            .await?;
        let min_amount_out = calculate_minimum_output(quote.amount_out, params.slippage_tolerance)
            .ok_or_else(|| {
                QuoteError::InvalidRequest(format!(
                    "slippage tolerance {} gives no valid minimum output",
                    params.slippage_tolerance
                ))
            })?;

        info!(
            mode = ?self.mode,
            source = %quote.source,
            amount_out = %quote.amount_out,
            min_amount_out = %min_amount_out,
            recipient = %params.recipient,
            "dispatching {} {} -> {}", params.amount_in, params.token_in, params.token_out
        );

        match self.mode {
            ExecutionMode::RealDex => self.execute_on_venue(params).await,
            ExecutionMode::NativeDemo => Ok(self.execute_native(params, min_amount_out).await),
        }
    }

    async fn execute_on_venue(
        &self,
        params: &SwapParams,
    ) -> Result<ExecutionResult, ExecutionError> {
        let venue = self
            .venues
            .iter()
            .find(|v| v.matches(&params.token_in, &params.token_out))
            .ok_or_else(|| ExecutionError::UnsupportedPair {
                token_in: params.token_in.clone(),
                token_out: params.token_out.clone(),
            })?;

        if self.simulate_latency {
            tokio::time::sleep(venue.delay()).await;
        }

        let reference = venue.synthesize_reference();
        info!(venue = %venue.source, reference = %reference, "external DEX execution simulated");
        Ok(ExecutionResult::ExternalDex {
            venue: venue.source,
            reference,
        })
    }

    async fn execute_native(
        &self,
        params: &SwapParams,
        min_amount_out: rust_decimal::Decimal,
    ) -> ExecutionResult {
        let session = match self.native.connect().await {
            Ok(session) => session,
            Err(
                e @ (WalletError::NetworkMismatch { .. }
                | WalletError::Unavailable
                | WalletError::NoAccount
                | WalletError::Declined),
            ) => {
                info!("wallet not ready ({}), swap shown as demonstration only", e);
                return ExecutionResult::NoTransaction(Sentinel::DemoComplete);
            }
            Err(e) => {
                error!("wallet connection failed: {}", e);
                return ExecutionResult::demo_hash();
            }
        };

        match self
            .native
            .execute_proof_transfer(&session, params, min_amount_out)
            .await
        {
            Ok(hash) => ExecutionResult::Submitted(hash),
            Err(WalletError::Declined) => {
                ExecutionResult::NoTransaction(Sentinel::ConceptDemonstration)
            }
            Err(e) => {
                warn!("proof transfer failed: {}", e);
                ExecutionResult::NoTransaction(Sentinel::DemoComplete)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::execution::{
        default_venues, ConfirmationRequest, NativeChainConfig, TransactionConfirmer,
        TransferRequest, TxHash, TxReceipt, WalletProvider,
    };
    use crate::domain::price::{OfflineOracle, PriceBook};
    use crate::domain::quote::{default_sources, Jitter, QuoteSettings, QuoteSource};
    use crate::domain::registry::TokenRegistry;
    use async_trait::async_trait;
    use chrono::Duration;
    use rust_decimal::Decimal;
    use std::sync::Mutex;

    const HASH: &str = "0x5c504ed432cb51138bcf09aa5e8a410dd4a1e204ef84bfed1be16dfba1b22060";
    const ACCOUNT: &str = "0x00000000000000000000000000000000000000a1";
    const ONE_PC: u128 = 1_000_000_000_000_000_000;

    struct FakeWallet {
        chain_id: u64,
        accounts_rejected: bool,
        balance: u128,
        provider_down: bool,
        mined: bool,
        sent: Mutex<Vec<TransferRequest>>,
    }

    impl FakeWallet {
        fn on_chain(chain_id: u64) -> Self {
            Self {
                chain_id,
                accounts_rejected: false,
                balance: ONE_PC,
                provider_down: false,
                mined: true,
                sent: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl WalletProvider for FakeWallet {
        async fn request_accounts(&self) -> Result<Vec<String>, WalletError> {
            if self.accounts_rejected {
                return Err(WalletError::Declined);
            }
            Ok(vec![ACCOUNT.to_string()])
        }

        async fn chain_id(&self) -> Result<u64, WalletError> {
            if self.provider_down {
                return Err(WalletError::Provider("connection refused".to_string()));
            }
            Ok(self.chain_id)
        }

        async fn balance(&self, _address: &str) -> Result<u128, WalletError> {
            Ok(self.balance)
        }

        async fn send_transaction(&self, tx: &TransferRequest) -> Result<TxHash, WalletError> {
            self.sent.lock().unwrap().push(tx.clone());
            Ok(TxHash::parse(HASH).unwrap())
        }

        async fn wait_for_receipt(&self, hash: &TxHash) -> Result<Option<TxReceipt>, WalletError> {
            if !self.mined {
                return Ok(None);
            }
            Ok(Some(TxReceipt {
                transaction_hash: hash.clone(),
                block_number: 7,
                gas_used: 21_000,
                success: true,
            }))
        }
    }

    struct FixedAnswer(bool);

    #[async_trait]
    impl TransactionConfirmer for FixedAnswer {
        async fn confirm(&self, _request: &ConfirmationRequest) -> bool {
            self.0
        }
    }

    fn dispatcher(wallet: Arc<FakeWallet>, approve: bool, mode: ExecutionMode) -> SwapDispatcher {
        let registry = Arc::new(TokenRegistry::default());
        let prices = PriceBook::new(Arc::new(OfflineOracle), registry.clone());
        let engine = Arc::new(QuoteEngine::new(
            registry.clone(),
            prices,
            default_sources(),
            QuoteSettings {
                jitter: Jitter::Disabled,
                simulate_latency: false,
            },
        ));
        let native = NativeChainSwap::new(
            wallet,
            Arc::new(FixedAnswer(approve)),
            registry,
            NativeChainConfig::default(),
        );
        SwapDispatcher::new(engine, native, default_venues(), mode, false)
    }

    fn params(token_in: &str, token_out: &str, amount_in: i64) -> SwapParams {
        SwapParams {
            token_in: token_in.to_string(),
            token_out: token_out.to_string(),
            amount_in: Decimal::from(amount_in),
            slippage_tolerance: 0.5,
            recipient: ACCOUNT.to_string(),
            deadline: Utc::now() + Duration::minutes(20),
        }
    }

    #[tokio::test]
    async fn test_wrong_network_yields_demo_complete() {
        let wallet = Arc::new(FakeWallet::on_chain(1));
        let dispatcher = dispatcher(wallet.clone(), true, ExecutionMode::NativeDemo);

        let result = dispatcher.execute_swap(&params("pETH", "pUSDC", 1)).await.unwrap();

        assert_eq!(result.as_str(), "DEMO_COMPLETE_NO_HASH");
        assert!(!result.is_genuine());
        assert!(wallet.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_rejected_account_request_yields_demo_complete() {
        let wallet = Arc::new(FakeWallet {
            accounts_rejected: true,
            ..FakeWallet::on_chain(42069)
        });
        let dispatcher = dispatcher(wallet.clone(), true, ExecutionMode::NativeDemo);

        let result = dispatcher.execute_swap(&params("pETH", "pUSDC", 1)).await.unwrap();

        assert_eq!(result, ExecutionResult::NoTransaction(Sentinel::DemoComplete));
        assert!(wallet.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_confirmed_proof_transfer_is_submitted() {
        let wallet = Arc::new(FakeWallet::on_chain(42069));
        let dispatcher = dispatcher(wallet.clone(), true, ExecutionMode::NativeDemo);

        let result = dispatcher.execute_swap(&params("pETH", "pUSDC", 1)).await.unwrap();

        assert_eq!(result, ExecutionResult::Submitted(TxHash::parse(HASH).unwrap()));
        let sent = wallet.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].from, ACCOUNT);
        assert_eq!(sent[0].to, ACCOUNT);
        assert_eq!(sent[0].value, 10_000_000_000_000);
        assert_eq!(sent[0].gas_limit, 21_000);
    }

    #[tokio::test]
    async fn test_declined_yields_concept_sentinel() {
        let wallet = Arc::new(FakeWallet::on_chain(42069));
        let dispatcher = dispatcher(wallet.clone(), false, ExecutionMode::NativeDemo);

        let result = dispatcher.execute_swap(&params("pETH", "pUSDC", 1)).await.unwrap();

        assert_eq!(result.as_str(), "CONCEPT_DEMONSTRATION_COMPLETE");
        assert!(wallet.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_native_input_needs_amount_plus_gas() {
        let wallet = Arc::new(FakeWallet::on_chain(42069));
        let dispatcher = dispatcher(wallet.clone(), true, ExecutionMode::NativeDemo);

        // 1 ETH balance cannot cover 1 ETH plus the gas reserve
        let result = dispatcher.execute_swap(&params("ETH", "USDC", 1)).await.unwrap();

        assert_eq!(result, ExecutionResult::NoTransaction(Sentinel::DemoComplete));
        assert!(wallet.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_balance_yields_demo_complete() {
        let wallet = Arc::new(FakeWallet {
            balance: 0,
            ..FakeWallet::on_chain(42069)
        });
        let dispatcher = dispatcher(wallet, true, ExecutionMode::NativeDemo);

        let result = dispatcher.execute_swap(&params("pSOL", "pUSDC", 1)).await.unwrap();
        assert_eq!(result, ExecutionResult::NoTransaction(Sentinel::DemoComplete));
    }

    #[tokio::test]
    async fn test_unmined_transfer_yields_demo_complete() {
        let wallet = Arc::new(FakeWallet {
            mined: false,
            ..FakeWallet::on_chain(42069)
        });
        let dispatcher = dispatcher(wallet, true, ExecutionMode::NativeDemo);

        let result = dispatcher.execute_swap(&params("pETH", "pUSDC", 1)).await.unwrap();
        assert_eq!(result, ExecutionResult::NoTransaction(Sentinel::DemoComplete));
    }

    #[tokio::test]
    async fn test_provider_failure_yields_demo_hash() {
        let wallet = Arc::new(FakeWallet {
            provider_down: true,
            ..FakeWallet::on_chain(42069)
        });
        let dispatcher = dispatcher(wallet, true, ExecutionMode::NativeDemo);

        let result = dispatcher.execute_swap(&params("pETH", "pUSDC", 1)).await.unwrap();
        assert!(matches!(result, ExecutionResult::DemoHash(_)));
        assert!(result.as_str().starts_with("0xHACKATHON"));
    }

    #[tokio::test]
    async fn test_expired_deadline_still_executes() {
        let wallet = Arc::new(FakeWallet::on_chain(42069));
        let dispatcher = dispatcher(wallet, true, ExecutionMode::NativeDemo);
        let mut expired = params("pETH", "pUSDC", 1);
        expired.deadline = Utc::now() - Duration::minutes(5);

        let result = dispatcher.execute_swap(&expired).await.unwrap();
        assert!(result.is_genuine());
    }

    #[tokio::test]
    async fn test_real_dex_routes_to_first_matching_venue() {
        let wallet = Arc::new(FakeWallet::on_chain(42069));
        let dispatcher = dispatcher(wallet.clone(), true, ExecutionMode::RealDex);

        let result = dispatcher.execute_swap(&params("pSOL", "pETH", 1)).await.unwrap();
        match result {
            ExecutionResult::ExternalDex { venue, reference } => {
                assert_eq!(venue, QuoteSource::OneInch);
                assert!(reference.starts_with("0x1inch"));
            }
            other => panic!("unexpected result {:?}", other),
        }

        let result = dispatcher.execute_swap(&params("pBNB", "pUSDC", 1)).await.unwrap();
        assert!(result.as_str().starts_with("0xcake"));
        assert!(wallet.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_real_dex_unsupported_pair_is_an_error() {
        let wallet = Arc::new(FakeWallet::on_chain(42069));
        let dispatcher = dispatcher(wallet, true, ExecutionMode::RealDex);

        let err = dispatcher
            .execute_swap(&params("pUSDC", "USDT", 10))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ExecutionError::UnsupportedPair {
                token_in: "pUSDC".to_string(),
                token_out: "USDT".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_unquotable_amount_is_an_error() {
        let wallet = Arc::new(FakeWallet::on_chain(42069));
        let dispatcher = dispatcher(wallet.clone(), true, ExecutionMode::NativeDemo);
        let mut huge = params("pETH", "pUSDC", 1);
        huge.amount_in = Decimal::MAX;

        let err = dispatcher.execute_swap(&huge).await.unwrap_err();

        assert!(matches!(err, ExecutionError::Quote(QuoteError::InvalidRequest(_))));
        assert!(wallet.sent.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_venue_delay_is_awaited() {
        let wallet = Arc::new(FakeWallet::on_chain(42069));
        let mut dispatcher = dispatcher(wallet, true, ExecutionMode::RealDex);
        dispatcher.simulate_latency = true;

        let start = tokio::time::Instant::now();
        let result = dispatcher.execute_swap(&params("pSOL", "pUSDC", 1)).await.unwrap();

        assert!(result.as_str().ends_with("jupiter"));
        assert!(start.elapsed() >= std::time::Duration::from_millis(2500));
    }

    #[test]
    fn test_mode_from_flag() {
        assert_eq!(ExecutionMode::from_flag(true), ExecutionMode::RealDex);
        assert_eq!(ExecutionMode::from_flag(false), ExecutionMode::NativeDemo);
        assert_eq!(ExecutionMode::default(), ExecutionMode::NativeDemo);
    }
}
