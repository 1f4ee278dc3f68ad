//! Error handling for the application

use thiserror::Error;

/// Price oracle errors
#[derive(Error, Debug)]
pub enum PriceError {
    #[error("Price feed unavailable: {0}")]
    FeedUnavailable(String),

    #[error("Invalid price data for {0}")]
    InvalidPriceData(String),

    #[error("No oracle id mapped for token {0}")]
    UnmappedToken(String),
}

impl From<reqwest::Error> for PriceError {
    fn from(err: reqwest::Error) -> Self {
        PriceError::FeedUnavailable(err.to_string())
    }
}

/// Wallet / provider errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WalletError {
    #[error("No wallet provider available")]
    Unavailable,

    #[error("Wrong network: expected chain {expected}, connected to {actual}")]
    NetworkMismatch { expected: u64, actual: u64 },

    #[error("No account exposed by wallet")]
    NoAccount,

    #[error("Insufficient {token} balance: have {available} wei, need {required} wei")]
    InsufficientBalance {
        token: String,
        available: u128,
        required: u128,
    },

    #[error("Transaction declined by user")]
    Declined,

    #[error("Transaction {0} was not confirmed")]
    NotConfirmed(String),

    #[error("Provider error: {0}")]
    Provider(String),
}

impl From<reqwest::Error> for WalletError {
    fn from(err: reqwest::Error) -> Self {
        WalletError::Provider(err.to_string())
    }
}

/// Execution-related errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExecutionError {
    #[error("Unsupported token pair for real DEX execution: {token_in} -> {token_out}")]
    UnsupportedPair { token_in: String, token_out: String },

    #[error(transparent)]
    Quote(#[from] QuoteError),
}

/// Quote request errors raised at the service boundary
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QuoteError {
    #[error("Invalid swap request: {0}")]
    InvalidRequest(String),

    #[error("Unknown token: {0}")]
    UnknownToken(String),
}

/// Configuration and registry errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Pool {pool} references unknown token {token}")]
    UnknownPoolToken { pool: String, token: String },

    #[error("Pool {pool} fee rate {fee} outside [0, 1)")]
    InvalidFeeRate { pool: String, fee: f64 },

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

/// General application error
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Quote(#[from] QuoteError),

    #[error(transparent)]
    Execution(#[from] ExecutionError),
}
