//! Price oracle clients

pub mod coingecko_client;

pub use coingecko_client::{CoinGeckoClient, DEFAULT_ORACLE_URL};
