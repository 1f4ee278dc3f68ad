//! Application layer - use cases and services

pub mod commands;
pub mod quote_session;
pub mod services;

pub use commands::{Cli, CommandExecutor, Commands, SwapDefaults};
pub use quote_session::{QuoteSession, DEFAULT_DEBOUNCE};
pub use services::{parse_amount, SwapService, MAX_AMOUNT};
