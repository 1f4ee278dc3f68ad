//! PushySwap - simulated cross-chain swap quotes and demo execution
//! Built with Domain-Driven Design principles

pub mod app;
pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod shared;

// Re-export main types for convenience
pub use application::SwapService;
pub use config::Config;
pub use domain::execution::{ExecutionResult, SwapDispatcher};
pub use domain::quote::{Quote, QuoteEngine};
pub use domain::registry::TokenRegistry;
