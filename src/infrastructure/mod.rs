//! Infrastructure layer - HTTP oracle, wallet RPC and terminal adapters

pub mod oracle;
pub mod wallet;
