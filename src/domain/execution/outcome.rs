//! Execution results and sentinel values

use std::fmt;

use serde::Serialize;

use crate::domain::quote::QuoteSource;
use crate::shared::utils::{now_millis, random_hex};

/// Prefix that marks a synthesized, non-blockchain hash
pub const DEMO_HASH_PREFIX: &str = "0xHACKATHON";

/// A `0x`-prefixed 32-byte transaction hash
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct TxHash(String);

impl TxHash {
    pub fn parse(s: &str) -> Option<Self> {
        let digits = s.strip_prefix("0x")?;
        match hex::decode(digits) {
            Ok(bytes) if bytes.len() == 32 => Some(Self(s.to_string())),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Reserved results meaning no transaction happened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Sentinel {
    DemoComplete,
    NoTransaction,
    ConceptDemonstration,
}

impl Sentinel {
    pub const ALL: [Sentinel; 3] = [
        Sentinel::DemoComplete,
        Sentinel::NoTransaction,
        Sentinel::ConceptDemonstration,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Sentinel::DemoComplete => "DEMO_COMPLETE_NO_HASH",
            Sentinel::NoTransaction => "NO_TRANSACTION_EXECUTED",
            Sentinel::ConceptDemonstration => "CONCEPT_DEMONSTRATION_COMPLETE",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|sentinel| sentinel.as_str() == s)
    }
}

/// Outcome of a swap attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ExecutionResult {
    /// A transaction was actually submitted and confirmed
    Submitted(TxHash),
    NoTransaction(Sentinel),
    /// Best-effort fallback after an unexpected failure
    DemoHash(String),
    /// Simulated external DEX execution
    ExternalDex { venue: QuoteSource, reference: String },
}

impl ExecutionResult {
    pub fn demo_hash() -> Self {
        ExecutionResult::DemoHash(format!(
            "{}{}{:x}",
            DEMO_HASH_PREFIX,
            random_hex(8),
            now_millis()
        ))
    }

    pub fn as_str(&self) -> &str {
        match self {
            ExecutionResult::Submitted(hash) => hash.as_str(),
            ExecutionResult::NoTransaction(sentinel) => sentinel.as_str(),
            ExecutionResult::DemoHash(s) => s,
            ExecutionResult::ExternalDex { reference, .. } => reference,
        }
    }

    /// Only a submitted hash is a genuine on-chain transaction
    pub fn is_genuine(&self) -> bool {
        matches!(self, ExecutionResult::Submitted(_))
    }

    /// Recover the outcome from its string form
    pub fn classify(s: &str) -> Self {
        if let Some(sentinel) = Sentinel::parse(s) {
            return ExecutionResult::NoTransaction(sentinel);
        }
        if s.starts_with(DEMO_HASH_PREFIX) {
            return ExecutionResult::DemoHash(s.to_string());
        }
        let venue = if s.starts_with("0x1inch") {
            Some(QuoteSource::OneInch)
        } else if s.starts_with("0xcake") {
            Some(QuoteSource::PancakeSwap)
        } else if s.ends_with("jupiter") {
            Some(QuoteSource::Jupiter)
        } else {
            None
        };
        if let Some(venue) = venue {
            return ExecutionResult::ExternalDex {
                venue,
                reference: s.to_string(),
            };
        }
        match TxHash::parse(s) {
            Some(hash) => ExecutionResult::Submitted(hash),
            None => ExecutionResult::DemoHash(s.to_string()),
        }
    }
}

impl fmt::Display for ExecutionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
