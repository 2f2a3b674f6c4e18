//! Chain-specific types and error definitions.

use serde::{Deserialize, Serialize};
use thiserror::Error;

// Re-export RpcConfig from config module to avoid duplication
pub use crate::config::schema::RpcConfig;

/// Commitment level requested from the cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Commitment {
    Processed,
    #[default]
    Confirmed,
    Finalized,
}

impl Commitment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Commitment::Processed => "processed",
            Commitment::Confirmed => "confirmed",
            Commitment::Finalized => "finalized",
        }
    }
}

/// Errors that can occur during blockchain operations.
#[derive(Debug, Error)]
pub enum BlockchainError {
    /// Transport-level failure, or every endpoint failed.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// The node answered with a JSON-RPC error object.
    #[error("RPC error {code}: {message}")]
    RpcResponse { code: i64, message: String },

    /// The node answered with something we could not decode.
    #[error("Malformed RPC response: {0}")]
    MalformedResponse(String),

    /// Transaction was not confirmed within the allowed time.
    #[error("Transaction not confirmed after {0} seconds")]
    ConfirmationTimeout(u64),

    /// Transaction landed but failed on-chain.
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    /// Address text is not a valid base58 public key.
    #[error("Invalid address '{0}'")]
    InvalidAddress(String),
}

/// Result type for blockchain operations.
pub type BlockchainResult<T> = Result<T, BlockchainError>;

/// Status of a submitted transaction signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "error", rename_all = "lowercase")]
pub enum SignatureStatus {
    /// Unknown to the cluster so far.
    Pending,
    Processed,
    Confirmed,
    Finalized,
    /// Landed with an on-chain error.
    Failed(String),
}

impl SignatureStatus {
    /// Whether this status meets the requested commitment.
    pub fn satisfies(&self, commitment: Commitment) -> bool {
        let reached = match self {
            SignatureStatus::Processed => Commitment::Processed,
            SignatureStatus::Confirmed => Commitment::Confirmed,
            SignatureStatus::Finalized => Commitment::Finalized,
            SignatureStatus::Pending | SignatureStatus::Failed(_) => return false,
        };
        reached >= commitment
    }
}
