//! Transfer request, attempt and outcome types.

use serde::{Deserialize, Serialize};
use solana_instruction::Instruction;
use thiserror::Error;

use crate::blockchain::address::{parse_address, Pubkey};
use crate::blockchain::amount::parse_minor_units;
use crate::config::TransferConfig;
use crate::transfer::signer::SubmitError;

/// Fallback message when a failure carries no text.
pub const GENERIC_FAILURE_MESSAGE: &str = "Transfer failed";

/// Raw transfer input as typed by the user.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TransferRequest {
    pub destination: String,
    pub amount: String,
}

impl TransferRequest {
    pub fn new(destination: impl Into<String>, amount: impl Into<String>) -> Self {
        Self {
            destination: destination.into(),
            amount: amount.into(),
        }
    }
}

/// A precondition that failed before anything was submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PreconditionError {
    #[error("Wallet not connected")]
    WalletNotConnected,

    #[error("Invalid recipient address")]
    InvalidRecipient,

    #[error("Invalid amount")]
    InvalidAmount,
}

/// A positive amount in minor units (lamports).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct TransferAmount(u64);

impl TransferAmount {
    /// Parse decimal major-unit text, e.g. "0.01" → 10_000_000 lamports.
    pub fn from_major_text(text: &str, units_per_major: u64) -> Result<Self, PreconditionError> {
        parse_minor_units(text, units_per_major)
            .map(Self)
            .ok_or(PreconditionError::InvalidAmount)
    }

    pub fn minor_units(&self) -> u64 {
        self.0
    }
}

/// A request that passed every precondition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedTransfer {
    pub sender: Pubkey,
    pub destination: Pubkey,
    pub amount: TransferAmount,
}

impl ValidatedTransfer {
    /// Check preconditions in order: sender, destination, amount.
    pub fn validate(
        request: &TransferRequest,
        sender: Option<&Pubkey>,
        units_per_major: u64,
    ) -> Result<Self, PreconditionError> {
        let sender = *sender.ok_or(PreconditionError::WalletNotConnected)?;
        let destination =
            parse_address(&request.destination).map_err(|_| PreconditionError::InvalidRecipient)?;
        let amount = TransferAmount::from_major_text(&request.amount, units_per_major)?;

        Ok(Self {
            sender,
            destination,
            amount,
        })
    }

    /// A single system-program transfer from sender to destination.
    pub fn instructions(&self) -> Vec<Instruction> {
        vec![solana_system_interface::instruction::transfer(
            &self.sender,
            &self.destination,
            self.amount.minor_units(),
        )]
    }
}

/// Options forwarded to the signer with every attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionOptions {
    /// Token the paymaster charges fees in.
    pub fee_token: String,
    pub compute_unit_limit: u32,
}

impl Default for TransactionOptions {
    fn default() -> Self {
        Self::from(&TransferConfig::default())
    }
}

impl From<&TransferConfig> for TransactionOptions {
    fn from(config: &TransferConfig) -> Self {
        Self {
            fee_token: config.fee_token.clone(),
            compute_unit_limit: config.compute_unit_limit,
        }
    }
}

/// How one submission attempt ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    Success(String),
    Retryable(SubmitError),
    Fatal(SubmitError),
}

/// One pass through the retry loop. Logged, then dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionAttempt {
    /// 1-based attempt number.
    pub attempt: u32,
    pub outcome: AttemptOutcome,
}

/// Terminal result handed back to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum TransferOutcome {
    Submitted {
        signature: String,
    },
    Failed {
        #[serde(rename = "errorMessage")]
        error_message: String,
    },
}

impl TransferOutcome {
    /// Failure outcome; empty messages become [`GENERIC_FAILURE_MESSAGE`].
    pub fn failed(message: impl Into<String>) -> Self {
        let message = message.into();
        let error_message = if message.trim().is_empty() {
            GENERIC_FAILURE_MESSAGE.to_string()
        } else {
            message
        };
        TransferOutcome::Failed { error_message }
    }

    pub fn is_submitted(&self) -> bool {
        matches!(self, TransferOutcome::Submitted { .. })
    }

    pub fn signature(&self) -> Option<&str> {
        match self {
            TransferOutcome::Submitted { signature } => Some(signature),
            TransferOutcome::Failed { .. } => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            TransferOutcome::Submitted { .. } => None,
            TransferOutcome::Failed { error_message } => Some(error_message),
        }
    }
}

impl From<PreconditionError> for TransferOutcome {
    fn from(err: PreconditionError) -> Self {
        TransferOutcome::failed(err.to_string())
    }
}

impl From<SubmitError> for TransferOutcome {
    fn from(err: SubmitError) -> Self {
        TransferOutcome::failed(err.message)
    }
}
