//! The signing capability the transfer flow depends on.
//!
//! The smart wallet (passkey ceremony, paymaster, fee sponsorship) lives
//! outside this crate. It is reached through [`SignAndSubmit`], which takes
//! the instructions, wraps them in a transaction with a fresh blockhash,
//! signs, submits and returns the signature.

use async_trait::async_trait;
use solana_instruction::Instruction;
use thiserror::Error;

use crate::transfer::types::TransactionOptions;

/// What the signer knows about a failure, when it knows anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitErrorKind {
    /// The transaction's blockhash expired before it landed.
    ValidityExpired,
    /// The cluster or a program rejected the transaction.
    Rejected,
    /// The user dismissed the signing prompt.
    Cancelled,
    /// No structured information; only the message is meaningful.
    Unclassified,
}

/// A failed sign-and-submit call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct SubmitError {
    pub kind: SubmitErrorKind,
    pub message: String,
}

impl SubmitError {
    pub fn new(kind: SubmitErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn unclassified(message: impl Into<String>) -> Self {
        Self::new(SubmitErrorKind::Unclassified, message)
    }

    pub fn validity_expired(message: impl Into<String>) -> Self {
        Self::new(SubmitErrorKind::ValidityExpired, message)
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self::new(SubmitErrorKind::Rejected, message)
    }

    pub fn cancelled(message: impl Into<String>) -> Self {
        Self::new(SubmitErrorKind::Cancelled, message)
    }
}

/// Sign the instructions with the connected wallet and submit them.
#[async_trait]
pub trait SignAndSubmit: Send + Sync {
    /// Returns the transaction signature on success.
    async fn sign_and_submit(
        &self,
        instructions: Vec<Instruction>,
        options: &TransactionOptions,
    ) -> Result<String, SubmitError>;
}

#[async_trait]
impl<T: SignAndSubmit + ?Sized> SignAndSubmit for std::sync::Arc<T> {
    async fn sign_and_submit(
        &self,
        instructions: Vec<Instruction>,
        options: &TransactionOptions,
    ) -> Result<String, SubmitError> {
        (**self).sign_and_submit(instructions, options).await
    }
}
