//! Transfer submission subsystem.
//!
//! # Data Flow
//! ```text
//! TransferForm (destination text, amount text, sender, sending guard)
//!     → flow.rs: preconditions (wallet, recipient, amount)
//!     → types.rs: one system transfer instruction, in lamports
//!     → signer.rs: SignAndSubmit (external smart wallet)
//!     → classify.rs: retryable (expired blockhash) or fatal
//!     → resilience::RetryPolicy: up to 3 attempts, 500ms apart
//!     → TransferOutcome { signature } | { errorMessage }
//! ```
//!
//! # Design Decisions
//! - The recipient is always caller-supplied; there is no default address
//! - Only a message string crosses back to the caller, never an error type
//! - Structured error kinds beat message matching

pub mod classify;
pub mod flow;
pub mod form;
pub mod signer;
pub mod types;

pub use classify::RetryClassifier;
pub use flow::TransferFlow;
pub use form::{SubmissionGuard, TransferForm};
pub use signer::{SignAndSubmit, SubmitError, SubmitErrorKind};
pub use types::{
    PreconditionError, TransactionOptions, TransferAmount, TransferOutcome, TransferRequest,
    ValidatedTransfer,
};
