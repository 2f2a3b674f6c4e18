//! Transfer submission flow.
//!
//! # State Transitions
//! ```text
//! Idle → Validating: execute() called
//! Validating → Failed: precondition violated (never retried)
//! Validating → Submitting(1): preconditions pass
//! Submitting(n) → Succeeded: signer returns a signature
//! Submitting(n) → Submitting(n+1): retryable failure and n < max_attempts
//! Submitting(n) → Failed: fatal failure, or n == max_attempts
//! ```
//!
//! Every attempt rebuilds the instructions; the signer fetches a fresh
//! blockhash each time, so nothing from a failed attempt is reused.

use crate::blockchain::address::Pubkey;
use crate::config::TransferConfig;
use crate::observability::metrics;
use crate::resilience::RetryPolicy;
use crate::transfer::classify::RetryClassifier;
use crate::transfer::signer::{SignAndSubmit, SubmitError};
use crate::transfer::types::{
    AttemptOutcome, SubmissionAttempt, TransactionOptions, TransferOutcome, TransferRequest,
    ValidatedTransfer,
};

/// Validates, submits and retries a native-token transfer.
#[derive(Debug, Clone)]
pub struct TransferFlow {
    policy: RetryPolicy,
    classifier: RetryClassifier,
    options: TransactionOptions,
    units_per_major: u64,
}

impl TransferFlow {
    pub fn new(config: &TransferConfig) -> Self {
        Self {
            policy: RetryPolicy::from(config),
            classifier: RetryClassifier::new(config.transient_markers.iter().cloned()),
            options: TransactionOptions::from(config),
            units_per_major: config.units_per_major,
        }
    }

    /// Replace the retry policy.
    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub fn units_per_major(&self) -> u64 {
        self.units_per_major
    }

    /// Run the flow to a terminal outcome. Errors never escape as values;
    /// the caller only sees a signature or a message.
    pub async fn execute<S>(
        &self,
        request: &TransferRequest,
        sender: Option<&Pubkey>,
        signer: &S,
    ) -> TransferOutcome
    where
        S: SignAndSubmit + ?Sized,
    {
        let transfer = match ValidatedTransfer::validate(request, sender, self.units_per_major) {
            Ok(transfer) => transfer,
            Err(e) => {
                tracing::info!(
                    destination = %request.destination,
                    amount = %request.amount,
                    reason = %e,
                    "Transfer rejected before submission"
                );
                metrics::record_transfer_outcome("invalid");
                return e.into();
            }
        };

        match self.submit(&transfer, signer).await {
            Ok(signature) => {
                tracing::info!(
                    signature = %signature,
                    destination = %transfer.destination,
                    lamports = transfer.amount.minor_units(),
                    "Transfer submitted"
                );
                metrics::record_transfer_outcome("submitted");
                TransferOutcome::Submitted { signature }
            }
            Err(e) => {
                tracing::warn!(error = %e, kind = ?e.kind, "Transfer failed");
                metrics::record_transfer_outcome("rejected");
                e.into()
            }
        }
    }

    /// The retry loop. At most `policy.max_attempts()` calls to the signer.
    async fn submit<S>(&self, transfer: &ValidatedTransfer, signer: &S) -> Result<String, SubmitError>
    where
        S: SignAndSubmit + ?Sized,
    {
        let mut attempt = 0;

        loop {
            attempt += 1;
            metrics::record_transfer_attempt();

            let result = signer
                .sign_and_submit(transfer.instructions(), &self.options)
                .await;
            let record = self.classify(attempt, result);

            match record.outcome {
                AttemptOutcome::Success(signature) => return Ok(signature),
                AttemptOutcome::Retryable(err) if self.policy.allows_retry_after(attempt) => {
                    tracing::warn!(
                        attempt,
                        max_attempts = self.policy.max_attempts(),
                        error = %err,
                        "Transaction expired before inclusion, retrying"
                    );
                    metrics::record_transfer_retry();
                    self.policy.pause().await;
                }
                AttemptOutcome::Retryable(err) => {
                    tracing::warn!(attempt, error = %err, "Retries exhausted");
                    return Err(err);
                }
                AttemptOutcome::Fatal(err) => return Err(err),
            }
        }
    }

    fn classify(&self, attempt: u32, result: Result<String, SubmitError>) -> SubmissionAttempt {
        let outcome = match result {
            Ok(signature) => AttemptOutcome::Success(signature),
            Err(err) if self.classifier.is_retryable(&err) => AttemptOutcome::Retryable(err),
            Err(err) => AttemptOutcome::Fatal(err),
        };
        tracing::debug!(attempt, outcome = ?outcome, "Submission attempt finished");
        SubmissionAttempt { attempt, outcome }
    }
}

impl Default for TransferFlow {
    fn default() -> Self {
        Self::new(&TransferConfig::default())
    }
}
