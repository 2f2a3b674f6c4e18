//! Retryable vs. fatal classification of submission failures.
//!
//! A structured [`SubmitErrorKind`] always wins. Message matching is the
//! fallback for signers that only hand back text.

use crate::transfer::signer::{SubmitError, SubmitErrorKind};

/// Message fragments known to mean "blockhash expired before inclusion".
/// `Blockhash not found` is the RPC node's wording; `0x1783` is the
/// smart-wallet program's custom error for a stale transaction.
pub const DEFAULT_TRANSIENT_MARKERS: &[&str] = &[
    "TransactionTooOld",
    "Blockhash not found",
    "blockhash",
    "0x1783",
];

#[derive(Debug, Clone)]
pub struct RetryClassifier {
    markers: Vec<String>,
}

impl RetryClassifier {
    pub fn new<I, S>(markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            markers: markers
                .into_iter()
                .map(Into::into)
                .filter(|m: &String| !m.is_empty())
                .collect(),
        }
    }

    pub fn is_retryable(&self, error: &SubmitError) -> bool {
        match error.kind {
            SubmitErrorKind::ValidityExpired => true,
            SubmitErrorKind::Rejected | SubmitErrorKind::Cancelled => false,
            SubmitErrorKind::Unclassified => self
                .markers
                .iter()
                .any(|marker| error.message.contains(marker.as_str())),
        }
    }
}

impl Default for RetryClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_TRANSIENT_MARKERS.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markers_match_unclassified_messages() {
        let classifier = RetryClassifier::default();
        for message in [
            "Transaction simulation failed: Blockhash not found; blockhash expired",
            "custom program error: 0x1783",
            "Error: TransactionTooOld",
        ] {
            assert!(
                classifier.is_retryable(&SubmitError::unclassified(message)),
                "{}",
                message
            );
        }
    }

    #[test]
    fn test_other_messages_are_fatal() {
        let classifier = RetryClassifier::default();
        for message in ["insufficient funds for rent", "User rejected the request", ""] {
            assert!(!classifier.is_retryable(&SubmitError::unclassified(message)));
        }
    }

    #[test]
    fn test_node_blockhash_not_found_is_retryable() {
        let classifier = RetryClassifier::default();
        assert!(classifier.is_retryable(&SubmitError::unclassified("Blockhash not found")));
        assert!(classifier.is_retryable(&SubmitError::unclassified(
            "Transaction simulation failed: Blockhash not found"
        )));
    }

    #[test]
    fn test_matching_is_case_sensitive() {
        let classifier = RetryClassifier::default();
        assert!(!classifier.is_retryable(&SubmitError::unclassified("BLOCKHASH")));
    }

    #[test]
    fn test_structured_kind_overrides_message() {
        let classifier = RetryClassifier::default();
        assert!(classifier.is_retryable(&SubmitError::validity_expired("anchor gone")));
        assert!(!classifier.is_retryable(&SubmitError::rejected("blockhash mismatch")));
        assert!(!classifier.is_retryable(&SubmitError::cancelled("0x1783")));
    }

    #[test]
    fn test_custom_markers_drop_empty() {
        let classifier = RetryClassifier::new(["", "NodeBehind"]);
        assert!(classifier.is_retryable(&SubmitError::unclassified("RPC NodeBehind by 40 slots")));
        assert!(!classifier.is_retryable(&SubmitError::unclassified("anything")));
    }
}
