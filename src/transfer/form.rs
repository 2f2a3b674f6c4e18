//! Send-form state: live validation, the disabled flag and the
//! one-submission-at-a-time guard.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use crate::blockchain::address::{parse_address, Pubkey};
use crate::blockchain::amount::parse_minor_units;
use crate::transfer::flow::TransferFlow;
use crate::transfer::signer::SignAndSubmit;
use crate::transfer::types::{TransferOutcome, TransferRequest};

/// Inline hint shown under a non-empty, unparseable destination.
pub const INVALID_ADDRESS_HINT: &str = "Invalid Solana address";
/// Inline hint shown under a non-empty, unparseable amount.
pub const INVALID_AMOUNT_HINT: &str = "Invalid amount";

/// Shared "sending" flag. Cloning shares the flag.
#[derive(Debug, Clone, Default)]
pub struct SubmissionGuard {
    active: Arc<AtomicBool>,
}

impl SubmissionGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the guard, or `None` if a submission is already running.
    pub fn try_begin(&self) -> Option<SubmissionTicket> {
        self.active
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| SubmissionTicket {
                active: self.active.clone(),
            })
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }
}

/// Held for the duration of one submission; releases the guard on drop.
#[derive(Debug)]
pub struct SubmissionTicket {
    active: Arc<AtomicBool>,
}

impl Drop for SubmissionTicket {
    fn drop(&mut self) {
        self.active.store(false, Ordering::Release);
    }
}

/// The state behind a send form. Clones share the sending guard and the
/// last error.
#[derive(Debug, Clone)]
pub struct TransferForm {
    request: TransferRequest,
    sender: Option<Pubkey>,
    units_per_major: u64,
    guard: SubmissionGuard,
    last_error: Arc<Mutex<Option<String>>>,
}

impl TransferForm {
    pub fn new(sender: Option<Pubkey>, units_per_major: u64) -> Self {
        Self {
            request: TransferRequest::default(),
            sender,
            units_per_major,
            guard: SubmissionGuard::new(),
            last_error: Arc::default(),
        }
    }

    pub fn set_destination(&mut self, text: impl Into<String>) {
        self.request.destination = text.into();
    }

    pub fn set_amount(&mut self, text: impl Into<String>) {
        self.request.amount = text.into();
    }

    /// Update the connected wallet (`None` after disconnect).
    pub fn set_sender(&mut self, sender: Option<Pubkey>) {
        self.sender = sender;
    }

    pub fn request(&self) -> &TransferRequest {
        &self.request
    }

    pub fn sender(&self) -> Option<&Pubkey> {
        self.sender.as_ref()
    }

    pub fn recipient(&self) -> Option<Pubkey> {
        parse_address(&self.request.destination).ok()
    }

    pub fn minor_units(&self) -> Option<u64> {
        parse_minor_units(&self.request.amount, self.units_per_major)
    }

    pub fn destination_hint(&self) -> Option<&'static str> {
        (!self.request.destination.is_empty() && self.recipient().is_none())
            .then_some(INVALID_ADDRESS_HINT)
    }

    pub fn amount_hint(&self) -> Option<&'static str> {
        (!self.request.amount.is_empty() && self.minor_units().is_none())
            .then_some(INVALID_AMOUNT_HINT)
    }

    /// Message from the most recent failed submission. Cleared when the
    /// next submission starts.
    pub fn last_error(&self) -> Option<String> {
        self.last_error
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set_last_error(&self, message: Option<String>) {
        *self.last_error.lock().unwrap_or_else(PoisonError::into_inner) = message;
    }

    pub fn is_sending(&self) -> bool {
        self.guard.is_active()
    }

    /// True while sending, when no wallet is connected, or when either
    /// field fails to parse.
    pub fn is_disabled(&self) -> bool {
        self.is_sending()
            || self.sender.is_none()
            || self.recipient().is_none()
            || self.minor_units().is_none()
    }

    /// Run the flow with the current inputs and record its error, if any.
    /// Returns `None` without touching the signer or the last error if
    /// another submission holds the guard.
    pub async fn submit<S>(&self, flow: &TransferFlow, signer: &S) -> Option<TransferOutcome>
    where
        S: SignAndSubmit + ?Sized,
    {
        let Some(_ticket) = self.guard.try_begin() else {
            tracing::debug!("Submission already in progress, ignoring");
            return None;
        };
        self.set_last_error(None);

        let outcome = flow.execute(&self.request, self.sender.as_ref(), signer).await;
        self.set_last_error(outcome.error_message().map(String::from));
        Some(outcome)
    }
}
