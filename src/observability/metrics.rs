//! Metrics collection.
//!
//! Counters go through the `metrics` facade. No exporter is installed here;
//! the embedding application decides where they end up.
//!
//! # Metrics
//! - `transfer_attempts_total` (counter): submissions handed to the signer
//! - `transfer_retries_total` (counter): retries after a transient failure
//! - `transfer_outcomes_total` (counter): terminal outcomes by `outcome`
//! - `rpc_requests_total` (counter): JSON-RPC calls by `method`, `status`

use metrics::counter;

pub fn record_transfer_attempt() {
    counter!("transfer_attempts_total").increment(1);
}

pub fn record_transfer_retry() {
    counter!("transfer_retries_total").increment(1);
}

/// `outcome` is one of "submitted", "rejected", "invalid".
pub fn record_transfer_outcome(outcome: &'static str) {
    counter!("transfer_outcomes_total", "outcome" => outcome).increment(1);
}

pub fn record_rpc_request(method: &'static str, success: bool) {
    let status = if success { "ok" } else { "error" };
    counter!("rpc_requests_total", "method" => method, "status" => status).increment(1);
}
