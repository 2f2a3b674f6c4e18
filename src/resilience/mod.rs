//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Submission attempt fails:
//!     → transfer::classify (retryable or fatal?)
//!     → retries.rs (attempt budget left? pause, then rebuild and resubmit)
//! ```
//!
//! # Design Decisions
//! - Attempts are strictly sequential, never parallel
//! - Fixed delay, no jitter: one user, one submission at a time
//! - RPC timeouts live in the client (`tokio::time::timeout` per request)

pub mod retries;

pub use retries::RetryPolicy;
