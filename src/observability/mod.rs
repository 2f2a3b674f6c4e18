//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! transfer flow, RPC client, balance watcher produce:
//!     → tracing events (structured fields: attempt, signature, address)
//!     → metrics.rs counters
//!
//! logging.rs installs the subscriber (pretty or JSON, stderr)
//! ```

pub mod logging;
pub mod metrics;
