//! Blockchain integration subsystem.
//!
//! # Data Flow
//! ```text
//! user text
//!     → address.rs (base58 → Pubkey) / amount.rs (decimal → lamports)
//!     → transfer flow builds the instruction
//!
//! client.rs (JSON-RPC over HTTP, timeout + failover)
//!     → balance reads for the session watcher
//!     → airdrop requests and signature confirmation
//! ```
//!
//! Signing and submission are not done here; they belong to the wallet
//! that implements `transfer::SignAndSubmit`.

pub mod address;
pub mod amount;
pub mod client;
pub mod types;

pub use address::{abbreviate, parse_address, Pubkey};
pub use client::{BalanceSource, RpcClient};
pub use types::{BlockchainError, BlockchainResult, Commitment, SignatureStatus};
