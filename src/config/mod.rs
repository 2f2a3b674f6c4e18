//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (read & deserialize)
//!     → validation.rs (semantic checks)
//!     → AppConfig (validated, immutable)
//!     → sections handed to the RPC client, transfer flow and session
//! ```
//!
//! # Design Decisions
//! - All fields have defaults; no file means devnet defaults
//! - Validation reports every error, not just the first

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_or_default, parse_config, ConfigError};
pub use schema::{
    AppConfig, BalanceConfig, LogFormat, ObservabilityConfig, RpcConfig, TransferConfig,
};
