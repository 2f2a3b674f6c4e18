//! Configuration schema definitions.
//!
//! All sections derive Serde traits and fall back to defaults, so an empty
//! file (or no file at all) yields a working devnet configuration.

use serde::{Deserialize, Serialize};

use crate::blockchain::types::Commitment;

/// Default Solana devnet endpoint.
pub const DEFAULT_RPC_URL: &str = "https://api.devnet.solana.com";

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// JSON-RPC connection settings.
    pub rpc: RpcConfig,

    /// Transfer submission settings.
    pub transfer: TransferConfig,

    /// Balance polling settings.
    pub balance: BalanceConfig,

    /// Logging settings.
    pub observability: ObservabilityConfig,
}

/// JSON-RPC endpoint configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RpcConfig {
    /// Primary JSON-RPC endpoint URL.
    pub url: String,

    /// Failover endpoints, tried in order after the primary.
    pub failover_urls: Vec<String>,

    /// Per-request timeout in seconds.
    pub timeout_secs: u64,

    /// Commitment level used for reads and confirmation.
    pub commitment: Commitment,

    /// Interval between signature status polls in milliseconds.
    pub confirmation_poll_ms: u64,
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_RPC_URL.to_string(),
            failover_urls: Vec::new(),
            timeout_secs: 10,
            commitment: Commitment::Confirmed,
            confirmation_poll_ms: 2000,
        }
    }
}

/// Transfer submission configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TransferConfig {
    /// Total submission attempts per transfer (initial attempt included).
    pub max_attempts: u32,

    /// Fixed delay between attempts in milliseconds.
    pub retry_delay_ms: u64,

    /// Minor units per major unit (lamports per SOL).
    pub units_per_major: u64,

    /// Token used by the paymaster to settle fees.
    pub fee_token: String,

    /// Compute unit limit requested for the transaction.
    pub compute_unit_limit: u32,

    /// Error message fragments that mark an expired validity anchor.
    /// Only consulted when the signer reports an unclassified error.
    pub transient_markers: Vec<String>,
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            retry_delay_ms: 500,
            units_per_major: solana_native_token::LAMPORTS_PER_SOL,
            fee_token: "SOL".to_string(),
            compute_unit_limit: 500_000,
            transient_markers: crate::transfer::classify::DEFAULT_TRANSIENT_MARKERS
                .iter()
                .map(|m| m.to_string())
                .collect(),
        }
    }
}

/// Balance polling configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BalanceConfig {
    /// Polling interval in milliseconds.
    pub poll_interval_ms: u64,
}

impl Default for BalanceConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 10_000,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Filter directive used when `RUST_LOG` is unset (e.g. "info").
    pub log_level: String,

    /// Pretty output for development, JSON for machine parsing.
    pub log_format: LogFormat,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "gasless_transfer=info".to_string(),
            log_format: LogFormat::Pretty,
        }
    }
}
