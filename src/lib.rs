//! Gasless SOL transfers through a passkey smart wallet.
//!
//! Validates transfer input, hands a single system transfer to an external
//! signer, and retries when the transaction's blockhash expired before it
//! landed. Also reads balances and tracks confirmations over JSON-RPC.

pub mod blockchain;
pub mod config;
pub mod observability;
pub mod resilience;
pub mod session;
pub mod transfer;

pub use blockchain::RpcClient;
pub use config::AppConfig;
pub use session::WalletSession;
pub use transfer::{SignAndSubmit, TransferFlow, TransferForm, TransferOutcome};
