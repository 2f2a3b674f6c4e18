//! Connected smart-wallet session.
//!
//! The wallet SDK performs the passkey ceremony and hands back the smart
//! wallet address; this type only tracks that address and the background
//! work bound to it.
//!
//! # Lifecycle
//! ```text
//! connect(address) → watch_balance(..) spawns pollers
//! disconnect() / drop → shutdown broadcast → pollers exit
//! reconnect = new session, new pollers
//! ```

pub mod balance;

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;

use crate::blockchain::address::{abbreviate, Pubkey};
use crate::blockchain::client::BalanceSource;
use crate::config::BalanceConfig;

pub use balance::{BalanceReading, BalanceWatch, BalanceWatcher};

#[derive(Debug)]
pub struct WalletSession {
    smart_wallet: Pubkey,
    shutdown: broadcast::Sender<()>,
}

impl WalletSession {
    pub fn connect(smart_wallet: Pubkey) -> Self {
        let (shutdown, _) = broadcast::channel(1);
        tracing::info!(smart_wallet = %smart_wallet, "Wallet session connected");
        Self {
            smart_wallet,
            shutdown,
        }
    }

    pub fn address(&self) -> &Pubkey {
        &self.smart_wallet
    }

    /// Short form for labels, e.g. `FKjSjCqB...zBeC42bH`.
    pub fn label(&self) -> String {
        abbreviate(&self.smart_wallet, 8)
    }

    /// Start polling this wallet's balance until the session ends.
    pub fn watch_balance<B>(&self, source: Arc<B>, config: &BalanceConfig) -> BalanceWatch
    where
        B: BalanceSource + ?Sized + 'static,
    {
        BalanceWatcher::new(
            source,
            self.smart_wallet,
            Duration::from_millis(config.poll_interval_ms),
        )
        .spawn(self.shutdown.subscribe())
    }

    /// End the session and stop its watchers.
    pub fn disconnect(self) {
        let stopped = self.shutdown.send(()).unwrap_or(0);
        tracing::info!(
            smart_wallet = %self.smart_wallet,
            watchers = stopped,
            "Wallet session disconnected"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockchain::types::BlockchainResult;
    use async_trait::async_trait;
    use futures_util::StreamExt;

    struct FixedBalance(u64);

    #[async_trait]
    impl BalanceSource for FixedBalance {
        async fn get_balance(&self, _address: &Pubkey) -> BlockchainResult<u64> {
            Ok(self.0)
        }
    }

    #[test]
    fn test_label() {
        let address: Pubkey = "FKjSjCqByQRwSzZoMXA7bKnDbJe41YgJTHFFzBeC42bH".parse().unwrap();
        let session = WalletSession::connect(address);
        assert_eq!(session.label(), "FKjSjCqB...zBeC42bH");
    }

    #[tokio::test(start_paused = true)]
    async fn test_disconnect_stops_all_watchers() {
        let session = WalletSession::connect(Pubkey::new_from_array([5u8; 32]));
        let config = BalanceConfig {
            poll_interval_ms: 1000,
        };
        let first = session.watch_balance(Arc::new(FixedBalance(7)), &config);
        let second = session.watch_balance(Arc::new(FixedBalance(9)), &config);

        let reading = first.stream().next().await;
        assert_eq!(reading, Some(BalanceReading { lamports: 7 }));

        session.disconnect();
        first.stopped().await;
        second.stopped().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_reconnect_starts_fresh_watcher() {
        let address = Pubkey::new_from_array([6u8; 32]);
        let config = BalanceConfig::default();

        let session = WalletSession::connect(address);
        let watch = session.watch_balance(Arc::new(FixedBalance(1)), &config);
        drop(session);
        watch.stopped().await;

        let session = WalletSession::connect(address);
        let watch = session.watch_balance(Arc::new(FixedBalance(2)), &config);
        assert_eq!(watch.stream().next().await, Some(BalanceReading { lamports: 2 }));
        assert!(!watch.is_finished());
    }
}
