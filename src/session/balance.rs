//! Periodic balance polling for a connected wallet.
//!
//! The watcher runs as its own task and publishes readings through a
//! `watch` channel. It stops when the owning session broadcasts shutdown or
//! is dropped.

use futures_util::stream::{BoxStream, StreamExt};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tokio::time;

use crate::blockchain::address::Pubkey;
use crate::blockchain::amount::to_major_units;
use crate::blockchain::client::BalanceSource;

/// One successful balance read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BalanceReading {
    pub lamports: u64,
}

impl BalanceReading {
    pub fn major_units(&self, units_per_major: u64) -> f64 {
        to_major_units(self.lamports, units_per_major)
    }
}

pub struct BalanceWatcher<B: ?Sized> {
    source: Arc<B>,
    address: Pubkey,
    interval: Duration,
}

impl<B> BalanceWatcher<B>
where
    B: BalanceSource + ?Sized + 'static,
{
    pub fn new(source: Arc<B>, address: Pubkey, interval: Duration) -> Self {
        Self {
            source,
            address,
            interval: interval.max(Duration::from_millis(1)),
        }
    }

    /// Spawn the polling task. The first read happens immediately.
    pub fn spawn(self, shutdown: broadcast::Receiver<()>) -> BalanceWatch {
        let (tx, rx) = watch::channel(None);
        let handle = tokio::spawn(self.run(tx, shutdown));
        BalanceWatch { rx, handle }
    }

    async fn run(self, tx: watch::Sender<Option<BalanceReading>>, mut shutdown: broadcast::Receiver<()>) {
        tracing::info!(
            address = %self.address,
            interval_ms = self.interval.as_millis() as u64,
            "Balance watcher starting"
        );

        let mut ticker = time::interval(self.interval);
        ticker.set_missed_tick_behavior(time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    match self.source.get_balance(&self.address).await {
                        Ok(lamports) => {
                            tracing::debug!(address = %self.address, lamports, "Balance updated");
                            if tx.send(Some(BalanceReading { lamports })).is_err() {
                                break;
                            }
                        }
                        // keep the last good reading
                        Err(e) => tracing::warn!(address = %self.address, error = %e, "Balance read failed"),
                    }
                }
                // Ok = disconnect, Err = session dropped
                _ = shutdown.recv() => break,
            }
        }

        tracing::info!(address = %self.address, "Balance watcher stopped");
    }
}

/// Handle to a running watcher.
#[derive(Debug)]
pub struct BalanceWatch {
    rx: watch::Receiver<Option<BalanceReading>>,
    handle: JoinHandle<()>,
}

impl BalanceWatch {
    /// Most recent reading, `None` until the first successful read.
    pub fn latest(&self) -> Option<BalanceReading> {
        *self.rx.borrow()
    }

    /// Readings as a stream, starting with the latest one if any. Ends when
    /// the watcher stops. A slow consumer sees the newest reading, not every
    /// one.
    pub fn stream(&self) -> BoxStream<'static, BalanceReading> {
        futures_util::stream::unfold(self.rx.clone(), |mut rx| async move {
            loop {
                rx.changed().await.ok()?;
                let reading = *rx.borrow_and_update();
                if let Some(reading) = reading {
                    return Some((reading, rx));
                }
            }
        })
        .boxed()
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the polling task to exit.
    pub async fn stopped(self) {
        if let Err(e) = self.handle.await {
            tracing::error!(error = %e, "Balance watcher task failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockchain::types::{BlockchainError, BlockchainResult};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU64, Ordering};

    /// Balance grows by 10 per read; every third read fails.
    struct GrowingBalance {
        reads: AtomicU64,
    }

    #[async_trait]
    impl BalanceSource for GrowingBalance {
        async fn get_balance(&self, _address: &Pubkey) -> BlockchainResult<u64> {
            let n = self.reads.fetch_add(1, Ordering::SeqCst) + 1;
            if n % 3 == 0 {
                return Err(BlockchainError::Rpc("flaky".into()));
            }
            Ok(n * 10)
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_stream_skips_failed_reads_and_ends_on_shutdown() {
        let source = Arc::new(GrowingBalance {
            reads: AtomicU64::new(0),
        });
        let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
        let watch = BalanceWatcher::new(source, Pubkey::new_from_array([3u8; 32]), Duration::from_secs(1))
            .spawn(shutdown_rx);

        let readings: Vec<u64> = watch.stream().take(3).map(|r| r.lamports).collect().await;
        assert_eq!(readings, vec![10, 20, 40]);
        assert_eq!(watch.latest(), Some(BalanceReading { lamports: 40 }));

        shutdown_tx.send(()).unwrap();
        let rest: Vec<BalanceReading> = watch.stream().collect().await;
        assert_eq!(rest, vec![BalanceReading { lamports: 40 }]);
        watch.stopped().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_sender_stops_watcher() {
        let source = Arc::new(GrowingBalance {
            reads: AtomicU64::new(0),
        });
        let (shutdown_tx, shutdown_rx) = broadcast::channel::<()>(1);
        let watch = BalanceWatcher::new(source, Pubkey::new_from_array([4u8; 32]), Duration::from_millis(100))
            .spawn(shutdown_rx);

        drop(shutdown_tx);
        watch.stopped().await;
    }

    #[test]
    fn test_reading_major_units() {
        let reading = BalanceReading { lamports: 1_500_000_000 };
        assert_eq!(reading.major_units(1_000_000_000), 1.5);
    }
}
