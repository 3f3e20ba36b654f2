//! Periodic collection refresh

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::AdminClient;
use crate::error::Error;
use crate::model::Entity;
use crate::model::Record;

/// Default refresh interval for live screens.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);

/// Configuration for a [`CollectionPoller`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    /// Time between fetches.
    pub interval: Duration,
    /// Capacity of the result channel.
    pub buffer: usize,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            buffer: 4,
        }
    }
}

impl PollConfig {
    /// Sets the refresh interval.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }
}

/// One fetch result delivered by a poller.
pub type PollResult = Result<Vec<Record>, Error>;

/// Re-fetches a collection on a fixed interval and delivers each result
/// over a channel.
///
/// The first fetch happens immediately. Failed fetches are delivered too,
/// so the caller can keep its last good collection and show the error. The
/// poller stops when [`stop`](Self::stop) is called or the receiver is
/// dropped. Dropping the poller itself also stops it.
///
/// # Example
///
/// ```ignore
/// let (poller, mut updates) = CollectionPoller::spawn(client, Entity::AccountRequests, PollConfig::default());
///
/// while let Some(result) = updates.recv().await {
///     match result {
///         Ok(records) => table.replace_collection(records),
///         Err(e) => log::warn!("refresh failed: {}", e),
///     }
/// }
/// ```
#[derive(Debug)]
pub struct CollectionPoller {
    cancel: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl CollectionPoller {
    /// Starts polling `entity` on the current tokio runtime.
    pub fn spawn(
        client: AdminClient,
        entity: Entity,
        config: PollConfig,
    ) -> (Self, mpsc::Receiver<PollResult>) {
        let (tx, rx) = mpsc::channel(config.buffer.max(1));
        let cancel = CancellationToken::new();
        let token = cancel.clone();

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(config.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = token.cancelled() => {
                        log::debug!("poller for {} cancelled", entity);
                        break;
                    }
                    _ = ticker.tick() => {
                        let result = tokio::select! {
                            _ = token.cancelled() => break,
                            result = client.fetch(&entity) => result,
                        };
                        if let Err(e) = &result {
                            log::warn!("refresh of {} failed: {}", entity, e);
                        }
                        if tx.send(result).await.is_err() {
                            log::debug!("poller for {} has no receiver, stopping", entity);
                            break;
                        }
                    }
                }
            }
        });

        (
            Self {
                cancel,
                handle: Some(handle),
            },
            rx,
        )
    }

    /// Signals the poller to stop. An in-flight fetch is abandoned.
    pub fn stop(&self) {
        self.cancel.cancel();
    }

    /// Returns `true` once the poller has been told to stop.
    pub fn is_stopped(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Stops the poller and waits for its task to finish.
    pub async fn shutdown(mut self) {
        self.cancel.cancel();
        if let Some(handle) = self.handle.take()
            && let Err(e) = handle.await
        {
            log::warn!("poller task ended abnormally: {}", e);
        }
    }
}

impl Drop for CollectionPoller {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
