use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;
use errors::StoreError;
use flag_core::FlagStore;
use tokio::sync::{broadcast, mpsc};

/// In-memory flag store for tests.
///
/// Counts every `get` so tests can verify the cache-aside fast path, and
/// delivers `publish_update` notifications to subscribers through an
/// in-process broadcast channel. Failure modes are injectable per
/// fixture: a store that cannot subscribe (degraded provider mode), a
/// store whose reads fail, and a store whose reads stall long enough to
/// trip the fetch timeout.
pub struct InMemoryFlagStore {
    values: DashMap<String, String>,
    access_count: AtomicUsize,
    update_tx: broadcast::Sender<String>,
    fail_get: bool,
    fail_subscribe: bool,
    get_delay: Option<Duration>,
}

impl InMemoryFlagStore {
    pub fn new() -> Self {
        let (update_tx, _) = broadcast::channel(64);
        Self {
            values: DashMap::new(),
            access_count: AtomicUsize::new(0),
            update_tx,
            fail_get: false,
            fail_subscribe: false,
            get_delay: None,
        }
    }

    /// Seeds a flag value, builder style.
    pub fn with_flag(self, key: &str, value: &str) -> Self {
        self.values.insert(key.to_string(), value.to_string());
        self
    }

    /// A store whose reads always fail with a query error.
    pub fn failing() -> Self {
        Self {
            fail_get: true,
            ..Self::new()
        }
    }

    /// A store whose subscription attempt always fails.
    pub fn without_subscription() -> Self {
        Self {
            fail_subscribe: true,
            ..Self::new()
        }
    }

    /// A store whose reads stall for `delay` before answering.
    pub fn with_get_delay(self, delay: Duration) -> Self {
        Self {
            get_delay: Some(delay),
            ..self
        }
    }

    /// Writes a flag value directly, without touching the access counter
    /// or publishing a notification.
    pub fn seed_flag(&self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }

    /// Number of `get` calls the store has served so far.
    pub fn access_count(&self) -> usize {
        self.access_count.load(Ordering::SeqCst)
    }
}

impl Default for InMemoryFlagStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FlagStore for InMemoryFlagStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.access_count.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = self.get_delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_get {
            return Err(StoreError::QueryError {
                backend: "InMemory".to_string(),
                reason: "injected failure".to_string(),
            });
        }

        Ok(self.values.get(key).map(|entry| entry.value().clone()))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn publish_update(&self, key: &str) -> Result<(), StoreError> {
        // No subscribers is fine, same as publishing to an idle channel
        let _ = self.update_tx.send(key.to_string());
        Ok(())
    }

    async fn subscribe_updates(&self) -> Result<mpsc::Receiver<String>, StoreError> {
        if self.fail_subscribe {
            return Err(StoreError::SubscriptionError {
                channel: "feature_flag_updates".to_string(),
                reason: "injected failure".to_string(),
            });
        }

        let mut update_rx = self.update_tx.subscribe();
        let (tx, rx) = mpsc::channel(64);

        tokio::spawn(async move {
            loop {
                match update_rx.recv().await {
                    Ok(key) => {
                        if tx.send(key).await.is_err() {
                            return;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "Test subscriber lagged");
                    }
                    Err(broadcast::error::RecvError::Closed) => return,
                }
            }
        });

        Ok(rx)
    }
}
