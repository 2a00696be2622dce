//! Background task evicting cache entries on flag-update notifications.

use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use crate::cache::FlagCache;

/// Handle to the invalidation listener task.
///
/// The listener is spawned once, at provider construction, from the
/// store's update subscription. If the subscription could not be
/// established the handle is inactive: the provider keeps resolving
/// flags, but cached entries for keys mutated elsewhere may stay stale
/// until the process restarts.
pub struct InvalidationListener {
    handle: Option<JoinHandle<()>>,
    shutdown_tx: Option<watch::Sender<bool>>,
}

impl InvalidationListener {
    /// Spawns the eviction loop over `updates`.
    pub fn spawn(mut updates: mpsc::Receiver<String>, cache: Arc<FlagCache>) -> Self {
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);

        let handle = tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = shutdown_rx.changed() => break,
                    notification = updates.recv() => match notification {
                        Some(flag_key) => {
                            if flag_key.is_empty() {
                                continue;
                            }
                            let evicted = cache.evict(&flag_key);
                            tracing::debug!(flag_key = %flag_key, evicted, "Flag updated, cache entry evicted");
                        }
                        // Subscription stream ended (store dropped)
                        None => break,
                    },
                }
            }
            tracing::debug!("Invalidation listener stopped");
        });

        Self {
            handle: Some(handle),
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// A listener that never ran because the subscription failed.
    pub fn inactive() -> Self {
        Self {
            handle: None,
            shutdown_tx: None,
        }
    }

    /// Whether the eviction loop is running.
    pub fn is_active(&self) -> bool {
        self.handle
            .as_ref()
            .map(|handle| !handle.is_finished())
            .unwrap_or(false)
    }

    /// Signals the eviction loop to stop and waits for it to exit.
    pub async fn shutdown(&mut self) {
        if let Some(shutdown_tx) = self.shutdown_tx.take() {
            let _ = shutdown_tx.send(true);
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn evicts_on_notification() {
        let cache = Arc::new(FlagCache::new());
        cache.insert("feature-a", flag_core::FlagValue::Bool(true));

        let (tx, rx) = mpsc::channel(8);
        let mut listener = InvalidationListener::spawn(rx, cache.clone());

        tx.send("feature-a".to_string()).await.expect("send should succeed");

        // Give the listener task a chance to process the notification
        tokio::time::timeout(std::time::Duration::from_secs(1), async {
            while cache.contains("feature-a") {
                tokio::task::yield_now().await;
            }
        })
        .await
        .expect("entry should be evicted");

        listener.shutdown().await;
    }

    #[tokio::test]
    async fn empty_payload_is_skipped() {
        let cache = Arc::new(FlagCache::new());
        cache.insert("feature-a", flag_core::FlagValue::Bool(true));

        let (tx, rx) = mpsc::channel(8);
        let mut listener = InvalidationListener::spawn(rx, cache.clone());

        tx.send(String::new()).await.expect("send should succeed");
        tx.send("unrelated".to_string()).await.expect("send should succeed");

        // Once the second notification is processed the first one has been
        // skipped without touching the cache
        tokio::task::yield_now().await;
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        assert!(cache.contains("feature-a"));

        listener.shutdown().await;
    }

    #[tokio::test]
    async fn shutdown_is_clean_and_detectable() {
        let cache = Arc::new(FlagCache::new());
        let (_tx, rx) = mpsc::channel(8);

        let mut listener = InvalidationListener::spawn(rx, cache);
        assert!(listener.is_active());

        listener.shutdown().await;
        assert!(!listener.is_active());
    }

    #[tokio::test]
    async fn sender_drop_ends_the_task() {
        let cache = Arc::new(FlagCache::new());
        let (tx, rx) = mpsc::channel(8);

        let mut listener = InvalidationListener::spawn(rx, cache);
        drop(tx);

        tokio::time::timeout(std::time::Duration::from_secs(1), async {
            while listener.is_active() {
                tokio::task::yield_now().await;
            }
        })
        .await
        .expect("listener should stop when the subscription closes");

        listener.shutdown().await;
    }

    #[tokio::test]
    async fn inactive_listener_reports_not_active() {
        let listener = InvalidationListener::inactive();
        assert!(!listener.is_active());
    }
}
