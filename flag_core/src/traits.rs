//! Core traits for the Beacon feature-flag system.

use async_trait::async_trait;
use errors::StoreError;
use tokio::sync::mpsc;

/// Remote key-value store backing the flag provider.
///
/// The store is an opaque string store: flag values are stored as plain
/// scalar text or JSON documents and only parsed on the provider side.
/// `set` and `publish_update` belong to the operator write path; the
/// resolution read path only uses `get` and `subscribe_updates`.
#[async_trait]
pub trait FlagStore: Send + Sync {
    /// Fetches the raw value for `key`, or `None` when the key is absent.
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Writes the raw value for `key`.
    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Publishes an invalidation notification for `key` on the
    /// flag-update channel.
    async fn publish_update(&self, key: &str) -> Result<(), StoreError>;

    /// Subscribes to the flag-update channel.
    ///
    /// Each received message payload is the plain flag key text. Delivery
    /// order and duplication guarantees are inherited from the underlying
    /// channel; callers must treat notifications as eviction hints, not
    /// as an ordered event log.
    async fn subscribe_updates(&self) -> Result<mpsc::Receiver<String>, StoreError>;
}
