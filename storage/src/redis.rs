use async_trait::async_trait;
use errors::StoreError;
use flag_core::FlagStore;
use futures_util::StreamExt;
use redis::AsyncCommands;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Redis-backed flag store.
///
/// Commands go through a shared [`redis::aio::ConnectionManager`] that is
/// cloned per call; the pub/sub subscription uses a dedicated connection
/// because Redis connections in subscribe mode cannot issue regular
/// commands.
pub struct RedisFlagStore {
    client: Arc<redis::Client>,
    connection_manager: redis::aio::ConnectionManager,
    channel: String,
}

impl RedisFlagStore {
    pub async fn new(connection_string: &str, channel: &str) -> Result<Self, StoreError> {
        let client =
            redis::Client::open(connection_string).map_err(|e| StoreError::ConnectionError {
                backend: "Redis".to_string(),
                reason: e.to_string(),
            })?;

        let connection_manager =
            client
                .get_connection_manager()
                .await
                .map_err(|e| StoreError::ConnectionError {
                    backend: "Redis".to_string(),
                    reason: e.to_string(),
                })?;

        Ok(Self {
            client: Arc::new(client),
            connection_manager,
            channel: channel.to_string(),
        })
    }

    /// The pub/sub channel this store publishes and subscribes on.
    pub fn channel(&self) -> &str {
        &self.channel
    }

    pub async fn delete_key(&self, key: &str) -> Result<(), StoreError> {
        let mut conn = self.connection_manager.clone();
        conn.del(key).await.map_err(|e| StoreError::QueryError {
            backend: "Redis".to_string(),
            reason: e.to_string(),
        })
    }

    pub async fn exists_key(&self, key: &str) -> Result<bool, StoreError> {
        let mut conn = self.connection_manager.clone();
        conn.exists(key).await.map_err(|e| StoreError::QueryError {
            backend: "Redis".to_string(),
            reason: e.to_string(),
        })
    }
}

#[async_trait]
impl FlagStore for RedisFlagStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let mut conn = self.connection_manager.clone();
        conn.get(key).await.map_err(|e| StoreError::QueryError {
            backend: "Redis".to_string(),
            reason: e.to_string(),
        })
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut conn = self.connection_manager.clone();
        conn.set(key, value)
            .await
            .map_err(|e| StoreError::QueryError {
                backend: "Redis".to_string(),
                reason: e.to_string(),
            })
    }

    async fn publish_update(&self, key: &str) -> Result<(), StoreError> {
        let mut conn = self.connection_manager.clone();
        let _: () = conn
            .publish(&self.channel, key)
            .await
            .map_err(|e| StoreError::PublishError {
                backend: "Redis".to_string(),
                reason: e.to_string(),
            })?;
        Ok(())
    }

    async fn subscribe_updates(&self) -> Result<mpsc::Receiver<String>, StoreError> {
        let mut pubsub =
            self.client
                .get_async_pubsub()
                .await
                .map_err(|e| StoreError::SubscriptionError {
                    channel: self.channel.clone(),
                    reason: e.to_string(),
                })?;

        pubsub
            .subscribe(&self.channel)
            .await
            .map_err(|e| StoreError::SubscriptionError {
                channel: self.channel.clone(),
                reason: e.to_string(),
            })?;

        let (tx, rx) = mpsc::channel(100);
        let channel = self.channel.clone();

        tokio::spawn(async move {
            let mut stream = pubsub.on_message();
            while let Some(msg) = stream.next().await {
                match msg.get_payload::<String>() {
                    Ok(payload) => {
                        if tx.send(payload).await.is_err() {
                            // Receiver dropped, subscription no longer wanted
                            return;
                        }
                    }
                    Err(e) => {
                        tracing::warn!(
                            channel = %channel,
                            error = %e,
                            "Discarding non-text pub/sub payload"
                        );
                    }
                }
            }
            tracing::debug!(channel = %channel, "Pub/sub message stream ended");
        });

        Ok(rx)
    }
}
