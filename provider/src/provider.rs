//! The flag-resolution facade.

use std::sync::Arc;
use std::time::Duration;

use config::FlagsSettings;
use flag_core::{ErrorKind, FlagStore, FlagValue, ResolutionDetails, decode_document};

use crate::cache::FlagCache;
use crate::listener::InvalidationListener;

/// Resolves typed flag values against a remote store, caching successful
/// resolutions locally.
///
/// Construction establishes the invalidation subscription before any
/// resolution call is accepted; a subscription failure is logged and the
/// provider continues in degraded mode (resolutions work, but cache
/// entries mutated by other processes may go stale).
pub struct FlagProvider<S: FlagStore> {
    store: Arc<S>,
    cache: Arc<FlagCache>,
    listener: InvalidationListener,
    fetch_timeout: Duration,
}

impl<S: FlagStore> FlagProvider<S> {
    pub async fn new(store: Arc<S>, settings: &FlagsSettings) -> Self {
        let cache = Arc::new(FlagCache::new());

        let listener = match store.subscribe_updates().await {
            Ok(updates) => {
                tracing::info!(channel = %settings.channel, "Flag update subscription established");
                InvalidationListener::spawn(updates, cache.clone())
            }
            Err(e) => {
                tracing::error!(
                    channel = %settings.channel,
                    error = %e,
                    "Flag update subscription failed, local cache may serve stale data"
                );
                InvalidationListener::inactive()
            }
        };

        Self {
            store,
            cache,
            listener,
            fetch_timeout: settings.fetch_timeout(),
        }
    }

    /// Whether the invalidation listener is running. False means the
    /// provider is in degraded mode.
    pub fn invalidation_active(&self) -> bool {
        self.listener.is_active()
    }

    /// Stops the invalidation listener cleanly.
    pub async fn shutdown(mut self) {
        self.listener.shutdown().await;
    }

    pub async fn resolve_bool(&self, flag_key: &str, default_value: bool) -> ResolutionDetails<bool> {
        self.resolve_with(flag_key, default_value, parse_bool, FlagValue::as_bool)
            .await
    }

    pub async fn resolve_int(&self, flag_key: &str, default_value: i64) -> ResolutionDetails<i64> {
        self.resolve_with(
            flag_key,
            default_value,
            |raw| raw.trim().parse().ok(),
            FlagValue::as_int,
        )
        .await
    }

    pub async fn resolve_float(&self, flag_key: &str, default_value: f64) -> ResolutionDetails<f64> {
        self.resolve_with(
            flag_key,
            default_value,
            |raw| raw.trim().parse().ok(),
            FlagValue::as_float,
        )
        .await
    }

    pub async fn resolve_string(
        &self,
        flag_key: &str,
        default_value: String,
    ) -> ResolutionDetails<String> {
        self.resolve_with(
            flag_key,
            default_value,
            |raw| Some(raw.to_string()),
            |cached| cached.as_str().map(str::to_string),
        )
        .await
    }

    /// Resolves a composite (object or array) flag value.
    ///
    /// The raw string is parsed as a JSON document and decoded into a
    /// [`FlagValue`]. A document that is JSON null counts as a type
    /// mismatch, same as an unparseable one.
    pub async fn resolve_structure(
        &self,
        flag_key: &str,
        default_value: FlagValue,
    ) -> ResolutionDetails<FlagValue> {
        if let Some(cached) = self.cache.get(flag_key) {
            return ResolutionDetails::ok(flag_key, cached);
        }

        let raw = match self.fetch_raw(flag_key).await {
            Ok(raw) => raw,
            Err(message) => {
                return ResolutionDetails::error(flag_key, default_value, ErrorKind::General, message);
            }
        };

        let Some(raw) = raw.filter(|value| !value.is_empty()) else {
            return ResolutionDetails::error(
                flag_key,
                default_value,
                ErrorKind::FlagNotFound,
                "Flag not found",
            );
        };

        match serde_json::from_str::<serde_json::Value>(&raw) {
            Ok(serde_json::Value::Null) => ResolutionDetails::error(
                flag_key,
                default_value,
                ErrorKind::TypeMismatch,
                "Flag value is null",
            ),
            Ok(document) => {
                let value = decode_document(&document);
                self.cache.insert(flag_key, value.clone());
                ResolutionDetails::ok(flag_key, value)
            }
            Err(e) => ResolutionDetails::error(
                flag_key,
                default_value,
                ErrorKind::TypeMismatch,
                format!("Error deserializing flag value: {e}"),
            ),
        }
    }

    /// Cache-aside resolution shared by all scalar flag types.
    ///
    /// `parse` turns the raw store string into the target type; `unwrap`
    /// extracts the target type from a cached [`FlagValue`]. A cached
    /// entry of a different variant is treated as a miss and re-fetched;
    /// the fresh parse overwrites it.
    async fn resolve_with<T, P, U>(
        &self,
        flag_key: &str,
        default_value: T,
        parse: P,
        unwrap: U,
    ) -> ResolutionDetails<T>
    where
        T: Clone + Into<FlagValue>,
        P: Fn(&str) -> Option<T>,
        U: Fn(&FlagValue) -> Option<T>,
    {
        if let Some(cached) = self.cache.get(flag_key) {
            if let Some(value) = unwrap(&cached) {
                return ResolutionDetails::ok(flag_key, value);
            }
        }

        let raw = match self.fetch_raw(flag_key).await {
            Ok(raw) => raw,
            Err(message) => {
                return ResolutionDetails::error(flag_key, default_value, ErrorKind::General, message);
            }
        };

        let Some(raw) = raw.filter(|value| !value.is_empty()) else {
            return ResolutionDetails::error(
                flag_key,
                default_value,
                ErrorKind::FlagNotFound,
                "Flag not found",
            );
        };

        match parse(&raw) {
            Some(value) => {
                self.cache.insert(flag_key, value.clone().into());
                ResolutionDetails::ok(flag_key, value)
            }
            None => ResolutionDetails::error(
                flag_key,
                default_value,
                ErrorKind::TypeMismatch,
                "Invalid flag value",
            ),
        }
    }

    /// Fetches the raw value from the store, bounded by the configured
    /// timeout. A timed-out fetch reports an error and never reaches the
    /// cache.
    async fn fetch_raw(&self, flag_key: &str) -> Result<Option<String>, String> {
        match tokio::time::timeout(self.fetch_timeout, self.store.get(flag_key)).await {
            Ok(Ok(raw)) => {
                tracing::debug!(flag_key = %flag_key, found = raw.is_some(), "Fetched flag value");
                Ok(raw)
            }
            Ok(Err(e)) => Err(e.to_string()),
            Err(_) => Err(format!(
                "Flag fetch timed out after {}ms",
                self.fetch_timeout.as_millis()
            )),
        }
    }
}

/// Case-insensitive boolean parse, accepting the same spellings the
/// operator tooling writes ("true", "True", "FALSE", ...).
fn parse_bool(raw: &str) -> Option<bool> {
    let trimmed = raw.trim();
    if trimmed.eq_ignore_ascii_case("true") {
        Some(true)
    } else if trimmed.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}
