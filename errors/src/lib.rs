//! # Beacon Errors
//!
//! Error handling for the Beacon feature-flag system.
//!
//! Uses `thiserror` for structured error definitions with named fields so
//! every message carries the backend and the reason for the failure.

use thiserror::Error;

/// Flag store errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Connection to {backend} failed: {reason}")]
    ConnectionError { backend: String, reason: String },

    #[error("Query on {backend} failed: {reason}")]
    QueryError { backend: String, reason: String },

    #[error("Publish on {backend} failed: {reason}")]
    PublishError { backend: String, reason: String },

    #[error("Subscription to {channel} failed: {reason}")]
    SubscriptionError { channel: String, reason: String },

    #[error("Serialization error: {error_type} - {reason}")]
    SerializationError { error_type: String, reason: String },
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Invalid setting {setting}: {reason}")]
    InvalidValue { setting: String, reason: String },

    #[error("Missing required setting: {setting}")]
    MissingValue { setting: String },
}
