//! # Beacon Core
//!
//! Shared types and traits for the Beacon feature-flag system.
//!
//! This crate provides:
//! - The `FlagValue` tagged union used for structured flag values
//! - The `ResolutionDetails` outcome type returned by every resolution
//! - The `FlagStore` trait abstracting the remote key-value store
//! - The JSON document decoder used by the structured resolver

pub mod traits;
pub mod types;
pub mod value;

// Re-export commonly used types for convenience
pub use traits::FlagStore;
pub use types::{ErrorKind, ResolutionDetails};
pub use value::{FlagValue, decode_document};
