//! # Beacon Provider
//!
//! Cache-aside feature-flag resolution backed by a remote key-value
//! store.
//!
//! The [`FlagProvider`] facade exposes one resolution operation per
//! supported type (boolean, integer, double, string, structured). Every
//! resolution consults the local [`FlagCache`] first; on a miss the raw
//! value is fetched from the store, parsed, cached and returned. A
//! background [`InvalidationListener`] evicts cache entries whenever any
//! writer publishes a flag update, so the next resolution re-fetches the
//! source of truth.
//!
//! No failure escapes a resolution call: every error path is converted
//! into a [`flag_core::ResolutionDetails`] carrying the caller-supplied
//! default and an error kind.

pub mod cache;
pub mod listener;
pub mod provider;

pub use cache::FlagCache;
pub use listener::InvalidationListener;
pub use provider::FlagProvider;
