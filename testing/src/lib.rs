//! Shared test fixtures for the Beacon workspace.
//!
//! Provides an in-memory [`flag_core::FlagStore`] with a store-access
//! counter and injectable failure modes, so provider tests can assert
//! cache behavior and degraded modes without a running Redis.

mod fixtures;

pub use fixtures::InMemoryFlagStore;
