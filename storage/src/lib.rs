//! # Storage Layer
//!
//! Redis-backed implementation of the [`flag_core::FlagStore`] trait.
//!
//! Flag values live in Redis as plain strings; invalidation notifications
//! travel over a single pub/sub channel whose payload is the flag key.

pub mod redis;

pub use redis::RedisFlagStore;
