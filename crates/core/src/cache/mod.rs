//! SQLite-backed cache for fetched chapter texts.
//!
//! [`TextCache`] is the only type callers need: an expiring in-memory map
//! that persists itself in batches. [`CacheDb`] is the storage underneath,
//! exposed for tests and maintenance tooling.
//!
//! - One row per `(section, unit_index, version)`
//! - Automatic schema migrations
//! - WAL mode for concurrent access

pub mod connection;
pub mod entries;
pub mod migrations;
pub mod store;

pub use crate::Error;

pub use connection::CacheDb;
pub use entries::{CacheEntry, CacheKey};
pub use store::TextCache;
