//! Expiring key-value store for lcache.
//!
//! Holds type-erased values keyed by string, each with its own time to live,
//! on top of a [`moka::sync::Cache`]. Expired entries read as absent
//! immediately; moka reclaims them during its housekeeping.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod store;

pub use store::{ExpiringStore, StoreStats, StoredValue};
