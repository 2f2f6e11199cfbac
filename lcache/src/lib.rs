//! # lcache
//!
//! In-process memoizing cache. Given a key, [`LocalCache`] returns the stored
//! value if it is still live, or runs a [`Loader`] exactly once for the miss,
//! stores the result with the loader's chosen ttl, and returns it.
//!
//! ## Example
//!
//! ```rust
//! use std::time::Duration;
//! use lcache::{CacheConfig, ExpireVal, LoadError, LocalCache};
//!
//! let cache = LocalCache::with_loader(
//!     &CacheConfig::default(),
//!     |name: &str| -> Result<ExpireVal<String>, LoadError> {
//!         Ok(ExpireVal::new(format!("resolved:{name}"), Duration::from_secs(60)))
//!     },
//! );
//!
//! let first = cache.get("alice.eth").unwrap();
//! assert_eq!(first.as_str(), "resolved:alice.eth");
//! assert_eq!(cache.stats().loads, 1);
//!
//! // second lookup is served from the store
//! cache.get("alice.eth").unwrap();
//! assert_eq!(cache.stats().hits, 1);
//! ```
//!
//! ## Concurrency
//!
//! Lookups of live entries never take the coordination lock. Misses are
//! serialized on one lock per cache instance, across all keys, and the loader
//! runs while it is held. Calling back into the same cache from a loader or a
//! [`LocalCache::lock`] callback deadlocks.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod cache;
mod stats;

pub use cache::LocalCache;
pub use stats::CacheStats;

pub use lcache_core::{
    constants, CacheConfig, CacheError, ConfigError, Expiration, ExpireVal, LoadError, Loader,
    Result,
};
pub use lcache_store::{ExpiringStore, StoreStats, StoredValue};
