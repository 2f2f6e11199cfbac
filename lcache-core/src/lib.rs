//! # lcache core
//!
//! Foundational types shared by the lcache crates:
//!
//! - **Envelope**: [`ExpireVal`], a value paired with the [`Expiration`] to apply on store
//! - **Loader**: the [`Loader`] contract invoked on a confirmed miss
//! - **Errors**: [`CacheError`] and [`ConfigError`]
//! - **Config**: [`CacheConfig`] for the store's default expiration and housekeeping interval
//!
//! ## Example
//!
//! ```rust
//! use std::time::Duration;
//! use lcache_core::{ExpireVal, Expiration, LoadError};
//!
//! let loader = |key: &str| -> Result<ExpireVal<usize>, LoadError> {
//!     Ok(ExpireVal::new(key.len(), Duration::from_secs(30)))
//! };
//! let val = lcache_core::Loader::load(&loader, "alice").unwrap();
//! assert_eq!(*val.value(), 5);
//! assert_eq!(val.expiration(), Expiration::After(Duration::from_secs(30)));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, clippy::all)]

pub mod config;
pub mod constants;
pub mod envelope;
pub mod error;
pub mod loader;

pub use config::CacheConfig;
pub use envelope::{Expiration, ExpireVal};
pub use error::{CacheError, ConfigError, Result};
pub use loader::{LoadError, Loader};
