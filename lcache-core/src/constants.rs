//! Defaults and environment variable names.

/// Default expiration for entries stored with
/// [`Expiration::Default`](crate::Expiration::Default).
pub const DEFAULT_EXPIRATION_MS: u64 = 5 * 60 * 1000;

/// Default interval between housekeeping passes over expired entries.
pub const DEFAULT_CLEANUP_INTERVAL_MS: u64 = 60 * 1000;

/// Environment variable overriding the default expiration, in milliseconds.
pub const ENV_DEFAULT_EXPIRATION_MS: &str = "LCACHE_DEFAULT_EXPIRATION_MS";

/// Environment variable overriding the housekeeping interval, in milliseconds.
pub const ENV_CLEANUP_INTERVAL_MS: &str = "LCACHE_CLEANUP_INTERVAL_MS";
