//! Error types for lcache.
//!
//! Loader failures pass through untouched; configuration problems carry the
//! offending variable and value.

use thiserror::Error;

use crate::loader::LoadError;

/// Result type alias using `CacheError`.
pub type Result<T> = std::result::Result<T, CacheError>;

/// Errors surfaced by cache lookups.
#[derive(Debug, Error)]
pub enum CacheError {
    /// The loader failed for the requested key. Displays as the loader's own error.
    #[error(transparent)]
    Loader(LoadError),

    /// `get` was called on a cache built without a default loader.
    #[error("No loader configured for key '{key}'")]
    NoLoader {
        /// Key that missed.
        key: String,
    },
}

impl CacheError {
    /// Returns true if this error came out of a loader invocation.
    pub fn is_load_failure(&self) -> bool {
        matches!(self, CacheError::Loader(_))
    }

    /// Returns the loader's error, if this is a load failure.
    pub fn loader_error(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        match self {
            CacheError::Loader(e) => Some(e.as_ref()),
            CacheError::NoLoader { .. } => None,
        }
    }
}

/// Errors raised while building a [`CacheConfig`](crate::CacheConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An environment variable held something that is not a millisecond count.
    #[error("Invalid value for {var}: '{value}' (expected milliseconds)")]
    InvalidValue {
        /// Variable name.
        var: &'static str,
        /// Raw value found.
        value: String,
    },
}
