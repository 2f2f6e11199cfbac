//! Loader contract.
//!
//! A loader maps a key to an [`ExpireVal`] and is only invoked on a confirmed
//! miss. The cache may call it more than once for the same key across separate
//! miss windows, so it must be idempotent.

use crate::envelope::ExpireVal;

/// Error type returned by loaders. Surfaced to callers unchanged.
pub type LoadError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Produces a value for a key on a cache miss.
///
/// Loaders run while the cache's coordination lock is held. Calling back into
/// the same cache from inside `load` deadlocks.
pub trait Loader<T>: Send + Sync {
    /// Loads the value for `key`.
    fn load(&self, key: &str) -> Result<ExpireVal<T>, LoadError>;
}

impl<T, F> Loader<T> for F
where
    F: Fn(&str) -> Result<ExpireVal<T>, LoadError> + Send + Sync,
{
    fn load(&self, key: &str) -> Result<ExpireVal<T>, LoadError> {
        self(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    struct Upper;

    impl Loader<String> for Upper {
        fn load(&self, key: &str) -> Result<ExpireVal<String>, LoadError> {
            if key.is_empty() {
                return Err("empty key".into());
            }
            Ok(ExpireVal::new(key.to_uppercase(), Duration::from_secs(1)))
        }
    }

    #[test]
    fn test_closure_loader() {
        let loader = |key: &str| -> Result<ExpireVal<usize>, LoadError> {
            Ok(ExpireVal::never(key.len()))
        };
        assert_eq!(*loader.load("bob.eth").unwrap().value(), 7);
    }

    #[test]
    fn test_trait_object_loader() {
        let loader: Arc<dyn Loader<String>> = Arc::new(Upper);
        assert_eq!(loader.load("alice").unwrap().into_value(), "ALICE");
        assert_eq!(loader.load("").unwrap_err().to_string(), "empty key");
    }
}
