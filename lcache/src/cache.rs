//! Memoizing cache: get-or-load over an expiring store.

use std::any::{type_name, Any};
use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, instrument, warn};

use lcache_core::{CacheConfig, CacheError, ExpireVal, Loader, Result};
use lcache_store::{ExpiringStore, StoredValue};

use crate::stats::{CacheStats, Counters};

/// Memoizing cache for values of type `T`.
///
/// Live entries are read without locking. On a miss the caller takes the
/// coordination lock, re-checks the store, and only then invokes the loader.
/// The lock is per instance, not per key: concurrent misses on different
/// keys run one after another.
///
/// Loader failures are returned to the caller and nothing is stored, so the
/// next lookup for that key calls the loader again.
pub struct LocalCache<T> {
    lock: Mutex<()>,
    store: ExpiringStore,
    loader: Option<Arc<dyn Loader<T>>>,
    counters: Counters,
}

impl<T> LocalCache<T>
where
    T: Any + Send + Sync,
{
    /// Creates a cache with its own store and no default loader.
    ///
    /// Use [`get_with_loader`](Self::get_with_loader) to load on miss.
    pub fn new(config: &CacheConfig) -> Self {
        Self::with_store(ExpiringStore::from_config(config), None)
    }

    /// Creates a cache with its own store and a default loader for [`get`](Self::get).
    pub fn with_loader(config: &CacheConfig, loader: impl Loader<T> + 'static) -> Self {
        Self::with_store(ExpiringStore::from_config(config), Some(Arc::new(loader)))
    }

    /// Creates a cache over an existing store handle.
    ///
    /// Sharing one store between caches of different value types is allowed;
    /// a value of the wrong type reads as a miss.
    pub fn with_store(store: ExpiringStore, loader: Option<Arc<dyn Loader<T>>>) -> Self {
        Self {
            lock: Mutex::new(()),
            store,
            loader,
            counters: Counters::default(),
        }
    }

    /// Returns the value for `key`, loading it with the default loader on a miss.
    ///
    /// Fails with [`CacheError::NoLoader`] if the key is absent and the cache
    /// was built without a default loader.
    pub fn get(&self, key: &str) -> Result<Arc<T>> {
        match self.loader.as_deref() {
            Some(loader) => self.get_with_loader(key, loader),
            None => self
                .get_from_cache(key)
                .ok_or_else(|| CacheError::NoLoader { key: key.to_string() }),
        }
    }

    /// Returns the value for `key`, loading it with `loader` on a miss.
    #[instrument(level = "debug", skip(self, loader))]
    pub fn get_with_loader<L>(&self, key: &str, loader: &L) -> Result<Arc<T>>
    where
        L: Loader<T> + ?Sized,
    {
        if let Some(value) = self.lookup(key) {
            self.counters.hit();
            debug!(key, "Cache hit");
            return Ok(value);
        }
        self.counters.miss();

        let _guard = self.lock.lock();

        if let Some(value) = self.lookup(key) {
            self.counters.coalesce();
            debug!(key, "Loaded by a concurrent caller");
            return Ok(value);
        }

        debug!(key, "Cache miss, loading");
        let loaded = match loader.load(key) {
            Ok(loaded) => loaded,
            Err(e) => {
                self.counters.load_failure();
                warn!(key, error = %e, "Loader failed");
                return Err(CacheError::Loader(e));
            }
        };
        self.counters.load();

        let (value, ttl) = loaded.into_parts();
        let value = Arc::new(value);
        self.store.set(key, Arc::clone(&value) as StoredValue, ttl);
        debug!(key, ?ttl, "Loaded");
        Ok(value)
    }

    /// Returns the live value for `key` without loading or locking.
    pub fn get_from_cache(&self, key: &str) -> Option<Arc<T>> {
        let value = self.lookup(key);
        match value {
            Some(_) => self.counters.hit(),
            None => self.counters.miss(),
        }
        value
    }

    /// Stores `val` under `key`, bypassing the lock and the loader. Last writer wins.
    pub fn set(&self, key: impl Into<String>, val: ExpireVal<T>) {
        let (value, ttl) = val.into_parts();
        self.store.set(key, Arc::new(value) as StoredValue, ttl);
    }

    /// Applies [`set`](Self::set) to every entry. Not atomic across entries.
    pub fn add<K, I>(&self, values: I)
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, ExpireVal<T>)>,
    {
        for (key, val) in values {
            self.set(key, val);
        }
    }

    /// Runs `f` while holding the coordination lock and returns its result.
    ///
    /// Loads through [`get`](Self::get) and [`get_with_loader`](Self::get_with_loader)
    /// wait while `f` runs. `f` must not call back into this cache's loading
    /// operations or `lock`; the lock is not reentrant.
    pub fn lock<R>(&self, f: impl FnOnce() -> R) -> R {
        let _guard = self.lock.lock();
        f()
    }

    /// Returns a snapshot of the lookup counters.
    pub fn stats(&self) -> CacheStats {
        self.counters.snapshot()
    }

    /// Returns the underlying store.
    pub fn store(&self) -> &ExpiringStore {
        &self.store
    }

    fn lookup(&self, key: &str) -> Option<Arc<T>> {
        let stored = self.store.get(key)?;
        match stored.downcast::<T>() {
            Ok(value) => Some(value),
            Err(_) => {
                self.counters.type_mismatch();
                warn!(
                    key,
                    expected = type_name::<T>(),
                    "Stored value has another type, treating as miss"
                );
                None
            }
        }
    }
}

impl<T> fmt::Debug for LocalCache<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalCache")
            .field("value_type", &type_name::<T>())
            .field("store", &self.store)
            .field("has_loader", &self.loader.is_some())
            .finish()
    }
}
