//! Type-erased key-value store with per-entry expiration.

use std::any::Any;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tracing::{debug, trace};

use lcache_core::{CacheConfig, Expiration};

/// Value representation held by the store. Typed views downcast it back.
pub type StoredValue = Arc<dyn Any + Send + Sync>;

/// Stored entry together with the ttl it was set with.
#[derive(Clone)]
struct Entry {
    object: StoredValue,
    ttl: Expiration,
}

/// A [`moka::Expiry`] resolving each entry's [`Expiration`] against the store default.
struct EntryExpiry {
    default_expiration: Expiration,
}

impl moka::Expiry<String, Entry> for EntryExpiry {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &Entry,
        _created_at: Instant,
    ) -> Option<Duration> {
        value.ttl.resolve(self.default_expiration)
    }

    // an overwrite restarts the clock with the new entry's ttl
    fn expire_after_update(
        &self,
        _key: &String,
        value: &Entry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        value.ttl.resolve(self.default_expiration)
    }
}

/// Runs moka's pending maintenance at most once per interval.
struct Housekeeping {
    interval: Duration,
    last_run: Mutex<Instant>,
}

impl Housekeeping {
    fn due(&self) -> bool {
        let Some(mut last_run) = self.last_run.try_lock() else {
            return false;
        };
        if last_run.elapsed() < self.interval {
            return false;
        }
        *last_run = Instant::now();
        true
    }
}

/// Expiring key-value store.
///
/// Cloning yields another handle to the same entries. Safe for concurrent
/// reads and writes. With a cleanup interval, expired entries are reclaimed
/// from the operation that first notices the interval has passed.
#[derive(Clone)]
pub struct ExpiringStore {
    cache: moka::sync::Cache<String, Entry>,
    default_expiration: Expiration,
    housekeeping: Option<Arc<Housekeeping>>,
}

impl ExpiringStore {
    /// Creates a store.
    ///
    /// `default_expiration` applies to entries set with [`Expiration::Default`];
    /// passing `Default` here means such entries never expire. A
    /// `cleanup_interval` of `None` or zero leaves reclamation to moka.
    pub fn new(default_expiration: Expiration, cleanup_interval: Option<Duration>) -> Self {
        let default_expiration = match default_expiration {
            Expiration::Default => Expiration::Never,
            other => other,
        };
        let cache = moka::sync::Cache::builder()
            .expire_after(EntryExpiry { default_expiration })
            .build();
        let housekeeping = cleanup_interval
            .filter(|interval| !interval.is_zero())
            .map(|interval| {
                Arc::new(Housekeeping {
                    interval,
                    last_run: Mutex::new(Instant::now()),
                })
            });

        Self {
            cache,
            default_expiration,
            housekeeping,
        }
    }

    /// Creates a store from a [`CacheConfig`].
    pub fn from_config(config: &CacheConfig) -> Self {
        Self::new(config.default_expiration(), config.cleanup_interval())
    }

    /// Returns the live value for `key`, if any.
    pub fn get(&self, key: &str) -> Option<StoredValue> {
        self.maybe_housekeep();
        self.cache.get(key).map(|entry| entry.object)
    }

    /// Stores `value` under `key`, replacing any previous entry.
    pub fn set(&self, key: impl Into<String>, value: StoredValue, ttl: Expiration) {
        self.cache.insert(key.into(), Entry { object: value, ttl });
        self.maybe_housekeep();
    }

    /// Removes an entry. Returns true if a live one was present.
    pub fn delete(&self, key: &str) -> bool {
        self.cache.remove(key).is_some()
    }

    /// Reclaims expired entries now instead of waiting for housekeeping.
    pub fn delete_expired(&self) {
        self.cache.run_pending_tasks();
    }

    /// Number of live entries.
    pub fn item_count(&self) -> usize {
        self.cache.iter().count()
    }

    /// Returns true if the store holds no live entries.
    pub fn is_empty(&self) -> bool {
        self.cache.iter().next().is_none()
    }

    /// Removes every entry.
    pub fn flush(&self) {
        debug!(entries = self.cache.entry_count(), "Flushing store");
        self.cache.invalidate_all();
        self.cache.run_pending_tasks();
    }

    /// Expiration applied to entries set with [`Expiration::Default`].
    pub fn default_expiration(&self) -> Expiration {
        self.default_expiration
    }

    /// Returns store statistics.
    pub fn stats(&self) -> StoreStats {
        StoreStats {
            live_entries: self.item_count(),
            tracked_entries: self.cache.entry_count(),
        }
    }

    fn maybe_housekeep(&self) {
        if let Some(housekeeping) = &self.housekeeping {
            if housekeeping.due() {
                self.cache.run_pending_tasks();
                trace!(entries = self.cache.entry_count(), "Housekeeping pass");
            }
        }
    }
}

impl fmt::Debug for ExpiringStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExpiringStore")
            .field("entries", &self.cache.entry_count())
            .field("default_expiration", &self.default_expiration)
            .field(
                "cleanup_interval",
                &self.housekeeping.as_ref().map(|h| h.interval),
            )
            .finish()
    }
}

/// Store statistics.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoreStats {
    /// Entries that have not expired.
    pub live_entries: usize,
    /// Entries moka still tracks, including expired ones awaiting housekeeping.
    /// Lags recent writes until maintenance runs.
    pub tracked_entries: u64,
}
