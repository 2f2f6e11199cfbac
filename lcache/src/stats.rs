//! Lookup counters.

use std::sync::atomic::{AtomicU64, Ordering};

/// Snapshot of a cache's counters.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups answered by the unlocked fast path.
    pub hits: u64,
    /// Lookups that missed on the fast path.
    pub misses: u64,
    /// Misses answered by the re-check under the lock.
    pub coalesced: u64,
    /// Successful loader invocations.
    pub loads: u64,
    /// Failed loader invocations.
    pub load_failures: u64,
    /// Stored values that failed to downcast and were treated as absent.
    pub type_mismatches: u64,
}

impl CacheStats {
    /// Fraction of lookups served without a loader call.
    pub fn hit_ratio(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            return 0.0;
        }
        (self.hits + self.coalesced) as f64 / total as f64
    }
}

#[derive(Debug, Default)]
pub(crate) struct Counters {
    pub(crate) hits: AtomicU64,
    pub(crate) misses: AtomicU64,
    pub(crate) coalesced: AtomicU64,
    pub(crate) loads: AtomicU64,
    pub(crate) load_failures: AtomicU64,
    pub(crate) type_mismatches: AtomicU64,
}

impl Counters {
    pub(crate) fn hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn coalesce(&self) {
        self.coalesced.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn load(&self) {
        self.loads.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn load_failure(&self) {
        self.load_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn type_mismatch(&self) {
        self.type_mismatches.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            coalesced: self.coalesced.load(Ordering::Relaxed),
            loads: self.loads.load(Ordering::Relaxed),
            load_failures: self.load_failures.load(Ordering::Relaxed),
            type_mismatches: self.type_mismatches.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_ratio_empty() {
        assert_eq!(CacheStats::default().hit_ratio(), 0.0);
    }

    #[test]
    fn test_hit_ratio_counts_coalesced() {
        let stats = CacheStats {
            hits: 2,
            misses: 2,
            coalesced: 1,
            loads: 1,
            ..Default::default()
        };
        assert!((stats.hit_ratio() - 0.75).abs() < f64::EPSILON);
    }

    #[test]
    fn test_snapshot() {
        let counters = Counters::default();
        counters.hit();
        counters.hit();
        counters.load();
        let stats = counters.snapshot();
        assert_eq!(stats.hits, 2);
        assert_eq!(stats.loads, 1);
        assert_eq!(stats.misses, 0);
    }
}
