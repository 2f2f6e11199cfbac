//! Value envelope: a value plus the expiration to apply when it is stored.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// How long a stored entry stays live.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Expiration {
    /// Use the store's default expiration.
    #[default]
    Default,
    /// Never expire.
    Never,
    /// Expire once the duration has elapsed.
    After(Duration),
}

impl Expiration {
    /// Resolves against a store default, yielding the time to live (`None` = never).
    ///
    /// A store default of `Default` is treated as `Never`.
    pub fn resolve(self, store_default: Expiration) -> Option<Duration> {
        match self {
            Expiration::Default => match store_default {
                Expiration::Default | Expiration::Never => None,
                Expiration::After(d) => Some(d),
            },
            Expiration::Never => None,
            Expiration::After(d) => Some(d),
        }
    }
}

impl From<Duration> for Expiration {
    /// A zero duration means "use the store default".
    fn from(d: Duration) -> Self {
        if d.is_zero() {
            Expiration::Default
        } else {
            Expiration::After(d)
        }
    }
}

/// A value paired with the expiration that should apply when it is stored.
///
/// Immutable once built. No validation is done on the expiration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExpireVal<T> {
    value: T,
    expiration: Expiration,
}

impl<T> ExpireVal<T> {
    /// Wraps `value` with the given ttl.
    pub fn new(value: T, ttl: impl Into<Expiration>) -> Self {
        Self {
            value,
            expiration: ttl.into(),
        }
    }

    /// Wraps `value` so that it never expires.
    pub fn never(value: T) -> Self {
        Self::new(value, Expiration::Never)
    }

    /// Wraps `value` with the store's default expiration.
    pub fn with_default(value: T) -> Self {
        Self::new(value, Expiration::Default)
    }

    /// Returns the wrapped value.
    pub fn value(&self) -> &T {
        &self.value
    }

    /// Returns the expiration to apply on store.
    pub fn expiration(&self) -> Expiration {
        self.expiration
    }

    /// Unwraps into the value, dropping the expiration.
    pub fn into_value(self) -> T {
        self.value
    }

    /// Splits into value and expiration.
    pub fn into_parts(self) -> (T, Expiration) {
        (self.value, self.expiration)
    }
}
