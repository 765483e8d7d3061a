use std::{collections::HashMap, time::Instant};

use core::time::Duration;

use parking_lot::{Mutex, RwLock};
use thiserror::Error;
#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    IdentifierFormat,
    store::{Clock, IdentifierSource, SequenceStore, SystemClock},
};

/// Failures of [`MemorySequenceStore`].
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum MemoryStoreError {
    /// Incrementing would exceed `u64::MAX`.
    #[error("counter {key:?} overflowed")]
    Overflow {
        /// The counter key.
        key: String,
    },
}

#[derive(Clone, Copy, Debug)]
struct Entry {
    value: u64,
    /// `None` never expires.
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.is_none_or(|at| now < at)
    }
}

/// An in-process [`SequenceStore`] with per-key expiry.
///
/// All operations run under a single mutex, which makes `increment` and
/// `set_if_absent` atomic for every thread sharing the store. It does not
/// coordinate separate processes; use a shared cache backend for that.
///
/// Expired entries behave exactly like missing ones and are dropped lazily.
///
/// ```
/// use std::time::Duration;
/// use chemreg_id::{MemorySequenceStore, SequenceStore};
///
/// let store = MemorySequenceStore::new();
/// assert_eq!(store.increment("seq").unwrap(), None);
/// assert!(store.set_if_absent("seq", 41, Duration::from_secs(60)).unwrap());
/// assert!(!store.set_if_absent("seq", 0, Duration::from_secs(60)).unwrap());
/// assert_eq!(store.increment("seq").unwrap(), Some(42));
/// ```
#[derive(Debug, Default)]
pub struct MemorySequenceStore<C = SystemClock>
where
    C: Clock,
{
    entries: Mutex<HashMap<String, Entry>>,
    clock: C,
}

impl MemorySequenceStore<SystemClock> {
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl<C> MemorySequenceStore<C>
where
    C: Clock,
{
    /// Creates an empty store that reads time from `clock`.
    pub fn with_clock(clock: C) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            clock,
        }
    }

    /// Current value of `key`, if live. Does not modify the store.
    pub fn get(&self, key: &str) -> Option<u64> {
        let now = self.clock.now();
        self.entries
            .lock()
            .get(key)
            .filter(|entry| entry.is_live(now))
            .map(|entry| entry.value)
    }

    /// Whether `key` holds a live value.
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Drops every key.
    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}

impl<C> SequenceStore for MemorySequenceStore<C>
where
    C: Clock,
{
    type Err = MemoryStoreError;

    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    fn increment(&self, key: &str) -> Result<Option<u64>, Self::Err> {
        let now = self.clock.now();
        let mut entries = self.entries.lock();
        let Some(entry) = entries.get_mut(key) else {
            return Ok(None);
        };
        if !entry.is_live(now) {
            entries.remove(key);
            return Ok(None);
        }
        entry.value = entry
            .value
            .checked_add(1)
            .ok_or_else(|| MemoryStoreError::Overflow {
                key: key.to_owned(),
            })?;
        Ok(Some(entry.value))
    }

    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    fn set_if_absent(&self, key: &str, value: u64, ttl: Duration) -> Result<bool, Self::Err> {
        let now = self.clock.now();
        let mut entries = self.entries.lock();
        if entries.get(key).is_some_and(|entry| entry.is_live(now)) {
            return Ok(false);
        }
        entries.insert(
            key.to_owned(),
            Entry {
                value,
                expires_at: now.checked_add(ttl),
            },
        );
        Ok(true)
    }

    fn delete(&self, key: &str) -> Result<(), Self::Err> {
        self.entries.lock().remove(key);
        Ok(())
    }
}

/// An in-process, appendable [`IdentifierSource`].
///
/// Stands in for the persisted entity table in tests and tooling.
#[derive(Debug, Default)]
pub struct MemoryIdentifierSource {
    identifiers: RwLock<Vec<String>>,
}

impl MemoryIdentifierSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a newly persisted identifier.
    pub fn push(&self, identifier: impl Into<String>) {
        self.identifiers.write().push(identifier.into());
    }

    pub fn len(&self) -> usize {
        self.identifiers.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.identifiers.read().is_empty()
    }
}

impl<S> FromIterator<S> for MemoryIdentifierSource
where
    S: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            identifiers: RwLock::new(iter.into_iter().map(Into::into).collect()),
        }
    }
}

impl IdentifierSource for MemoryIdentifierSource {
    type Err = core::convert::Infallible;

    fn identifiers(
        &self,
        _format: &IdentifierFormat,
    ) -> Result<impl IntoIterator<Item = String>, Self::Err> {
        Ok(self.identifiers.read().clone())
    }
}
