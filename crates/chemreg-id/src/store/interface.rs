use std::sync::Arc;

use core::time::Duration;

use crate::IdentifierFormat;

/// The shared, volatile counter store (typically a cache such as Redis or
/// memcached).
///
/// Every method must be atomic across all processes sharing the store. In
/// particular, [`SequenceStore::set_if_absent`] must map onto the backend's
/// native "set if not exists" primitive; a read followed by a write breaks the
/// recovery lock.
pub trait SequenceStore {
    /// Backend failure. A missing key is **not** an error.
    type Err: core::error::Error + Send + Sync + 'static;

    /// Atomically increments `key` and returns the new value, or `None` when
    /// the key does not exist (never set, evicted, or expired).
    ///
    /// # Errors
    ///
    /// Returns the backend's error when the store cannot be reached or the
    /// value cannot be incremented.
    fn increment(&self, key: &str) -> Result<Option<u64>, Self::Err>;

    /// Atomically stores `value` under `key` with the given expiry unless the
    /// key already exists. Returns whether the value was stored.
    ///
    /// # Errors
    ///
    /// Returns the backend's error when the store cannot be reached.
    fn set_if_absent(&self, key: &str, value: u64, ttl: Duration) -> Result<bool, Self::Err>;

    /// Removes `key`. Removing a missing key succeeds.
    ///
    /// # Errors
    ///
    /// Returns the backend's error when the store cannot be reached.
    fn delete(&self, key: &str) -> Result<(), Self::Err>;
}

impl<S> SequenceStore for &S
where
    S: SequenceStore + ?Sized,
{
    type Err = S::Err;

    fn increment(&self, key: &str) -> Result<Option<u64>, Self::Err> {
        (**self).increment(key)
    }

    fn set_if_absent(&self, key: &str, value: u64, ttl: Duration) -> Result<bool, Self::Err> {
        (**self).set_if_absent(key, value, ttl)
    }

    fn delete(&self, key: &str) -> Result<(), Self::Err> {
        (**self).delete(key)
    }
}

impl<S> SequenceStore for Arc<S>
where
    S: SequenceStore + ?Sized,
{
    type Err = S::Err;

    fn increment(&self, key: &str) -> Result<Option<u64>, Self::Err> {
        (**self).increment(key)
    }

    fn set_if_absent(&self, key: &str, value: u64, ttl: Duration) -> Result<bool, Self::Err> {
        (**self).set_if_absent(key, value, ttl)
    }

    fn delete(&self, key: &str) -> Result<(), Self::Err> {
        (**self).delete(key)
    }
}

/// Read-only access to the identifiers already persisted in one domain.
///
/// Only consulted during sequence recovery. Implementations may use
/// [`IdentifierFormat::pattern`] to filter rows at the source; the allocator
/// re-checks every returned identifier regardless.
pub trait IdentifierSource {
    /// Backend failure.
    type Err: core::error::Error + Send + Sync + 'static;

    /// Returns every stored identifier of the domain described by `format`.
    ///
    /// # Errors
    ///
    /// Returns the backend's error when the scan fails.
    fn identifiers(
        &self,
        format: &IdentifierFormat,
    ) -> Result<impl IntoIterator<Item = String>, Self::Err>;
}

impl<R> IdentifierSource for &R
where
    R: IdentifierSource + ?Sized,
{
    type Err = R::Err;

    fn identifiers(
        &self,
        format: &IdentifierFormat,
    ) -> Result<impl IntoIterator<Item = String>, Self::Err> {
        (**self).identifiers(format)
    }
}

impl<R> IdentifierSource for Arc<R>
where
    R: IdentifierSource + ?Sized,
{
    type Err = R::Err;

    fn identifiers(
        &self,
        format: &IdentifierFormat,
    ) -> Result<impl IntoIterator<Item = String>, Self::Err> {
        (**self).identifiers(format)
    }
}

impl<T> IdentifierSource for [T]
where
    T: AsRef<str>,
{
    type Err = core::convert::Infallible;

    fn identifiers(
        &self,
        _format: &IdentifierFormat,
    ) -> Result<impl IntoIterator<Item = String>, Self::Err> {
        Ok(self.iter().map(|id| id.as_ref().to_owned()))
    }
}

impl<T> IdentifierSource for Vec<T>
where
    T: AsRef<str>,
{
    type Err = core::convert::Infallible;

    fn identifiers(
        &self,
        format: &IdentifierFormat,
    ) -> Result<impl IntoIterator<Item = String>, Self::Err> {
        self.as_slice().identifiers(format)
    }
}
