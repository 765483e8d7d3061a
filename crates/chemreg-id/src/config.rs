use core::time::Duration;

use crate::{Domain, error::ConfigError, format::is_valid_prefix};

/// Prefix used when none is configured.
pub const DEFAULT_PREFIX: &str = "DTX";

/// First payload issued in an empty domain.
pub const DEFAULT_INCREMENT_START: u64 = 2_000_000;

/// Expiry of the recovery lock. Bounds how long other callers spin if the
/// lock holder dies mid-recovery.
pub const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_secs(5);

/// Expiry given to a freshly seeded counter.
pub const DEFAULT_SEQUENCE_TTL: Duration = Duration::from_secs(365 * 24 * 60 * 60);

/// Pause between allocation attempts while the counter is missing.
pub const DEFAULT_RETRY_INTERVAL: Duration = Duration::from_millis(10);

/// Immutable settings for one [`Allocator`](crate::Allocator).
///
/// Build one per domain with [`AllocatorConfig::new`] and the `with_*`
/// methods; every field has a default except the domain.
///
/// ```
/// use chemreg_id::{AllocatorConfig, Domain};
///
/// let config = AllocatorConfig::new(Domain::Substance)
///     .with_prefix("ABC")
///     .with_increment_start(10);
///
/// assert_eq!(config.sequence_key, "substance_seq");
/// assert_eq!(config.lock_key(), "substance_seq.lock");
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AllocatorConfig {
    /// Which sequence and tag this allocator serves.
    pub domain: Domain,
    /// Uppercase code written before the tag.
    #[cfg_attr(feature = "serde", serde(default = "default_prefix"))]
    pub prefix: String,
    /// First payload issued when no valid identifier has been persisted.
    #[cfg_attr(feature = "serde", serde(default = "default_increment_start"))]
    pub increment_start: u64,
    /// Counter key in the shared store.
    #[cfg_attr(feature = "serde", serde(default))]
    pub sequence_key: String,
    /// Expiry of the recovery lock.
    #[cfg_attr(feature = "serde", serde(default = "default_lock_timeout"))]
    pub lock_timeout: Duration,
    /// Expiry of a freshly seeded counter.
    #[cfg_attr(feature = "serde", serde(default = "default_sequence_ttl"))]
    pub sequence_ttl: Duration,
    /// Pause between attempts while the counter is missing.
    #[cfg_attr(feature = "serde", serde(default = "default_retry_interval"))]
    pub retry_interval: Duration,
    /// Stop retrying after this many attempts. `None` retries forever, which
    /// is the production setting; a bound is only meant for tests.
    #[cfg_attr(feature = "serde", serde(default))]
    pub max_attempts: Option<u32>,
}

impl AllocatorConfig {
    /// Default settings for `domain`.
    pub fn new(domain: Domain) -> Self {
        Self {
            domain,
            prefix: DEFAULT_PREFIX.to_string(),
            increment_start: DEFAULT_INCREMENT_START,
            sequence_key: domain.default_sequence_key().to_string(),
            lock_timeout: DEFAULT_LOCK_TIMEOUT,
            sequence_ttl: DEFAULT_SEQUENCE_TTL,
            retry_interval: DEFAULT_RETRY_INTERVAL,
            max_attempts: None,
        }
    }

    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    #[must_use]
    pub fn with_increment_start(mut self, start: u64) -> Self {
        self.increment_start = start;
        self
    }

    #[must_use]
    pub fn with_sequence_key(mut self, key: impl Into<String>) -> Self {
        self.sequence_key = key.into();
        self
    }

    #[must_use]
    pub fn with_lock_timeout(mut self, timeout: Duration) -> Self {
        self.lock_timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_sequence_ttl(mut self, ttl: Duration) -> Self {
        self.sequence_ttl = ttl;
        self
    }

    #[must_use]
    pub fn with_retry_interval(mut self, interval: Duration) -> Self {
        self.retry_interval = interval;
        self
    }

    #[must_use]
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = Some(attempts);
        self
    }

    /// Key of the advisory lock guarding sequence recovery.
    pub fn lock_key(&self) -> String {
        let mut key = String::with_capacity(self.sequence_key.len() + 5);
        key.push_str(&self.sequence_key);
        key.push_str(".lock");
        key
    }

    /// Checks the invariants the allocator relies on.
    ///
    /// An empty `sequence_key` (as produced by deserializing a config that
    /// omits it) is rejected; use [`Self::normalized`] to fill it in first.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !is_valid_prefix(&self.prefix) {
            return Err(ConfigError::InvalidPrefix {
                prefix: self.prefix.clone(),
            });
        }
        if self.increment_start == 0 {
            return Err(ConfigError::InvalidIncrementStart);
        }
        if self.sequence_key.is_empty() {
            return Err(ConfigError::EmptySequenceKey);
        }
        Ok(())
    }

    /// Fills an empty `sequence_key` with the domain default.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        if self.sequence_key.is_empty() {
            self.sequence_key = self.domain.default_sequence_key().to_string();
        }
        self
    }
}

#[cfg(feature = "serde")]
fn default_prefix() -> String {
    DEFAULT_PREFIX.to_string()
}

#[cfg(feature = "serde")]
const fn default_increment_start() -> u64 {
    DEFAULT_INCREMENT_START
}

#[cfg(feature = "serde")]
const fn default_lock_timeout() -> Duration {
    DEFAULT_LOCK_TIMEOUT
}

#[cfg(feature = "serde")]
const fn default_sequence_ttl() -> Duration {
    DEFAULT_SEQUENCE_TTL
}

#[cfg(feature = "serde")]
const fn default_retry_interval() -> Duration {
    DEFAULT_RETRY_INTERVAL
}
