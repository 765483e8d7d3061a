#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    AllocError, AllocatorConfig, ConfigError, FormatError, IdentifierFormat, Result,
    allocator::Poll,
    store::{IdentifierSource, SequenceStore},
};

/// Value written to the recovery lock key. Only its presence matters.
const LOCK_TOKEN: u64 = 1;

/// Mints unique, checksummed identifiers for one domain.
///
/// The allocator increments a counter in a shared [`SequenceStore`]. When the
/// counter is missing (never seeded, evicted, or expired), exactly one caller
/// across all processes wins an auto-expiring recovery lock, rebuilds the last
/// issued payload from the persisted identifiers in the [`IdentifierSource`],
/// and reseeds the counter. Everyone else waits and retries.
///
/// One allocator serves one domain; build one per domain from its own
/// [`AllocatorConfig`]. Instances are `Send + Sync` whenever the store and the
/// source are, so a single instance can serve every request thread.
///
/// # Example
///
/// ```
/// use chemreg_id::{Allocator, AllocatorConfig, Domain, MemorySequenceStore};
///
/// let store = MemorySequenceStore::new();
/// let persisted = vec!["DTXCID802345678"];
/// let allocator =
///     Allocator::new(AllocatorConfig::new(Domain::Compound), &store, persisted).unwrap();
///
/// // The counter is empty, so the first call recovers from `persisted`.
/// assert_eq!(allocator.allocate_payload().unwrap(), 2_345_679);
/// assert_eq!(allocator.build_identifier(None).unwrap(), "DTXCID802345680");
/// ```
#[derive(Debug)]
pub struct Allocator<S, R> {
    config: AllocatorConfig,
    format: IdentifierFormat,
    lock_key: String,
    store: S,
    source: R,
}

impl<S, R> Allocator<S, R>
where
    S: SequenceStore,
    R: IdentifierSource,
{
    /// Creates an allocator for `config.domain`.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when `config` fails
    /// [`AllocatorConfig::validate`].
    pub fn new(config: AllocatorConfig, store: S, source: R) -> Result<Self, ConfigError> {
        config.validate()?;
        let format = IdentifierFormat::new(config.prefix.clone(), config.domain)?;
        Ok(Self {
            lock_key: config.lock_key(),
            config,
            format,
            store,
            source,
        })
    }

    pub fn config(&self) -> &AllocatorConfig {
        &self.config
    }

    /// The identifier layout this allocator produces.
    pub fn format(&self) -> &IdentifierFormat {
        &self.format
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn source(&self) -> &R {
        &self.source
    }

    /// Returns the next payload, blocking the thread between attempts while
    /// the counter is being recovered.
    ///
    /// Retries indefinitely unless [`AllocatorConfig::max_attempts`] is set.
    ///
    /// # Errors
    ///
    /// - [`AllocError::Store`] or [`AllocError::Scan`] when a backend fails.
    /// - [`AllocError::AttemptsExhausted`] when the attempt limit is reached.
    pub fn allocate_payload(&self) -> Result<u64> {
        let mut attempts = 0_u32;
        loop {
            attempts = attempts.saturating_add(1);
            match self.try_poll_payload()? {
                Poll::Ready { payload } => return Ok(payload),
                Poll::Pending { retry_in } => {
                    self.check_attempts(attempts)?;
                    std::thread::sleep(retry_in);
                }
            }
        }
    }

    /// Formats `payload`, or a freshly allocated one when `None`.
    ///
    /// An explicit payload is used verbatim for backfills and imports; the
    /// caller is responsible for its uniqueness.
    ///
    /// # Errors
    ///
    /// Only allocation can fail; see [`Self::allocate_payload`].
    pub fn build_identifier(&self, payload: Option<u64>) -> Result<String> {
        let payload = match payload {
            Some(payload) => payload,
            None => self.allocate_payload()?,
        };
        Ok(self.format.build(payload))
    }

    /// See [`IdentifierFormat::extract_payload`].
    pub fn extract_payload(&self, identifier: &str) -> Option<u64> {
        self.format.extract_payload(identifier)
    }

    /// See [`IdentifierFormat::extract_checksum`].
    pub fn extract_checksum(&self, identifier: &str) -> Option<u8> {
        self.format.extract_checksum(identifier)
    }

    /// See [`IdentifierFormat::validate_checksum`].
    ///
    /// # Errors
    ///
    /// [`FormatError::InvalidChecksum`] or
    /// [`FormatError::MalformedIdentifier`].
    pub fn validate_identifier_checksum(&self, identifier: &str) -> Result<(), FormatError> {
        self.format.validate_checksum(identifier)
    }

    /// See [`IdentifierFormat::validate_format`].
    ///
    /// # Errors
    ///
    /// [`FormatError::MalformedIdentifier`].
    pub fn validate_identifier_format(&self, identifier: &str) -> Result<(), FormatError> {
        self.format.validate_format(identifier)
    }

    /// Makes a single allocation attempt without sleeping.
    ///
    /// On a counter miss this tries the recovery lock; the winner reseeds the
    /// counter before returning. Both winner and loser get
    /// [`Poll::Pending`] and must retry.
    ///
    /// # Errors
    ///
    /// [`AllocError::Store`] or [`AllocError::Scan`] when a backend fails.
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self), fields(key = %self.config.sequence_key)))]
    pub fn try_poll_payload(&self) -> Result<Poll> {
        match self
            .store
            .increment(&self.config.sequence_key)
            .map_err(AllocError::store)?
        {
            Some(payload) => Ok(Poll::Ready { payload }),
            None => self.cold_counter_missing(),
        }
    }

    /// Highest payload among the persisted identifiers that pass both format
    /// and checksum checks, or `increment_start - 1` when there are none.
    ///
    /// Does not touch the counter store.
    ///
    /// # Errors
    ///
    /// [`AllocError::Scan`] when the identifier source fails.
    #[cfg_attr(feature = "tracing", instrument(level = "debug", skip(self), fields(domain = %self.config.domain)))]
    pub fn recover_sequence(&self) -> Result<u64> {
        let floor = self.config.increment_start - 1;
        let last = self
            .source
            .identifiers(&self.format)
            .map_err(AllocError::scan)?
            .into_iter()
            .filter_map(|id| self.format.verified_payload(&id))
            .fold(floor, u64::max);
        Ok(last)
    }

    pub(crate) fn check_attempts(&self, attempts: u32) -> Result<()> {
        match self.config.max_attempts {
            Some(max) if attempts >= max => Err(AllocError::AttemptsExhausted { attempts }),
            _ => Ok(()),
        }
    }

    #[cold]
    #[inline(never)]
    fn cold_counter_missing(&self) -> Result<Poll> {
        let acquired = self
            .store
            .set_if_absent(&self.lock_key, LOCK_TOKEN, self.config.lock_timeout)
            .map_err(AllocError::store)?;

        if acquired {
            let seeded = self.seed_counter();
            let released = self.store.delete(&self.lock_key).map_err(AllocError::store);
            seeded?;
            released?;
        } else {
            #[cfg(feature = "tracing")]
            tracing::trace!(lock = %self.lock_key, "recovery lock held elsewhere");
        }

        Ok(Poll::Pending {
            retry_in: self.config.retry_interval,
        })
    }

    /// Runs under the recovery lock.
    fn seed_counter(&self) -> Result<()> {
        let last = self.recover_sequence()?;
        let _seeded = self
            .store
            .set_if_absent(&self.config.sequence_key, last, self.config.sequence_ttl)
            .map_err(AllocError::store)?;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            key = %self.config.sequence_key,
            last,
            seeded = _seeded,
            "recovered sequence counter"
        );
        Ok(())
    }
}
