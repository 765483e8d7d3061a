use thiserror::Error;

/// Boxed error from a [`SequenceStore`] or [`IdentifierSource`] backend.
///
/// [`SequenceStore`]: crate::store::SequenceStore
/// [`IdentifierSource`]: crate::store::IdentifierSource
pub type BoxError = Box<dyn core::error::Error + Send + Sync + 'static>;

/// A result type defaulting to [`AllocError`].
pub type Result<T, E = AllocError> = core::result::Result<T, E>;

/// Validation failures for externally supplied identifiers and registry
/// numbers.
///
/// These are always recoverable: the caller rejects the input.
#[derive(Clone, Debug, Error, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum FormatError {
    /// The identifier does not have the `PREFIX TAG digit 0 digits` shape of
    /// the configured domain.
    #[error("malformed identifier: {identifier:?}")]
    MalformedIdentifier {
        /// The rejected input.
        identifier: String,
    },

    /// The embedded checksum digit disagrees with the one recomputed from the
    /// payload.
    #[error("invalid checksum in {identifier:?}: expected {expected}, found {found}")]
    InvalidChecksum {
        /// The rejected input.
        identifier: String,
        /// Checksum recomputed from the payload.
        expected: u8,
        /// Checksum digit present in the identifier.
        found: u8,
    },

    /// The registry number does not have the `NNNNNNN-NN-R` shape.
    #[error("malformed registry number: {value:?}")]
    MalformedRegistryNumber {
        /// The rejected input.
        value: String,
    },

    /// The registry number check digit is wrong.
    #[error("invalid registry number check digit in {value:?}: expected {expected}, found {found}")]
    InvalidRegistryChecksum {
        /// The rejected input.
        value: String,
        /// Check digit recomputed from the leading digits.
        expected: u8,
        /// Check digit present in the input.
        found: u8,
    },
}

/// Failures while allocating a payload.
///
/// Counter misses and recovery-lock contention never show up here; they are
/// absorbed by the retry loop.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AllocError {
    /// The sequence store backend failed.
    #[error("sequence store error: {0}")]
    Store(#[source] BoxError),

    /// The persisted identifier scan failed during sequence recovery.
    #[error("identifier scan failed: {0}")]
    Scan(#[source] BoxError),

    /// A configured attempt limit was reached before the counter became
    /// available.
    #[error("counter still unavailable after {attempts} attempts")]
    AttemptsExhausted {
        /// Number of attempts made.
        attempts: u32,
    },
}

impl AllocError {
    pub(crate) fn store<E>(err: E) -> Self
    where
        E: core::error::Error + Send + Sync + 'static,
    {
        Self::Store(Box::new(err))
    }

    pub(crate) fn scan<E>(err: E) -> Self
    where
        E: core::error::Error + Send + Sync + 'static,
    {
        Self::Scan(Box::new(err))
    }
}

/// Rejected [`AllocatorConfig`](crate::AllocatorConfig) values.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    /// Prefixes must be non-empty uppercase ASCII letters or digits.
    #[error("invalid prefix {prefix:?}: expected uppercase ASCII letters or digits")]
    InvalidPrefix {
        /// The rejected prefix.
        prefix: String,
    },

    /// The first payload must be at least 1 so that `start - 1` is a valid
    /// seed.
    #[error("increment start must be at least 1")]
    InvalidIncrementStart,

    /// The counter key cannot be empty.
    #[error("sequence key must not be empty")]
    EmptySequenceKey,
}
