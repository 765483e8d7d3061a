use core::time::Duration;

/// Outcome of a single allocation attempt.
///
/// Returned by [`Allocator::try_poll_payload`]:
///
/// - [`Poll::Ready`] carries a freshly incremented payload.
/// - [`Poll::Pending`] means the counter was missing. This attempt either
///   reseeded it or lost the recovery lock to another caller; either way the
///   caller should wait `retry_in` and try again.
///
/// [`Allocator::try_poll_payload`]: crate::Allocator::try_poll_payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Poll {
    /// A unique payload was allocated.
    Ready {
        /// The allocated payload.
        payload: u64,
    },
    /// The counter was unavailable on this attempt.
    Pending {
        /// How long to wait before the next attempt.
        retry_in: Duration,
    },
}
