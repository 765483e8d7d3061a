use std::{sync::Arc, time::Instant};

use core::time::Duration;

use portable_atomic::{AtomicU64, Ordering};

/// A source of "now" for expiry bookkeeping.
///
/// [`SystemClock`] is used in production; [`ManualClock`] lets tests move time
/// forward explicitly instead of sleeping.
pub trait Clock {
    /// The current instant.
    fn now(&self) -> Instant;
}

/// Wall-clock time via [`Instant::now`].
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A clock that only advances when told to.
///
/// Clones share the same offset, so a test can keep one handle while the
/// store owns another.
///
/// ```
/// use std::time::Duration;
/// use chemreg_id::{Clock, ManualClock};
///
/// let clock = ManualClock::new();
/// let start = clock.now();
/// clock.advance(Duration::from_secs(5));
/// assert_eq!(clock.now() - start, Duration::from_secs(5));
/// ```
#[derive(Clone, Debug)]
pub struct ManualClock {
    origin: Instant,
    offset_millis: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            offset_millis: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Moves the clock forward by `by`, rounded down to whole milliseconds.
    pub fn advance(&self, by: Duration) {
        let millis = u64::try_from(by.as_millis()).unwrap_or(u64::MAX);
        self.offset_millis.fetch_add(millis, Ordering::Relaxed);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        let offset = Duration::from_millis(self.offset_millis.load(Ordering::Relaxed));
        self.origin.checked_add(offset).unwrap_or(self.origin)
    }
}

impl<C> Clock for Arc<C>
where
    C: Clock + ?Sized,
{
    fn now(&self) -> Instant {
        (**self).now()
    }
}
