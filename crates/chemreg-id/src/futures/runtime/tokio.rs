use core::{future::Future, time::Duration};

use crate::futures::SleepProvider;

/// A [`SleepProvider`] backed by Tokio's timer.
///
/// The default choice for Tokio applications.
pub struct TokioSleep;

impl SleepProvider for TokioSleep {
    fn sleep_for(dur: Duration) -> impl Future<Output = ()> + Send {
        tokio::time::sleep(dur)
    }
}

/// A [`SleepProvider`] that yields to the Tokio scheduler instead of waiting
/// on a timer.
///
/// Recovery usually finishes within a scan, so yielding can shave latency
/// off the first allocation after a counter loss. Under many concurrent
/// waiters it turns into a busy poll; prefer [`TokioSleep`] there.
pub struct TokioYield;

impl SleepProvider for TokioYield {
    fn sleep_for(_dur: Duration) -> impl Future<Output = ()> + Send {
        tokio::task::yield_now()
    }
}
