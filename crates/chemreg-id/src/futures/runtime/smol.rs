use core::{future::Future, time::Duration};

use smol::Timer;

use crate::futures::SleepProvider;

/// A [`SleepProvider`] backed by Smol's timer.
pub struct SmolSleep;

impl SleepProvider for SmolSleep {
    fn sleep_for(dur: Duration) -> impl Future<Output = ()> + Send {
        async move {
            Timer::after(dur).await;
        }
    }
}

/// A [`SleepProvider`] that yields to the Smol executor instead of waiting
/// on a timer.
pub struct SmolYield;

impl SleepProvider for SmolYield {
    fn sleep_for(_dur: Duration) -> impl Future<Output = ()> + Send {
        smol::future::yield_now()
    }
}
