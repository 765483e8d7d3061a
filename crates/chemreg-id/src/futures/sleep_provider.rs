use core::{future::Future, time::Duration};

/// Abstracts over how an async allocation loop waits between attempts.
///
/// This keeps [`AllocatorAsyncExt`] generic over runtimes like Tokio or
/// Smol.
///
/// [`AllocatorAsyncExt`]: crate::AllocatorAsyncExt
pub trait SleepProvider {
    /// Returns a future that completes after roughly `dur`.
    ///
    /// The future must be `Send` so allocation can run on multi-threaded
    /// executors.
    fn sleep_for(dur: Duration) -> impl Future<Output = ()> + Send;
}
