use core::future::Future;

use super::SleepProvider;
use crate::{
    Allocator, Result,
    allocator::Poll,
    store::{IdentifierSource, SequenceStore},
};

/// Extension trait for allocating payloads without blocking the executor.
///
/// Each attempt is still a synchronous store call; only the wait between
/// attempts is asynchronous, using the [`SleepProvider`] chosen at the call
/// site.
pub trait AllocatorAsyncExt {
    /// Returns a future that resolves to the next payload.
    ///
    /// The async counterpart of [`Allocator::allocate_payload`], with the
    /// same retry and attempt-limit behaviour.
    ///
    /// # Errors
    ///
    /// This future may return an error if the store or identifier source
    /// fails, or if the configured attempt limit is reached.
    fn allocate_payload_async<P>(&self) -> impl Future<Output = Result<u64>> + Send
    where
        P: SleepProvider;

    /// Returns a future that resolves to a formatted identifier.
    ///
    /// The async counterpart of [`Allocator::build_identifier`].
    ///
    /// # Errors
    ///
    /// See [`Self::allocate_payload_async`].
    fn build_identifier_async<P>(
        &self,
        payload: Option<u64>,
    ) -> impl Future<Output = Result<String>> + Send
    where
        P: SleepProvider;
}

impl<S, R> AllocatorAsyncExt for Allocator<S, R>
where
    S: SequenceStore + Sync,
    R: IdentifierSource + Sync,
{
    fn allocate_payload_async<P>(&self) -> impl Future<Output = Result<u64>> + Send
    where
        P: SleepProvider,
    {
        async move {
            let mut attempts = 0_u32;
            loop {
                attempts = attempts.saturating_add(1);
                let retry_in = match self.try_poll_payload()? {
                    Poll::Ready { payload } => return Ok(payload),
                    Poll::Pending { retry_in } => retry_in,
                };
                self.check_attempts(attempts)?;
                P::sleep_for(retry_in).await;
            }
        }
    }

    fn build_identifier_async<P>(
        &self,
        payload: Option<u64>,
    ) -> impl Future<Output = Result<String>> + Send
    where
        P: SleepProvider,
    {
        async move {
            let payload = match payload {
                Some(payload) => payload,
                None => self.allocate_payload_async::<P>().await?,
            };
            Ok(self.format().build(payload))
        }
    }
}
