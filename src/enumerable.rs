//! Sequence construction and consumption helpers
//!
//! Thin composition over the enumerator: the factories wrap a producer
//! routine into a lazily-evaluated sequence handle, and the drivers run the
//! pull loop to completion.

use std::fmt;
use std::future::Future;

use futures::Stream;

use crate::cancel::CancellationToken;
use crate::enumerator::{AsyncEnumerator, BoxedProducer, YieldEnumerator};
use crate::yielder::{YieldResult, Yielder};

/// A lazily-evaluated asynchronous sequence.
///
/// Holds the producer routine; nothing runs until the first pull. Exactly
/// one producer invocation and one consumer are assumed per instance.
pub struct AsyncEnumerable<T> {
    producer: BoxedProducer<T>,
}

impl<T: Send + 'static> AsyncEnumerable<T> {
    /// Wrap a producer routine into a sequence.
    ///
    /// The producer receives a [`Yielder`] handle to push values through
    /// and a [`CancellationToken`] it may poll during long-running work.
    /// It is invoked at most once, on the first pull, and runs fully to
    /// completion before the first value is delivered.
    pub fn create<F, Fut>(producer: F) -> Self
    where
        F: FnOnce(Yielder<T>, CancellationToken) -> Fut + Send + 'static,
        Fut: Future<Output = YieldResult<()>> + Send + 'static,
    {
        Self {
            producer: Box::new(move |yielder, cancel| Box::pin(producer(yielder, cancel))),
        }
    }

    /// A sequence whose very first pull already reports exhaustion.
    pub fn empty() -> Self {
        Self::create(|yielder, _cancel| async move { yielder.stop() })
    }

    /// Turn the sequence handle into its pull enumerator.
    pub fn into_enumerator(self) -> YieldEnumerator<T> {
        YieldEnumerator::new(self.producer)
    }

    /// Drive the sequence to exhaustion, applying `action` to each value.
    ///
    /// The same token is propagated into every pull; once it is cancelled
    /// the loop ends without applying `action` again.
    pub async fn for_each<F>(self, cancel: CancellationToken, action: F) -> YieldResult<()>
    where
        F: FnMut(T) + Send,
    {
        for_each(self.into_enumerator(), &cancel, action).await
    }

    /// Like [`for_each`](Self::for_each), with an asynchronous action.
    pub async fn for_each_async<F, Fut>(
        self,
        cancel: CancellationToken,
        mut action: F,
    ) -> YieldResult<()>
    where
        F: FnMut(T) -> Fut + Send,
        Fut: Future<Output = ()> + Send,
    {
        let mut enumerator = self.into_enumerator();
        while let Some(value) = enumerator.next(&cancel).await? {
            action(value).await;
        }
        Ok(())
    }

    /// Adapt the sequence to a [`Stream`] of values.
    ///
    /// The stream ends when the sequence is exhausted or the token is
    /// cancelled; a producer contract violation surfaces as an `Err` item
    /// and ends the stream.
    pub fn into_stream(self, cancel: CancellationToken) -> impl Stream<Item = YieldResult<T>> {
        futures::stream::try_unfold(
            (self.into_enumerator(), cancel),
            |(mut enumerator, cancel)| async move {
                match enumerator.next(&cancel).await {
                    Ok(Some(value)) => Ok(Some((value, (enumerator, cancel)))),
                    Ok(None) => Ok(None),
                    Err(err) => Err(err),
                }
            },
        )
    }
}

impl<T> fmt::Debug for AsyncEnumerable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsyncEnumerable").finish_non_exhaustive()
    }
}

/// Run any pull source to exhaustion, applying `action` to each value.
///
/// `action` is applied once per `true`-returning pull and never after a
/// `false`-returning one.
pub async fn for_each<T, E, F>(
    mut source: E,
    cancel: &CancellationToken,
    mut action: F,
) -> YieldResult<()>
where
    T: Send,
    E: AsyncEnumerator<T>,
    F: FnMut(T) + Send,
{
    while source.move_next(cancel).await? {
        if let Some(value) = source.take_current() {
            action(value);
        }
    }
    Ok(())
}
