//! Pull adapter — drives one producer routine and drains its yielder
//!
//! Bridges the push half (producer emitting into a yielder) to the pull
//! half (a consumer asking for the next value). The producer runs fully to
//! completion on the first pull, buffering everything it pushes; every pull
//! after that only drains the buffer. No emit is ever concurrent with a
//! dequeue.

use std::fmt;

use async_trait::async_trait;
use futures::future::BoxFuture;
use tracing::trace;

use crate::cancel::CancellationToken;
use crate::yielder::{YieldResult, Yielder, YielderState};

/// A producer routine, boxed for storage inside the enumerator.
pub(crate) type BoxedProducer<T> =
    Box<dyn FnOnce(Yielder<T>, CancellationToken) -> BoxFuture<'static, YieldResult<()>> + Send>;

/// The pull half of a sequence: "move to the next element, then read it".
///
/// `move_next` returning `true` means a new value is available through
/// [`current`](Self::current) until the next pull; `false` means the
/// sequence is exhausted and every later pull also returns `false`.
#[async_trait]
pub trait AsyncEnumerator<T: Send>: Send {
    /// Advance to the next element.
    ///
    /// The cancellation token is checked first: a cancelled token ends the
    /// sequence without starting or resuming the producer. A contract
    /// violation inside the producer propagates out of this call unchanged.
    async fn move_next(&mut self, cancel: &CancellationToken) -> YieldResult<bool>;

    /// The element made available by the last `true`-returning pull.
    ///
    /// `None` before the first successful pull; not meaningful after a
    /// `false`-returning pull.
    fn current(&self) -> Option<&T>;

    /// Take ownership of the element made available by the last
    /// `true`-returning pull.
    fn take_current(&mut self) -> Option<T>;
}

/// Pull adapter over one producer routine and one yielder.
///
/// Built through [`AsyncEnumerable`](crate::AsyncEnumerable); at most one
/// live enumerator drives one yielder.
pub struct YieldEnumerator<T> {
    /// Taken on the first pull; `None` doubles as "producer already invoked".
    producer: Option<BoxedProducer<T>>,
    yielder: Yielder<T>,
    current: Option<T>,
}

impl<T> YieldEnumerator<T> {
    pub(crate) fn new(producer: BoxedProducer<T>) -> Self {
        Self {
            producer: Some(producer),
            yielder: Yielder::new(),
            current: None,
        }
    }
}

impl<T: Send> YieldEnumerator<T> {
    /// Advance and take in one step.
    ///
    /// Convenience over [`move_next`](AsyncEnumerator::move_next) plus
    /// [`take_current`](AsyncEnumerator::take_current) for consumers that
    /// want owned values, such as stream adapters.
    pub async fn next(&mut self, cancel: &CancellationToken) -> YieldResult<Option<T>> {
        if self.move_next(cancel).await? {
            Ok(self.current.take())
        } else {
            Ok(None)
        }
    }
}

#[async_trait]
impl<T: Send> AsyncEnumerator<T> for YieldEnumerator<T> {
    async fn move_next(&mut self, cancel: &CancellationToken) -> YieldResult<bool> {
        if cancel.is_cancelled() {
            trace!(target: "async_enumerable", "cancellation requested, ending pull loop");
            return Ok(false);
        }

        if let Some(producer) = self.producer.take() {
            trace!(target: "async_enumerable", "running producer to completion");
            producer(self.yielder.clone(), cancel.clone()).await?;
        }

        let state = self.yielder.state();
        match state {
            YielderState::Idle | YielderState::Stopped => {
                trace!(target: "async_enumerable", %state, "sequence exhausted");
                Ok(false)
            }
            YielderState::Running | YielderState::Stopping => {
                self.current = Some(self.yielder.take_next()?);
                Ok(true)
            }
        }
    }

    fn current(&self) -> Option<&T> {
        self.current.as_ref()
    }

    fn take_current(&mut self) -> Option<T> {
        self.current.take()
    }
}

impl<T> fmt::Debug for YieldEnumerator<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("YieldEnumerator")
            .field("producer_invoked", &self.producer.is_none())
            .field("yielder", &self.yielder)
            .finish()
    }
}
