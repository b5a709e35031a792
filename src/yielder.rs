//! Yielder state machine — the producer-facing half of the bridge
//!
//! A producer pushes values with `emit` and signals termination with `stop`;
//! the enumerator drains the buffer with `take_next`. Termination and
//! buffered-but-undelivered values are independent facts, so the lifecycle
//! needs four states rather than a done flag: collapsing `Stopping` into
//! `Stopped` would drop buffered values, collapsing it into `Running` would
//! let an emit slip in after termination.

use std::collections::VecDeque;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use thiserror::Error;

/// Error raised when a yielder operation violates the lifecycle contract.
///
/// These are programmer errors in the producer routine (emitting after
/// stop, stopping twice). They surface synchronously at the offending call
/// site and are never converted into a "no more values" signal.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum YieldError {
    #[error("cannot {operation} while the yielder is {state}")]
    InvalidState {
        /// The rejected operation
        operation: &'static str,
        /// State the yielder was in when the operation was rejected
        state: YielderState,
    },
}

/// Result type for yielder and enumerator operations
pub type YieldResult<T> = Result<T, YieldError>;

/// Lifecycle of a yielder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YielderState {
    /// Buffer empty, termination not signaled
    Idle,
    /// Buffer non-empty, termination not signaled
    Running,
    /// Termination signaled, buffered values still owed to the consumer
    Stopping,
    /// Termination signaled and buffer drained; terminal
    Stopped,
}

impl fmt::Display for YielderState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Running => write!(f, "running"),
            Self::Stopping => write!(f, "stopping"),
            Self::Stopped => write!(f, "stopped"),
        }
    }
}

struct YielderCore<T> {
    buffer: VecDeque<T>,
    state: YielderState,
}

/// Mediator through which a producer routine pushes values into a sequence.
///
/// Handles are cheap clones over shared state: the enumerator keeps one and
/// hands another to the producer. Access is never concurrent — the producer
/// runs fully to completion before the enumerator drains the buffer.
pub struct Yielder<T> {
    core: Arc<Mutex<YielderCore<T>>>,
}

impl<T> Clone for Yielder<T> {
    fn clone(&self) -> Self {
        Self {
            core: Arc::clone(&self.core),
        }
    }
}

impl<T> Yielder<T> {
    pub(crate) fn new() -> Self {
        Self {
            core: Arc::new(Mutex::new(YielderCore {
                buffer: VecDeque::new(),
                state: YielderState::Idle,
            })),
        }
    }

    /// Enqueue a value for later delivery to the consumer.
    ///
    /// Values are delivered in emission order. Fails with
    /// [`YieldError::InvalidState`] once [`stop`](Self::stop) has been
    /// called.
    pub fn emit(&self, value: T) -> YieldResult<()> {
        let mut core = self.lock();
        match core.state {
            YielderState::Stopping | YielderState::Stopped => Err(YieldError::InvalidState {
                operation: "emit",
                state: core.state,
            }),
            YielderState::Idle | YielderState::Running => {
                core.buffer.push_back(value);
                core.state = YielderState::Running;
                Ok(())
            }
        }
    }

    /// Signal that no further values will be emitted.
    ///
    /// Buffered values remain owed to the consumer and are still delivered
    /// before the sequence reports exhaustion. Calling `stop` twice is a
    /// contract violation, not a no-op; the second call fails with
    /// [`YieldError::InvalidState`].
    pub fn stop(&self) -> YieldResult<()> {
        let mut core = self.lock();
        match core.state {
            YielderState::Stopping | YielderState::Stopped => Err(YieldError::InvalidState {
                operation: "stop",
                state: core.state,
            }),
            YielderState::Idle | YielderState::Running => {
                core.state = if core.buffer.is_empty() {
                    YielderState::Stopped
                } else {
                    YielderState::Stopping
                };
                Ok(())
            }
        }
    }

    /// Current lifecycle state. Diagnostic only.
    pub fn state(&self) -> YielderState {
        self.lock().state
    }

    /// Dequeue the oldest buffered value.
    ///
    /// Enumerator-internal. Only called while the state is `Running` or
    /// `Stopping`; anything else is an enumerator bug and fails with
    /// [`YieldError::InvalidState`].
    pub(crate) fn take_next(&self) -> YieldResult<T> {
        let mut core = self.lock();
        if core.state == YielderState::Stopped {
            return Err(YieldError::InvalidState {
                operation: "dequeue",
                state: core.state,
            });
        }
        let value = core.buffer.pop_front().ok_or(YieldError::InvalidState {
            operation: "dequeue",
            state: core.state,
        })?;
        if core.buffer.is_empty() {
            core.state = match core.state {
                YielderState::Stopping => YielderState::Stopped,
                _ => YielderState::Idle,
            };
        }
        Ok(value)
    }

    // Critical sections are single state/buffer updates that cannot panic
    // midway, so a poisoned lock still holds a consistent core.
    fn lock(&self) -> MutexGuard<'_, YielderCore<T>> {
        self.core.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T> fmt::Debug for Yielder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let core = self.lock();
        f.debug_struct("Yielder")
            .field("state", &core.state)
            .field("buffered", &core.buffer.len())
            .finish()
    }
}
