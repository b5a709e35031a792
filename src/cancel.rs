//! Cooperative cancellation for sequence consumption
//!
//! The consumer signals via a cancellation token. The enumerator checks the
//! token at the start of each pull. Values already delivered remain valid.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A cooperative cancellation token.
///
/// Polled, never preemptive: the enumerator checks it once per pull, before
/// any producer interaction, and the producer receives a clone to poll
/// during its own long-running work. Cancellation between pulls prevents
/// further delivery; it does not abort a producer mid-flight.
#[derive(Debug, Clone)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Check if cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    /// Signal cancellation.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::new()
    }
}
