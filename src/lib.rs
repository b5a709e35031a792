//! Async Enumerable: push-driven sequences, pull-based consumption
//!
//! Lets a producer routine written in imperative push style (`emit` values,
//! then `stop`) back a lazily-evaluated asynchronous sequence that a
//! consumer drains pull by pull.
//!
//! # Core Concepts
//!
//! - **Yielder**: mediator the producer pushes values and termination into
//! - **Enumerator**: pull adapter translating yielder state into
//!   "move next / current value"
//! - **Cancellation**: a cooperative token polled at the start of each pull
//!
//! # Example
//!
//! ```
//! use async_enumerable::{AsyncEnumerable, CancellationToken};
//!
//! futures::executor::block_on(async {
//!     let sequence = AsyncEnumerable::create(|yielder, _cancel| async move {
//!         yielder.emit("foo")?;
//!         yielder.emit("bar")?;
//!         yielder.stop()
//!     });
//!
//!     let mut values = Vec::new();
//!     sequence
//!         .for_each(CancellationToken::new(), |value| values.push(value))
//!         .await
//!         .unwrap();
//!     assert_eq!(values, ["foo", "bar"]);
//! });
//! ```

mod cancel;
mod enumerable;
mod enumerator;
mod yielder;

pub use cancel::CancellationToken;
pub use enumerable::{for_each, AsyncEnumerable};
pub use enumerator::{AsyncEnumerator, YieldEnumerator};
pub use yielder::{YieldError, YieldResult, Yielder, YielderState};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
