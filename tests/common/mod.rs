//! Shared helpers for sequence tests

use async_enumerable::AsyncEnumerable;

/// A sequence that emits each of `values` in order and then stops.
pub fn sequence_of<T>(values: &[T]) -> AsyncEnumerable<T>
where
    T: Clone + Send + 'static,
{
    let values = values.to_vec();
    AsyncEnumerable::create(move |yielder, _cancel| async move {
        for value in values {
            yielder.emit(value)?;
        }
        yielder.stop()
    })
}

/// Install a fmt subscriber so `tracing` output shows up under
/// `cargo test -- --nocapture`. Safe to call from every test.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}
