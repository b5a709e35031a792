//! Pull-adapter behavior: one producer routine, one yielder, one consumer.

mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_enumerable::{
    AsyncEnumerable, AsyncEnumerator, CancellationToken, YieldError, YielderState,
};
use tokio_test::assert_ok;

#[tokio::test]
async fn enumerates_all_yielded_values_in_order() {
    common::init_tracing();
    let mut enumerator = AsyncEnumerable::create(|yielder, _cancel| async move {
        yielder.emit("foo")?;
        yielder.emit("bar")?;
        yielder.emit("foobar")?;
        yielder.stop()
    })
    .into_enumerator();

    let token = CancellationToken::new();
    for expected in ["foo", "bar", "foobar"] {
        assert!(assert_ok!(enumerator.move_next(&token).await));
        assert_eq!(enumerator.current(), Some(&expected));
    }
    assert!(!assert_ok!(enumerator.move_next(&token).await));
    assert!(!assert_ok!(enumerator.move_next(&token).await));
}

#[tokio::test]
async fn producer_that_emits_nothing_exhausts_on_first_pull() {
    let mut enumerator = AsyncEnumerable::<String>::create(|_yielder, _cancel| async move {
        Ok(())
    })
    .into_enumerator();

    let token = CancellationToken::new();
    assert!(!assert_ok!(enumerator.move_next(&token).await));
}

#[tokio::test]
async fn producer_that_stops_without_emitting_exhausts_on_first_pull() {
    let mut enumerator = AsyncEnumerable::<String>::create(|yielder, _cancel| async move {
        yielder.stop()
    })
    .into_enumerator();

    let token = CancellationToken::new();
    assert!(!assert_ok!(enumerator.move_next(&token).await));
}

#[tokio::test]
async fn producer_that_never_stops_starves_instead_of_erroring() {
    let mut enumerator = AsyncEnumerable::create(|yielder, _cancel| async move {
        yielder.emit(1)?;
        yielder.emit(2)
    })
    .into_enumerator();

    let token = CancellationToken::new();
    assert!(assert_ok!(enumerator.move_next(&token).await));
    assert_eq!(enumerator.current(), Some(&1));
    assert!(assert_ok!(enumerator.move_next(&token).await));
    assert_eq!(enumerator.current(), Some(&2));

    assert!(!assert_ok!(enumerator.move_next(&token).await));
    assert!(!assert_ok!(enumerator.move_next(&token).await));
}

#[tokio::test]
async fn producer_is_invoked_at_most_once() {
    let invocations = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&invocations);
    let mut enumerator = AsyncEnumerable::create(move |yielder, _cancel| async move {
        counter.fetch_add(1, Ordering::SeqCst);
        yielder.emit("only")
    })
    .into_enumerator();

    let token = CancellationToken::new();
    for _ in 0..4 {
        let _ = assert_ok!(enumerator.move_next(&token).await);
    }
    assert_eq!(invocations.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn values_survive_producer_suspension_points() {
    let mut enumerator = AsyncEnumerable::create(|yielder, _cancel| async move {
        yielder.emit(1)?;
        tokio::task::yield_now().await;
        yielder.emit(2)?;
        tokio::task::yield_now().await;
        yielder.stop()
    })
    .into_enumerator();

    let token = CancellationToken::new();
    assert!(assert_ok!(enumerator.move_next(&token).await));
    assert_eq!(enumerator.current(), Some(&1));
    assert!(assert_ok!(enumerator.move_next(&token).await));
    assert_eq!(enumerator.current(), Some(&2));
    assert!(!assert_ok!(enumerator.move_next(&token).await));
}

#[tokio::test]
async fn cancellation_before_first_pull_never_starts_the_producer() {
    let invocations = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&invocations);
    let mut enumerator = AsyncEnumerable::<i32>::create(move |yielder, _cancel| async move {
        counter.fetch_add(1, Ordering::SeqCst);
        yielder.stop()
    })
    .into_enumerator();

    let token = CancellationToken::new();
    token.cancel();

    assert!(!assert_ok!(enumerator.move_next(&token).await));
    assert_eq!(invocations.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn cancellation_between_pulls_keeps_delivered_values_and_drops_the_rest() {
    let mut enumerator = common::sequence_of(&["foo", "bar"]).into_enumerator();
    let token = CancellationToken::new();

    assert!(assert_ok!(enumerator.move_next(&token).await));
    assert_eq!(enumerator.current(), Some(&"foo"));

    // "bar" is still buffered, but the cancelled token wins.
    token.cancel();
    assert!(!assert_ok!(enumerator.move_next(&token).await));
}

#[tokio::test]
async fn producer_receives_a_handle_to_the_consumers_token() {
    let mut enumerator = AsyncEnumerable::<i32>::create(|_yielder, cancel| async move {
        cancel.cancel();
        Ok(())
    })
    .into_enumerator();

    let token = CancellationToken::new();
    assert!(!assert_ok!(enumerator.move_next(&token).await));
    assert!(token.is_cancelled());
}

#[tokio::test]
async fn emit_after_stop_propagates_out_of_move_next() {
    let mut enumerator = AsyncEnumerable::create(|yielder, _cancel| async move {
        yielder.emit("foo")?;
        yielder.stop()?;
        yielder.emit("bar")
    })
    .into_enumerator();

    let token = CancellationToken::new();
    let err = enumerator.move_next(&token).await.unwrap_err();
    assert_eq!(
        err,
        YieldError::InvalidState {
            operation: "emit",
            state: YielderState::Stopping,
        }
    );
}

#[tokio::test]
async fn double_stop_propagates_out_of_move_next() {
    let mut enumerator = AsyncEnumerable::<i32>::create(|yielder, _cancel| async move {
        yielder.stop()?;
        yielder.stop()
    })
    .into_enumerator();

    let token = CancellationToken::new();
    let err = enumerator.move_next(&token).await.unwrap_err();
    assert_eq!(
        err,
        YieldError::InvalidState {
            operation: "stop",
            state: YielderState::Stopped,
        }
    );
}

#[tokio::test]
async fn current_is_none_before_the_first_successful_pull() {
    let enumerator = common::sequence_of(&[1, 2, 3]).into_enumerator();
    assert_eq!(enumerator.current(), None);
}

#[tokio::test]
async fn take_current_hands_out_the_value_once() {
    let mut enumerator = common::sequence_of(&[7]).into_enumerator();
    let token = CancellationToken::new();

    assert!(assert_ok!(enumerator.move_next(&token).await));
    assert_eq!(enumerator.take_current(), Some(7));
    assert_eq!(enumerator.take_current(), None);
}
