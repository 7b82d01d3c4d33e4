//! Concurrency-limited, order-preserving stages.
//!
//! [`map_concurrent`] is the core primitive of the pipeline: it wraps a
//! one-in/one-out async transform with a maximum in-flight task count and
//! guarantees that the output sequence preserves input order regardless of
//! completion order.

use std::collections::HashMap;
use std::future::Future;
use std::num::NonZeroUsize;

use async_stream::stream;
use futures::stream::{BoxStream, FuturesUnordered};
use futures::StreamExt;
use tokio::task::JoinHandle;

/// A lazy, ordered sequence of items.
///
/// An `Err` item is terminal by convention: stages stop pulling once they
/// have observed (or produced) one, and sinks propagate it as the failure
/// of the whole sequence.
pub type ItemStream<T, E> = BoxStream<'static, Result<T, E>>;

/// One pipeline stage: a transform from one lazy sequence to another.
///
/// Stages are plain functions over streams, so composing them (see
/// [`Pipeline`](super::Pipeline)) adds no buffering or error handling of
/// its own.
pub type Stage<In, Out, E> = Box<dyn FnOnce(ItemStream<In, E>) -> ItemStream<Out, E> + Send>;

/// Creates a concurrency-limited, order-preserving map stage.
///
/// Input is consumed strictly in order; each item is assigned the next
/// increasing id (0, 1, 2, ...) at the moment it is pulled. A transform is
/// launched immediately while fewer than `limit` invocations are unsettled;
/// otherwise the stage stops pulling input until one settles. Results that
/// complete out of order are buffered and emitted only once every
/// lower-numbered result has been emitted.
///
/// Transforms run as spawned tasks, so in-flight work keeps progressing
/// while the stage is suspended waiting for its upstream. If the consumer
/// stops pulling (or drops the stream), no further transforms are launched;
/// tasks already in flight run to completion and their results are
/// discarded.
///
/// # Errors
///
/// A transform returning `Err` terminates the output sequence with that
/// error: no further input is pulled and no further output is emitted.
/// Transforms that want failures tolerated must catch them internally and
/// return a skip marker instead (see [`filter_present`]).
///
/// # Panics
///
/// A panic inside a transform is resumed on the consumer of the output
/// sequence. Panics are not part of the error policy.
pub fn map_concurrent<In, Out, E, F, Fut>(limit: NonZeroUsize, transform: F) -> Stage<In, Out, E>
where
    In: Send + 'static,
    Out: Send + 'static,
    E: Send + 'static,
    F: FnMut(In, u64) -> Fut + Send + 'static,
    Fut: Future<Output = Result<Out, E>> + Send + 'static,
{
    Box::new(move |input| Box::pin(ordered_concurrent(input, limit.get(), transform)))
}

fn ordered_concurrent<In, Out, E, F, Fut>(
    mut input: ItemStream<In, E>,
    limit: usize,
    mut transform: F,
) -> impl futures::Stream<Item = Result<Out, E>> + Send
where
    In: Send + 'static,
    Out: Send + 'static,
    E: Send + 'static,
    F: FnMut(In, u64) -> Fut + Send + 'static,
    Fut: Future<Output = Result<Out, E>> + Send + 'static,
{
    stream! {
        let mut in_flight: FuturesUnordered<JoinHandle<(u64, Result<Out, E>)>> =
            FuturesUnordered::new();
        // Completed but not yet emitted, keyed by id. Every key is >= next_to_emit.
        let mut ready: HashMap<u64, Out> = HashMap::new();
        let mut next_id: u64 = 0;
        let mut next_to_emit: u64 = 0;

        while let Some(item) = input.next().await {
            let value = match item {
                Ok(value) => value,
                Err(err) => {
                    yield Err(err);
                    return;
                }
            };

            let id = next_id;
            next_id += 1;
            let fut = transform(value, id);
            in_flight.push(tokio::spawn(async move { (id, fut.await) }));

            // At capacity: wait for one settlement before pulling more
            // input, then emit whatever became contiguous.
            if in_flight.len() >= limit {
                let (id, result) = next_settlement(&mut in_flight).await;
                match result {
                    Ok(out) => {
                        ready.insert(id, out);
                    }
                    Err(err) => {
                        yield Err(err);
                        return;
                    }
                }
                while let Some(out) = ready.remove(&next_to_emit) {
                    next_to_emit += 1;
                    yield Ok(out);
                }
            }
        }

        // Input exhausted: drain the remaining settlements in id order.
        while !in_flight.is_empty() {
            let (id, result) = next_settlement(&mut in_flight).await;
            match result {
                Ok(out) => {
                    ready.insert(id, out);
                }
                Err(err) => {
                    yield Err(err);
                    return;
                }
            }
            while let Some(out) = ready.remove(&next_to_emit) {
                next_to_emit += 1;
                yield Ok(out);
            }
        }
    }
}

/// Waits for the next task to settle and unwraps the join result.
///
/// Must only be called while at least one task is in flight.
async fn next_settlement<Out, E>(
    in_flight: &mut FuturesUnordered<JoinHandle<(u64, Result<Out, E>)>>,
) -> (u64, Result<Out, E>) {
    let joined = in_flight
        .next()
        .await
        .expect("next_settlement called with no tasks in flight");
    match joined {
        Ok(settled) => settled,
        Err(err) => match err.try_into_panic() {
            Ok(payload) => std::panic::resume_unwind(payload),
            // Tasks are never aborted, only detached on drop.
            Err(err) => unreachable!("transform task cancelled: {err}"),
        },
    }
}

/// Creates a pass-through stage that drops skip markers.
///
/// Every `Ok(Some(value))` is forwarded as `Ok(value)` in its original
/// relative order, `Ok(None)` is dropped, and an `Err` terminates the
/// output as usual. The stage imposes no concurrency or buffering beyond
/// one item at a time.
pub fn filter_present<T, E>() -> Stage<Option<T>, T, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    Box::new(|mut input| {
        Box::pin(stream! {
            while let Some(item) = input.next().await {
                match item {
                    Ok(Some(value)) => yield Ok(value),
                    Ok(None) => {}
                    Err(err) => {
                        yield Err(err);
                        return;
                    }
                }
            }
        })
    })
}
