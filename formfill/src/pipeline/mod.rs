//! Async bulk-generation pipeline primitives.
//!
//! This module implements the streaming engine that drives bulk document
//! generation: lazy sequences ([`ItemStream`]) transformed by composable
//! stages ([`Stage`]), each with its own concurrency limit, while output
//! order always equals input order.
//!
//! # Architecture
//!
//! ```text
//! Candidate Source → Generate Stage → Filter → Write Stage → Sink
//!                    (limit = N)               (limit = M)
//! ```
//!
//! # Ordering
//!
//! [`map_concurrent`] overlaps transform execution but never reorders
//! results: each input item is assigned an increasing id at pull time, and
//! completed results are buffered until every lower-numbered result has
//! been emitted.
//!
//! # Error Model
//!
//! Stream items are `Result<T, E>`. An `Err` item is terminal: the stage
//! that produced it stops pulling input, and downstream stages and sinks
//! forward the error and stop as well. Per-item tolerance (skip instead of
//! abort) is a property of the supplied transform, which maps a failure to
//! the `None` skip marker rather than returning `Err` - the stage mechanism
//! itself has no retry or skip policy.
//!
//! # Key Components
//!
//! - [`map_concurrent`] - concurrency-limited, order-preserving transform
//! - [`filter_present`] - drops skip markers between stages
//! - [`Pipeline`] - structural composition of stages
//! - [`drain`] / [`collect`] - sinks that consume a sequence to completion
//! - [`source_from`] - wraps an in-memory sequence as an [`ItemStream`]

mod compose;
mod sink;
mod stage;

pub use compose::Pipeline;
pub use sink::{collect, drain, source_from};
pub use stage::{filter_present, map_concurrent, ItemStream, Stage};
