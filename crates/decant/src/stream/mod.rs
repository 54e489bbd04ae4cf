//! # Batch-to-Record Streaming
//!
//! A module for converting batched model output into an ordered stream of
//! per-example prediction records.
//!
//! ## Overview
//!
//! A forward pass produces fixed-shape batches of named fields; consumers
//! want one prediction at a time. [`stream_predictions`] bridges the two:
//! it drives an [`ExecutionSource`](crate::ExecutionSource) from a
//! background worker, slices every arriving batch into records, and hands
//! them to the consumer through a [`RecordStream`].
//!
//! ## Key Components
//!
//! * [`stream_predictions`] - Spawns the worker and returns the record stream
//! * [`RecordStream`] - A `futures::Stream` of records, finite and not restartable
//! * [`WorkerHandle`] - Scoped start/stop handle for background tasks;
//!   execution sources reuse it for their feeding mechanisms
//!
//! ## Guarantees
//!
//! - Per-batch example order and inter-batch arrival order are preserved
//! - Exhaustion of the source ends the stream without error
//! - A source fault is surfaced as one terminal `Err` item
//! - The source's feeding mechanism is started before the first poll and
//!   stopped on every exit path, including consumer cancellation

mod pill;
mod record_stream;
mod streamer;
mod worker;

pub use record_stream::RecordStream;
pub use streamer::stream_predictions;
pub use worker::WorkerHandle;
