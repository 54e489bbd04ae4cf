//! # Decant
//!
//! Streaming post-processing for batched sequence model predictions:
//! **decant** batch-shaped model output into per-example records, and
//! repair unknown-token placeholders along the way.
//!
//! ## Overview
//!
//! Trained sequence models execute in batches for throughput, but their
//! consumers - decoders, evaluation scripts, serving front-ends - want one
//! prediction at a time. This library provides the bridge between the two,
//! plus the standard repair step for closed-vocabulary output.
//!
//! Key components include:
//!
//! - A batch-to-record streaming protocol over an abstract execution source
//! - A deterministic attention-alignment resolver for unknown tokens
//! - A strict loader for two-column token mapping files
//! - An explicit registry for resolving persisted model configurations
//!
//! ## Architecture
//!
//! The library is built around three abstractions:
//!
//! ### Execution sources
//!
//! The [`ExecutionSource`] trait stands in for the model's forward-pass
//! execution and whatever concurrent data-feeding it requires. The library
//! never looks inside that concurrency; it owns only the start/stop
//! lifecycle boundary, scoped so the feeding mechanism is torn down on
//! every exit path.
//!
//! ### Record streaming
//!
//! [`stream_predictions`] drives a source from a background worker and
//! yields a finite, ordered [`RecordStream`] of per-example
//! [`Record`]s. Exhaustion of the source ends the stream silently; any
//! other fault terminates it with a single error item.
//!
//! ### Unknown-token resolution
//!
//! [`resolve_unknown_tokens`] is a pure function from one prediction's
//! tokens and attention scores to a repaired token sequence. It keeps no
//! state between records, so it composes with the stream without any
//! cross-record memory.
//!
//! ## Implementation Details
//!
//! Streaming is consumer-driven: the worker stays at most one record ahead,
//! so batches are consumed exactly once, in arrival order, with no caching
//! or replay. All fatal conditions surface as [`Error`] values carrying the
//! triggering input; the only silent signal is normal exhaustion.

mod batch;
mod error;
mod source;

pub mod model;
pub mod resolve;
pub mod stream;

pub use batch::{Batch, Record, RecordIter};
pub use error::Error;
pub use resolve::{AttentionScores, TokenMapping, UNK_TOKEN, resolve_unknown_tokens};
pub use source::ExecutionSource;
pub use stream::{RecordStream, WorkerHandle, stream_predictions};
