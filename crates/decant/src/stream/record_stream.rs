use std::pin::Pin;
use std::task::{Context, Poll};

use futures::Stream;
use tokio::sync::mpsc;

use super::worker::WorkerHandle;
use crate::batch::Record;
use crate::error::Error;

/// The ordered, lazy sequence of prediction records produced by
/// [`stream_predictions`](super::stream_predictions).
///
/// `RecordStream` implements the `Stream` trait from the `futures` crate,
/// yielding `Ok(record)` items in batch arrival order and, within a batch,
/// in example index order. The sequence is finite: it ends cleanly when the
/// execution source is exhausted, or after a single terminal `Err` item
/// when the source faults.
///
/// ## Resource lifecycle
///
/// The stream owns the background worker driving the execution source.
/// Dropping the stream - including dropping it early, before exhaustion -
/// shuts the worker down, which in turn tears down the source's feeding
/// mechanism. The stream is not restartable; polling after the terminal
/// item keeps returning `None`.
///
/// ## Implementation Details
///
/// The stream is backed by a bounded channel written by the worker task:
/// - `poll_next` never blocks beyond channel readiness
/// - the channel closes when the worker exits on any path, ending the
///   stream with `None`
pub struct RecordStream<V> {
    /// The underlying channel receiver
    receiver: mpsc::Receiver<Result<Record<V>, Error>>,

    /// Owns the worker loop; shuts it down when the stream is dropped
    _worker: WorkerHandle,
}

impl<V> RecordStream<V> {
    pub(super) fn new(
        receiver: mpsc::Receiver<Result<Record<V>, Error>>,
        worker: WorkerHandle,
    ) -> Self {
        Self {
            receiver,
            _worker: worker,
        }
    }
}

impl<V> Stream for RecordStream<V> {
    type Item = Result<Record<V>, Error>;

    /// Attempts to pull out the next record of this stream.
    ///
    /// Delegates directly to the underlying receiver; once the worker has
    /// exited and the channel drained, this returns `Poll::Ready(None)`.
    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.get_mut().receiver.poll_recv(cx)
    }
}
