use async_trait::async_trait;

use crate::batch::Batch;
use crate::error::Error;
use crate::stream::WorkerHandle;

/// The external producer of prediction batches.
///
/// An execution source abstracts a model's forward-pass execution together
/// with whatever concurrent data-feeding it requires. The streamer owns
/// only the lifecycle boundary of that feeding: it calls
/// [`start_feeding`](ExecutionSource::start_feeding) before the first poll
/// and drops the returned handle on every exit path.
///
/// # Polling contract
///
/// [`poll_batch`](ExecutionSource::poll_batch) is the only potentially
/// blocking operation in the pipeline. It resolves to:
///
/// - `Ok(Some(batch))` - a new batch arrived; batches are consumed exactly
///   once and in arrival order
/// - `Ok(None)` - the source is exhausted; no more data will ever arrive.
///   This is the normal terminal signal, not a failure
/// - `Err(fault)` - a fatal fault; the stream does not continue past it
///
/// Once exhausted or faulted, re-polling is undefined.
#[async_trait]
pub trait ExecutionSource: Send + 'static {
    /// Per-example value type carried by this source's batch fields.
    type Value: Send + 'static;

    /// Starts the background feeding mechanism this source requires, if
    /// any. The returned handle stops the mechanism when dropped.
    fn start_feeding(&mut self) -> Option<WorkerHandle> {
        None
    }

    /// Polls for the next batch, blocking until one is available, the
    /// source is exhausted, or a fault occurs.
    async fn poll_batch(&mut self) -> Result<Option<Batch<Self::Value>>, Error>;
}
