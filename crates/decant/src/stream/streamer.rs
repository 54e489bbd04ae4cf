use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::mpsc;

use super::pill::Pill;
use super::record_stream::RecordStream;
use super::worker::WorkerHandle;
use crate::batch::Record;
use crate::error::Error;
use crate::source::ExecutionSource;

/// The worker stays at most this many records ahead of the consumer, which
/// keeps streaming a single-pass, consumer-driven protocol.
const LOOKAHEAD: usize = 1;

/// Converts an execution source into a lazy, ordered stream of prediction
/// records.
///
/// This function:
/// 1. Spawns a background worker that owns the source for the rest of its life
/// 2. Starts the source's feeding mechanism before the first poll
/// 3. Polls for batches and slices each into records in index order
/// 4. Tears the feeding mechanism down on every exit path - exhaustion,
///    fault, or the consumer dropping the stream early
///
/// Exhaustion ends the stream silently; a source fault is surfaced as a
/// single terminal `Err` item. See [`RecordStream`] for the consumer-side
/// contract.
pub fn stream_predictions<S>(mut source: S) -> RecordStream<S::Value>
where
    S: ExecutionSource,
{
    let (tx, rx) = mpsc::channel(LOOKAHEAD);

    let pill = Pill::new();
    let worker = WorkerHandle::new(move |running, _notifier| {
        tokio::spawn(async move {
            let _pill = pill;
            let feeder = source.start_feeding();
            drive_source(source, tx, running).await;
            drop(feeder);
        })
    });

    RecordStream::new(rx, worker)
}

async fn drive_source<S>(
    mut source: S,
    tx: mpsc::Sender<Result<Record<S::Value>, Error>>,
    running: Arc<AtomicBool>,
) where
    S: ExecutionSource,
{
    while running.load(Ordering::SeqCst) {
        let polled = tokio::select! {
            biased;
            _ = tx.closed() => {
                tracing::debug!("record stream dropped, stopping worker");
                return;
            }
            polled = source.poll_batch() => polled,
        };

        match polled {
            Ok(Some(batch)) => {
                tracing::debug!(batch_size = batch.batch_size(), "received batch");
                for record in batch.into_records() {
                    if tx.send(Ok(record)).await.is_err() {
                        // Consumer gone
                        return;
                    }
                }
            }
            Ok(None) => {
                tracing::debug!("execution source exhausted");
                return;
            }
            Err(fault) => {
                tracing::error!(error = %fault, "execution source fault");
                let _ = tx.send(Err(fault)).await;
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::time::Duration;

    use async_trait::async_trait;
    use futures::StreamExt;
    use tokio::time;

    use crate::batch::Batch;

    fn batch_of(values: Vec<i32>) -> Batch<i32> {
        Batch::from_fields([("value".to_string(), values)]).unwrap()
    }

    /// Yields a fixed script of poll results, then signals exhaustion.
    struct ScriptedSource {
        script: VecDeque<Result<Option<Batch<i32>>, Error>>,
    }

    impl ScriptedSource {
        fn new(script: Vec<Result<Option<Batch<i32>>, Error>>) -> Self {
            Self {
                script: script.into(),
            }
        }
    }

    #[async_trait]
    impl ExecutionSource for ScriptedSource {
        type Value = i32;

        async fn poll_batch(&mut self) -> Result<Option<Batch<i32>>, Error> {
            self.script.pop_front().unwrap_or(Ok(None))
        }
    }

    /// Returns one batch, then blocks forever; its feeder reports teardown
    /// through a shared flag.
    struct StallingSource {
        first: Option<Batch<i32>>,
        feeder_stopped: Arc<AtomicBool>,
    }

    #[async_trait]
    impl ExecutionSource for StallingSource {
        type Value = i32;

        fn start_feeding(&mut self) -> Option<WorkerHandle> {
            let stopped = self.feeder_stopped.clone();
            Some(WorkerHandle::new(move |running, notifier| {
                tokio::spawn(async move {
                    while running.load(Ordering::SeqCst) {
                        notifier.notified().await;
                    }
                    stopped.store(true, Ordering::SeqCst);
                })
            }))
        }

        async fn poll_batch(&mut self) -> Result<Option<Batch<i32>>, Error> {
            match self.first.take() {
                Some(batch) => Ok(Some(batch)),
                None => futures::future::pending().await,
            }
        }
    }

    #[tokio::test]
    async fn streams_every_record_in_order_then_ends() {
        let source = ScriptedSource::new(vec![
            Ok(Some(batch_of(vec![0, 1]))),
            Ok(Some(batch_of(vec![]))),
            Ok(Some(batch_of(vec![2, 3, 4]))),
            Ok(None),
        ]);

        let mut stream = stream_predictions(source);
        let mut seen = Vec::new();
        while let Some(item) = stream.next().await {
            seen.push(*item.unwrap().get("value").unwrap());
        }

        assert_eq!(seen, vec![0, 1, 2, 3, 4]);
        assert!(stream.next().await.is_none(), "exhausted stream stays ended");
    }

    #[tokio::test]
    async fn empty_source_ends_immediately() {
        let mut stream = stream_predictions(ScriptedSource::new(vec![Ok(None)]));
        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn fault_is_surfaced_once_and_terminates_the_stream() {
        let source = ScriptedSource::new(vec![
            Ok(Some(batch_of(vec![7]))),
            Err(Error::execution_fault(std::io::Error::other("queue died"))),
            // Never reached
            Ok(Some(batch_of(vec![8]))),
        ]);

        let mut stream = stream_predictions(source);

        let first = stream.next().await.unwrap().unwrap();
        assert_eq!(first.get("value"), Some(&7));

        let fault = stream.next().await.unwrap();
        assert!(matches!(fault, Err(Error::ExecutionFault(_))));

        assert!(stream.next().await.is_none(), "no records after a fault");
    }

    #[tokio::test]
    async fn feeder_is_stopped_when_stream_is_dropped_unpolled() {
        let feeder_stopped = Arc::new(AtomicBool::new(false));
        let source = StallingSource {
            first: None,
            feeder_stopped: feeder_stopped.clone(),
        };

        let stream = stream_predictions(source);
        drop(stream);

        time::sleep(Duration::from_millis(100)).await;
        assert!(feeder_stopped.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn cancellation_mid_stream_tears_down_the_feeder() {
        let feeder_stopped = Arc::new(AtomicBool::new(false));
        let source = StallingSource {
            first: Some(batch_of(vec![1, 2])),
            feeder_stopped: feeder_stopped.clone(),
        };

        let mut stream = stream_predictions(source);
        let first = stream.next().await.unwrap().unwrap();
        assert_eq!(first.get("value"), Some(&1));

        // Stop polling with records still pending
        drop(stream);

        time::sleep(Duration::from_millis(100)).await;
        assert!(
            feeder_stopped.load(Ordering::SeqCst),
            "feeder must be stopped when the consumer walks away"
        );
    }
}
