//! Module for handling background worker tasks.

use std::sync::{Arc, atomic::{AtomicBool, Ordering}};
use tokio::{task::JoinHandle, sync::Notify};

/// A handle for managing a long-running background task.
///
/// This struct provides a convenient way to spawn, manage, and gracefully
/// shut down background tasks in the Tokio runtime. The streamer uses it
/// for its own poll loop, and execution sources return one from
/// `start_feeding` so the streamer can tear the feeder down on every exit
/// path.
///
/// # Example
///
/// ```ignore
/// use std::sync::atomic::Ordering;
/// use std::time::Duration;
///
/// async fn example() {
///     let worker = WorkerHandle::new(|running, notifier| {
///         tokio::spawn(async move {
///             while running.load(Ordering::SeqCst) {
///                 // Feed the next chunk of work
///                 tokio::select! {
///                     _ = notifier.notified() => {}
///                     _ = tokio::time::sleep(Duration::from_secs(5)) => {}
///                 }
///             }
///         })
///     });
///
///     worker.notify();
///
///     // Worker is shut down when the handle drops
/// }
/// ```
pub struct WorkerHandle {
    /// Flag indicating whether the background task should continue running
    running: Arc<AtomicBool>,

    /// Handle to the spawned background task, becomes `None` after shutdown is initiated
    handle: Option<JoinHandle<()>>,

    /// Notification mechanism to wake up the background task
    notifier: Arc<Notify>,
}

impl WorkerHandle {
    /// Creates a new `WorkerHandle` by spawning a background task.
    ///
    /// # Parameters
    ///
    /// * `task` - A function that takes a running flag and a notifier, and returns a `JoinHandle`.
    ///   This function is responsible for creating and spawning the actual background task.
    ///
    /// # Returns
    ///
    /// A new `WorkerHandle` instance with the task running.
    pub fn new<F>(task: F) -> Self
    where
        F: FnOnce(Arc<AtomicBool>, Arc<Notify>) -> JoinHandle<()> + Send + 'static,
    {
        let running = Arc::new(AtomicBool::new(true));
        let notifier = Arc::new(Notify::new());
        let handle = task(running.clone(), notifier.clone());

        Self {
            running,
            handle: Some(handle),
            notifier,
        }
    }

    /// Notifies the background task to wake up and check for pending work.
    pub fn notify(&self) {
        self.notifier.notify_one();
    }

    /// Returns a clone of the atomic boolean that indicates whether the task should continue running.
    pub fn running(&self) -> Arc<AtomicBool> {
        self.running.clone()
    }

    /// Returns a clone of the notifier that can be used to wake up the background task.
    #[allow(dead_code)]
    pub fn notifier(&self) -> Arc<Notify> {
        self.notifier.clone()
    }

    /// Initiates a graceful shutdown of the background task.
    ///
    /// This method:
    /// 1. Sets the running flag to `false`
    /// 2. Notifies the task to wake up (so it can observe that it should stop)
    /// 3. Takes ownership of the task handle and spawns a separate task to await its completion
    pub fn shutdown(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        self.notifier.notify_one();

        if let Some(handle) = self.handle.take() {
            tokio::spawn(async move {
                let _ = handle.await;
            });
        }
    }
}

impl Drop for WorkerHandle {
    /// Ensures the background task is properly terminated when the handle is dropped.
    fn drop(&mut self) {
        self.shutdown();
    }
}
