use std::thread;

/// A panic propagation mechanism for the streaming worker.
///
/// `Pill` is moved into the worker task when streaming begins. If the task
/// panics, the `Pill` is dropped during unwinding and re-raises the panic
/// in the dropping context instead of letting the failure be silently
/// swallowed while the consumer waits on a stream that will never yield.
///
/// Dropping a `Pill` outside a panicking context is a no-op.
pub struct Pill {}

impl Pill {
    pub fn new() -> Self {
        Self {}
    }
}

impl Drop for Pill {
    fn drop(&mut self) {
        if thread::panicking() {
            panic!("streaming worker panicked - propagating panic to parent thread");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use std::thread;

    #[test]
    fn test_pill_does_not_panic_in_normal_case() {
        {
            let _pill = Pill::new();
        }
        // Reaching this point means the drop was silent
    }

    #[test]
    fn test_pill_propagates_panic() {
        let (sender, receiver) = mpsc::channel();

        let handle = thread::spawn(move || {
            let pill = Pill::new();
            sender.send(pill).unwrap();

            panic!("intentional panic in worker thread");
        });

        let pill = receiver.recv().unwrap();

        let result = handle.join();
        assert!(result.is_err(), "worker thread should have panicked");

        // Not in a panicking context here, so this drop stays silent
        drop(pill);
    }
}
