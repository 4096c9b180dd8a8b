//! Background execution of backup operations
//!
//! A [`BackupTask`] runs one export or import on a worker thread and hands
//! its single outcome back over a channel. The screen that started it owns
//! the handle and polls it from its tick. Dropping or cancelling the handle
//! detaches it: the file work still runs to the end, the outcome is thrown
//! away.

use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use tracing::{debug, warn};

/// Handle to a unit of backup work running on a worker thread
pub struct BackupTask<T> {
    label: &'static str,
    receiver: Option<Receiver<T>>,
}

impl<T: Send + 'static> BackupTask<T> {
    /// Start `work` on a worker thread
    pub fn spawn<F>(label: &'static str, work: F) -> Self
    where
        F: FnOnce() -> T + Send + 'static,
    {
        let (sender, receiver) = mpsc::channel();

        thread::spawn(move || {
            let outcome = work();
            if sender.send(outcome).is_err() {
                debug!(task = label, "backup task finished after its owner went away");
            }
        });

        debug!(task = label, "backup task started");
        Self {
            label,
            receiver: Some(receiver),
        }
    }
}

impl<T> BackupTask<T> {
    /// Name used in logs and status messages
    pub fn label(&self) -> &'static str {
        self.label
    }

    /// Whether the task can still deliver an outcome
    pub fn is_pending(&self) -> bool {
        self.receiver.is_some()
    }

    /// Take the outcome if the work has finished
    ///
    /// Returns `Some` at most once.
    pub fn poll(&mut self) -> Option<T> {
        let receiver = self.receiver.as_ref()?;
        match receiver.try_recv() {
            Ok(outcome) => {
                self.receiver = None;
                Some(outcome)
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                warn!(task = self.label, "backup task ended without an outcome");
                self.receiver = None;
                None
            }
        }
    }

    /// Block until the work finishes
    pub fn wait(mut self) -> Option<T> {
        let receiver = self.receiver.take()?;
        receiver.recv().ok()
    }

    /// Stop listening for the outcome
    pub fn cancel(&mut self) {
        if self.receiver.take().is_some() {
            debug!(task = self.label, "backup task detached");
        }
    }
}
