//! Input debouncing
//!
//! Edits are forwarded to a background task that waits for a quiet period
//! with no further edits and then hands the last value to a callback.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::trace;

#[derive(Debug)]
pub struct Debouncer {
    tx: mpsc::UnboundedSender<String>,
    task: JoinHandle<()>,
}

impl Debouncer {
    /// Spawn the debouncing task. Must be called inside a tokio runtime.
    pub fn spawn<F>(quiet: Duration, mut on_settle: F) -> Self
    where
        F: FnMut(String) + Send + 'static,
    {
        let (tx, mut rx) = mpsc::unbounded_channel::<String>();

        let task = tokio::spawn(async move {
            let mut pending: Option<String> = None;
            loop {
                match pending.take() {
                    None => match rx.recv().await {
                        Some(value) => pending = Some(value),
                        None => break,
                    },
                    Some(value) => {
                        tokio::select! {
                            next = rx.recv() => match next {
                                Some(next) => {
                                    trace!("Edit within quiet period, restarting timer");
                                    pending = Some(next);
                                }
                                None => break,
                            },
                            () = sleep(quiet) => on_settle(value),
                        }
                    }
                }
            }
        });

        Self { tx, task }
    }

    /// Record an edit. Returns false once the task has stopped.
    pub fn push(&self, value: impl Into<String>) -> bool {
        self.tx.send(value.into()).is_ok()
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.task.abort();
    }
}
