use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::error::Result;

/// Coalesces bursts of calls into a single delivery after a quiet period.
///
/// Each [`call`](Debouncer::call) cancels the pending delivery and reschedules
/// it `delay` after the latest call, carrying the latest value. Deliveries run
/// on a tokio task, so a runtime must be active when the debouncer is built.
/// Dropping the debouncer flushes a pending value immediately.
pub struct Debouncer<T> {
    tx: mpsc::UnboundedSender<T>,
    handle: JoinHandle<()>,
}

impl<T: Send + 'static> Debouncer<T> {
    pub fn new<F>(delay: Duration, mut deliver: F) -> Self
    where
        F: FnMut(T) + Send + 'static,
    {
        let (tx, mut rx) = mpsc::unbounded_channel::<T>();

        let handle = tokio::spawn(async move {
            while let Some(first) = rx.recv().await {
                let mut pending = first;
                loop {
                    tokio::select! {
                        next = rx.recv() => match next {
                            Some(value) => pending = value,
                            None => {
                                deliver(pending);
                                return;
                            }
                        },
                        _ = tokio::time::sleep(delay) => {
                            deliver(pending);
                            break;
                        }
                    }
                }
            }
        });

        Self { tx, handle }
    }

    /// Schedule `value` for delivery, replacing any pending value.
    pub fn call(&self, value: T) {
        // The worker only stops once the sender is gone
        let _ = self.tx.send(value);
    }

    /// Flush any pending value and wait for the worker to finish.
    pub async fn shutdown(self) -> Result<()> {
        let Self { tx, handle } = self;
        drop(tx);
        handle.await?;
        Ok(())
    }
}
