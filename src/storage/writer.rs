//! Single-writer persistence queue.
//!
//! Mutations enqueue a write and return immediately. One worker task drains
//! the queue strictly in enqueue order, so the last logical write to a key is
//! always the last one applied. Failures are logged and published on the
//! event bus; they are never retried and never reach the enqueuing caller.

use std::sync::Arc;

use log::{debug, error, warn};
use serde::Serialize;
use tokio::runtime::Handle;
use tokio::sync::{mpsc, oneshot};

use super::traits::KeyValueStore;
use crate::error::{PrayerbookError, Result};
use crate::events::{EventBus, StoreEvent};

#[derive(Debug)]
enum WriteOp {
    Set { key: String, value: String },
    Remove { keys: Vec<String> },
    Flush(oneshot::Sender<()>),
}

/// Cloneable handle to the persistence worker.
#[derive(Debug, Clone)]
pub struct PersistQueue {
    tx: mpsc::UnboundedSender<WriteOp>,
    events: EventBus,
}

impl PersistQueue {
    /// Spawn the worker on the current Tokio runtime.
    ///
    /// The worker stops once every handle has been dropped and the queue is
    /// drained.
    pub fn spawn(backend: Arc<dyn KeyValueStore>, events: EventBus) -> Result<Self> {
        let handle = Handle::try_current()
            .map_err(|e| PrayerbookError::Storage(format!("persistence worker needs a Tokio runtime: {}", e)))?;
        let (tx, rx) = mpsc::unbounded_channel();
        handle.spawn(run_worker(backend, events.clone(), rx));
        Ok(Self { tx, events })
    }

    /// Enqueue a raw string write.
    pub fn set(&self, key: &str, value: String) {
        self.enqueue(WriteOp::Set {
            key: key.to_string(),
            value,
        });
    }

    /// Serialize `value` as JSON and enqueue the write.
    pub fn set_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        match serde_json::to_string(value) {
            Ok(json) => self.set(key, json),
            Err(e) => report_failure(&self.events, key.to_string(), e.into()),
        }
    }

    /// Enqueue removal of one or more keys.
    pub fn remove(&self, keys: Vec<String>) {
        if keys.is_empty() {
            return;
        }
        self.enqueue(WriteOp::Remove { keys });
    }

    /// Wait until every write enqueued before this call has been applied.
    pub async fn flush(&self) {
        let (done_tx, done_rx) = oneshot::channel();
        self.enqueue(WriteOp::Flush(done_tx));
        // A closed channel means the worker is gone; nothing left to wait for
        let _ = done_rx.await;
    }

    fn enqueue(&self, op: WriteOp) {
        if let Err(e) = self.tx.send(op) {
            let target = match e.0 {
                WriteOp::Set { key, .. } => key,
                WriteOp::Remove { keys } => keys.join(","),
                WriteOp::Flush(_) => "flush".to_string(),
            };
            warn!("Persistence worker stopped, dropping write: {}", target);
        }
    }
}

async fn run_worker(backend: Arc<dyn KeyValueStore>, events: EventBus, mut rx: mpsc::UnboundedReceiver<WriteOp>) {
    while let Some(op) = rx.recv().await {
        match op {
            WriteOp::Set { key, value } => {
                if let Err(e) = backend.set(&key, value).await {
                    report_failure(&events, key, e);
                } else {
                    debug!("Persisted {}", key);
                }
            }
            WriteOp::Remove { keys } => {
                if let Err(e) = backend.multi_remove(&keys).await {
                    report_failure(&events, keys.join(","), e);
                } else {
                    debug!("Removed {}", keys.join(","));
                }
            }
            WriteOp::Flush(done) => {
                let _ = done.send(());
            }
        }
    }
    debug!("Persistence worker stopped");
}

fn report_failure(events: &EventBus, key: String, err: PrayerbookError) {
    error!("Error persisting {}: {}", key, err);
    events.emit(StoreEvent::PersistFailed {
        key,
        message: err.to_string(),
    });
}
