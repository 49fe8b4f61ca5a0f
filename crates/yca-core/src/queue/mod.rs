use std::sync::Arc;

use tokio::sync::{Mutex, RwLock, mpsc};
use tokio_util::sync::CancellationToken;
use yca_model::{TaskId, VideoRef};

use crate::error::CoreError;

/// One unit of background work: analyze `video` for task `task_id`.
#[derive(Debug, Clone)]
pub struct AnalysisJob {
    pub task_id: TaskId,
    pub video: VideoRef,
}

/// Create a bounded work queue and its shared consumer side.
pub fn work_queue(capacity: usize) -> (WorkQueue, JobReceiver) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    (
        WorkQueue {
            tx: RwLock::new(Some(tx)),
        },
        JobReceiver {
            rx: Arc::new(Mutex::new(rx)),
        },
    )
}

/// Producer side of the work queue.
pub struct WorkQueue {
    tx: RwLock<Option<mpsc::Sender<AnalysisJob>>>,
}

impl WorkQueue {
    /// Reserve capacity for one job.
    ///
    /// Waits while the queue is full; fails once the queue is closed. A granted
    /// slot always delivers its job.
    pub async fn reserve(&self) -> Result<QueueSlot, CoreError> {
        let tx = self.tx.read().await.clone().ok_or(CoreError::QueueClosed)?;
        let permit = tx.reserve_owned().await.map_err(|_| CoreError::QueueClosed)?;
        Ok(QueueSlot { permit })
    }

    /// Stop accepting jobs. Jobs already queued are still delivered.
    pub async fn close(&self) {
        self.tx.write().await.take();
    }
}

/// Capacity reserved in the work queue for exactly one job.
pub struct QueueSlot {
    permit: mpsc::OwnedPermit<AnalysisJob>,
}

impl QueueSlot {
    pub fn send(self, job: AnalysisJob) {
        self.permit.send(job);
    }
}

/// Consumer side, shared by all workers.
#[derive(Clone)]
pub struct JobReceiver {
    rx: Arc<Mutex<mpsc::Receiver<AnalysisJob>>>,
}

impl JobReceiver {
    /// Next job, or `None` once the queue is closed and drained or `token` fires.
    pub async fn recv(&self, token: &CancellationToken) -> Option<AnalysisJob> {
        let mut rx = tokio::select! {
            _ = token.cancelled() => return None,
            rx = self.rx.lock() => rx,
        };
        tokio::select! {
            _ = token.cancelled() => None,
            job = rx.recv() => job,
        }
    }
}
