// ABOUTME: Bounded in-process deletion queue over a tokio mpsc channel.
// ABOUTME: Never waits on a full channel and folds repeat requests into the pending task.

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::mpsc;

use super::{SchedulingError, TaskHandle, TaskScheduler};
use crate::config::SchedulerConfig;
use crate::types::{DeploymentId, TaskId};

pub(super) type PendingTasks = Arc<Mutex<HashMap<DeploymentId, TaskHandle>>>;

/// Sending half of the deletion channel.
#[derive(Debug, Clone)]
pub struct DeletionQueue {
    sender: mpsc::Sender<TaskHandle>,
    pending: PendingTasks,
    capacity: usize,
    next_task: Arc<AtomicU64>,
}

/// Receiving half, consumed by a `DeletionWorker`.
#[derive(Debug)]
pub struct DeletionReceiver {
    pub(super) receiver: mpsc::Receiver<TaskHandle>,
    pub(super) pending: PendingTasks,
}

impl DeletionQueue {
    pub fn channel(capacity: usize) -> (Self, DeletionReceiver) {
        let capacity = capacity.max(1);
        let (sender, receiver) = mpsc::channel(capacity);
        let pending = PendingTasks::default();

        let queue = Self {
            sender,
            pending: Arc::clone(&pending),
            capacity,
            next_task: Arc::new(AtomicU64::new(1)),
        };
        (queue, DeletionReceiver { receiver, pending })
    }

    pub fn from_config(config: &SchedulerConfig) -> (Self, DeletionReceiver) {
        Self::channel(config.queue_capacity)
    }

    /// Number of deployments with a task not yet picked up.
    pub fn pending(&self) -> usize {
        self.pending.lock().len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[async_trait]
impl TaskScheduler for DeletionQueue {
    async fn enqueue_deletion(&self, id: &DeploymentId) -> Result<TaskHandle, SchedulingError> {
        let mut pending = self.pending.lock();

        if let Some(existing) = pending.get(id) {
            tracing::debug!(deployment = %id, task = %existing.task_id, "deletion already pending");
            return Ok(TaskHandle {
                duplicate: true,
                ..existing.clone()
            });
        }

        let sequence = self.next_task.fetch_add(1, Ordering::Relaxed);
        let handle = TaskHandle {
            task_id: TaskId::new(format!("delete-{sequence}")),
            deployment_id: id.clone(),
            enqueued_at: Utc::now(),
            duplicate: false,
        };

        match self.sender.try_send(handle.clone()) {
            Ok(()) => {
                pending.insert(id.clone(), handle.clone());
                tracing::debug!(deployment = %id, task = %handle.task_id, "deletion enqueued");
                Ok(handle)
            }
            Err(mpsc::error::TrySendError::Full(_)) => Err(SchedulingError::QueueFull {
                capacity: self.capacity,
            }),
            Err(mpsc::error::TrySendError::Closed(_)) => Err(SchedulingError::Unavailable),
        }
    }
}
