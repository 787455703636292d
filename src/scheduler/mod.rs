// ABOUTME: Asynchronous deletion scheduling for disabled or removed deployments.
// ABOUTME: Exposes the TaskScheduler boundary plus an in-process queue and worker.

mod queue;
mod worker;

pub use queue::{DeletionQueue, DeletionReceiver};
pub use worker::{DeletionError, DeletionHandler, DeletionWorker};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::types::{DeploymentId, TaskId};

/// Receipt for an enqueued deletion task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskHandle {
    pub task_id: TaskId,
    pub deployment_id: DeploymentId,
    pub enqueued_at: DateTime<Utc>,
    /// The deployment already had a pending task; this is that task's handle.
    pub duplicate: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchedulingError {
    #[error("deletion queue is full ({capacity} pending tasks)")]
    QueueFull { capacity: usize },

    #[error("deletion scheduler is unavailable")]
    Unavailable,
}

impl SchedulingError {
    /// Both cases clear up on their own; the caller may retry cleanup later.
    pub fn is_retryable(&self) -> bool {
        match self {
            SchedulingError::QueueFull { .. } | SchedulingError::Unavailable => true,
        }
    }
}

/// Hands deletion work to something that runs it out of band.
///
/// Delivery is at-least-once; consumers must tolerate repeats.
#[async_trait]
pub trait TaskScheduler: Send + Sync {
    async fn enqueue_deletion(&self, id: &DeploymentId) -> Result<TaskHandle, SchedulingError>;
}
