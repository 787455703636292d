// ABOUTME: Background worker that drains the deletion queue.
// ABOUTME: Runs each task through a DeletionHandler and logs failures.

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinHandle;

use super::TaskHandle;
use super::queue::DeletionReceiver;
use crate::types::DeploymentId;

#[derive(Debug, Clone, Error)]
pub enum DeletionError {
    #[error("container runtime unreachable: {0}")]
    Connection(String),

    #[error("failed to delete resources of deployment {id}: {reason}")]
    Failed { id: DeploymentId, reason: String },
}

/// Deletes whatever a deployment left behind.
///
/// Must succeed when there is nothing left to delete.
#[async_trait]
pub trait DeletionHandler: Send + Sync {
    async fn delete(&self, id: &DeploymentId) -> Result<(), DeletionError>;
}

pub struct DeletionWorker<H: ?Sized> {
    receiver: DeletionReceiver,
    handler: Arc<H>,
}

impl<H> DeletionWorker<H>
where
    H: DeletionHandler + ?Sized + 'static,
{
    pub fn new(receiver: DeletionReceiver, handler: Arc<H>) -> Self {
        Self { receiver, handler }
    }

    /// Process tasks until every queue handle has been dropped.
    pub async fn run(mut self) {
        while let Some(task) = self.receiver.receiver.recv().await {
            // A new request for this deployment after this point must enqueue again.
            self.receiver.pending.lock().remove(&task.deployment_id);
            self.process(&task).await;
        }
        tracing::debug!("deletion queue closed, worker exiting");
    }

    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    async fn process(&self, task: &TaskHandle) {
        tracing::info!(deployment = %task.deployment_id, task = %task.task_id, "deleting deployment resources");
        match self.handler.delete(&task.deployment_id).await {
            Ok(()) => {
                tracing::debug!(deployment = %task.deployment_id, "deletion finished");
            }
            Err(e) => {
                tracing::error!(deployment = %task.deployment_id, task = %task.task_id, "deletion failed: {e}");
            }
        }
    }
}
