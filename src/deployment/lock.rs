// ABOUTME: Per-deployment exclusive sections for lifecycle operations.
// ABOUTME: Serializes events on one id while letting different ids run in parallel.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use crate::types::DeploymentId;

type LockTable = Arc<Mutex<HashMap<DeploymentId, Arc<AsyncMutex<()>>>>>;

#[derive(Debug, Default, Clone)]
pub struct DeploymentLocks {
    table: LockTable,
}

impl DeploymentLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `id`.
    pub async fn acquire(&self, id: &DeploymentId) -> DeploymentGuard {
        let slot = {
            let mut table = self.table.lock();
            Arc::clone(table.entry(id.clone()).or_default())
        };
        let guard = slot.lock_owned().await;

        DeploymentGuard {
            table: Arc::clone(&self.table),
            id: id.clone(),
            guard: Some(guard),
        }
    }

    /// Ids with a held or awaited lock.
    pub fn held(&self) -> usize {
        self.table.lock().len()
    }
}

/// Exclusive access to one deployment; released on drop.
pub struct DeploymentGuard {
    table: LockTable,
    id: DeploymentId,
    guard: Option<OwnedMutexGuard<()>>,
}

impl std::fmt::Debug for DeploymentGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeploymentGuard")
            .field("id", &self.id)
            .finish()
    }
}

impl Drop for DeploymentGuard {
    fn drop(&mut self) {
        let mut table = self.table.lock();
        self.guard.take();
        // Only the table holds the slot now: nobody is waiting on it.
        if let Some(slot) = table.get(&self.id)
            && Arc::strong_count(slot) == 1
        {
            table.remove(&self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn released_locks_are_forgotten() {
        let locks = DeploymentLocks::new();
        let id = DeploymentId::new("dep-1");

        let guard = locks.acquire(&id).await;
        assert_eq!(locks.held(), 1);
        drop(guard);
        assert_eq!(locks.held(), 0);
    }

    #[tokio::test]
    async fn same_id_waits_for_release() {
        let locks = DeploymentLocks::new();
        let id = DeploymentId::new("dep-1");

        let guard = locks.acquire(&id).await;
        let second = tokio::time::timeout(Duration::from_millis(50), locks.acquire(&id)).await;
        assert!(second.is_err());

        drop(guard);
        let second = tokio::time::timeout(Duration::from_millis(50), locks.acquire(&id)).await;
        assert!(second.is_ok());
    }

    #[tokio::test]
    async fn different_ids_do_not_block() {
        let locks = DeploymentLocks::new();

        let _a = locks.acquire(&DeploymentId::new("dep-1")).await;
        let b = tokio::time::timeout(
            Duration::from_millis(50),
            locks.acquire(&DeploymentId::new("dep-2")),
        )
        .await;
        assert!(b.is_ok());
    }
}
