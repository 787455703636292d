// ABOUTME: Persistence boundary for deployment records.
// ABOUTME: Defines the DeploymentStore trait and an in-memory implementation.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use thiserror::Error;

use crate::deployment::Deployment;
use crate::types::DeploymentId;

#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("deployment store unavailable: {0}")]
    Unavailable(String),
}

/// Loads and saves deployment records.
#[async_trait]
pub trait DeploymentStore: Send + Sync {
    async fn get(&self, id: &DeploymentId) -> Result<Option<Deployment>, StoreError>;

    /// Insert or replace the record.
    async fn put(&self, deployment: &Deployment) -> Result<(), StoreError>;

    /// Delete the record, returning it if it existed.
    async fn remove(&self, id: &DeploymentId) -> Result<Option<Deployment>, StoreError>;
}

/// Store backed by a process-local map.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    records: RwLock<HashMap<DeploymentId, Deployment>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

#[async_trait]
impl DeploymentStore for InMemoryStore {
    async fn get(&self, id: &DeploymentId) -> Result<Option<Deployment>, StoreError> {
        Ok(self.records.read().get(id).cloned())
    }

    async fn put(&self, deployment: &Deployment) -> Result<(), StoreError> {
        self.records
            .write()
            .insert(deployment.id().clone(), deployment.clone());
        Ok(())
    }

    async fn remove(&self, id: &DeploymentId) -> Result<Option<Deployment>, StoreError> {
        Ok(self.records.write().remove(id))
    }
}
