// ABOUTME: The containers of one deployment, with ingress and uniqueness rules.
// ABOUTME: Provides bounded-parallel bulk disable that reports failures without stopping.

use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{Container, ContainerDriver, DriverError};
use crate::types::ContainerId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContainerSetError {
    #[error("container {0} already belongs to this deployment")]
    DuplicateId(ContainerId),

    #[error("container {candidate} cannot receive incoming requests: {existing} already does")]
    MultipleIngress {
        existing: ContainerId,
        candidate: ContainerId,
    },
}

/// A container the driver could not disable.
#[derive(Debug, Clone)]
pub struct DisableFailure {
    pub container_id: ContainerId,
    pub error: DriverError,
}

/// Result of disabling every active container.
#[derive(Debug, Clone, Default)]
pub struct DisableOutcome {
    /// Containers disabled by this call.
    pub disabled: Vec<ContainerId>,
    pub failures: Vec<DisableFailure>,
}

impl DisableOutcome {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContainerSet {
    containers: Vec<Container>,
}

impl ContainerSet {
    pub fn new(containers: Vec<Container>) -> Result<Self, ContainerSetError> {
        let mut set = Self::default();
        for container in containers {
            set.push(container)?;
        }
        Ok(set)
    }

    pub fn push(&mut self, container: Container) -> Result<(), ContainerSetError> {
        if self.get(&container.id).is_some() {
            return Err(ContainerSetError::DuplicateId(container.id));
        }
        if container.receive_incoming_requests
            && let Some(existing) = self.ingress_container()
        {
            return Err(ContainerSetError::MultipleIngress {
                existing: existing.id.clone(),
                candidate: container.id,
            });
        }
        self.containers.push(container);
        Ok(())
    }

    /// Append several containers, all or none.
    pub fn extend(&mut self, containers: Vec<Container>) -> Result<(), ContainerSetError> {
        let mut staged = self.clone();
        for container in containers {
            staged.push(container)?;
        }
        *self = staged;
        Ok(())
    }

    pub fn get(&self, id: &ContainerId) -> Option<&Container> {
        self.containers.iter().find(|c| &c.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Container> {
        self.containers.iter()
    }

    pub fn active_containers(&self) -> impl Iterator<Item = &Container> {
        self.containers.iter().filter(|c| c.is_active())
    }

    pub fn ingress_container(&self) -> Option<&Container> {
        self.containers.iter().find(|c| c.receive_incoming_requests)
    }

    pub fn len(&self) -> usize {
        self.containers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.containers.is_empty()
    }

    /// Disable every active container, at most `max_parallel` at a time.
    ///
    /// Waits for all driver calls. Only containers the driver confirmed are
    /// marked inactive; failures are returned, never short-circuited.
    pub async fn disable_all<D>(&mut self, driver: &D, max_parallel: usize) -> DisableOutcome
    where
        D: ContainerDriver + ?Sized,
    {
        let targets: Vec<Container> = self.active_containers().cloned().collect();
        if targets.is_empty() {
            return DisableOutcome::default();
        }

        let results: Vec<(ContainerId, Result<(), DriverError>)> = stream::iter(targets)
            .map(|container| async move {
                let result = driver.disable(&container).await;
                (container.id, result)
            })
            .buffer_unordered(max_parallel.max(1))
            .collect()
            .await;

        let mut outcome = DisableOutcome::default();
        for (container_id, result) in results {
            match result {
                Ok(()) => {
                    if let Some(container) =
                        self.containers.iter_mut().find(|c| c.id == container_id)
                    {
                        container.mark_disabled();
                    }
                    outcome.disabled.push(container_id);
                }
                Err(error) => {
                    tracing::warn!(container = %container_id, "container disable failed: {error}");
                    outcome.failures.push(DisableFailure {
                        container_id,
                        error,
                    });
                }
            }
        }
        outcome
    }
}
