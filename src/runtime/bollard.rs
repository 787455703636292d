// ABOUTME: Bollard-backed container driver and deletion handler.
// ABOUTME: Supports both Docker and Podman via the Docker-compatible API.

use async_trait::async_trait;
use bollard::Docker;
use bollard::query_parameters::{
    ListContainersOptions, RemoveContainerOptions, StopContainerOptions,
};
use std::collections::HashMap;
use std::time::Duration;

use crate::config::CleanupConfig;
use crate::container::{Container, ContainerDriver, DriverError};
use crate::error::{Error, Result};
use crate::scheduler::{DeletionError, DeletionHandler};
use crate::types::DeploymentId;

/// Label carrying the owning deployment's id on every runtime container.
pub const DEPLOYMENT_LABEL: &str = "vitrine.deployment";

/// Seconds bollard waits on the socket before giving up.
const CLIENT_TIMEOUT_SECS: u64 = 120;

// =============================================================================
// Error Mapping Helpers
// =============================================================================

/// Stop grace period in whole seconds, saturating at the API's `i32` limit.
fn stop_seconds(timeout: Duration) -> i32 {
    i32::try_from(timeout.as_secs()).unwrap_or(i32::MAX)
}

fn status_of(e: &bollard::errors::Error) -> Option<u16> {
    match e {
        bollard::errors::Error::DockerResponseServerError { status_code, .. } => Some(*status_code),
        _ => None,
    }
}

fn map_stop_error(e: bollard::errors::Error, name: &str) -> DriverError {
    match e {
        bollard::errors::Error::DockerResponseServerError { message, .. } => {
            DriverError::DisableFailed {
                name: name.to_string(),
                reason: message,
            }
        }
        other => DriverError::Connection(other.to_string()),
    }
}

fn map_delete_error(e: bollard::errors::Error, id: &DeploymentId) -> DeletionError {
    match e {
        bollard::errors::Error::DockerResponseServerError { message, .. } => {
            DeletionError::Failed {
                id: id.clone(),
                reason: message,
            }
        }
        other => DeletionError::Connection(other.to_string()),
    }
}

// =============================================================================
// Runtime
// =============================================================================

pub struct BollardRuntime {
    client: Docker,
    stop_timeout: Duration,
}

impl BollardRuntime {
    pub fn new(client: Docker, stop_timeout: Duration) -> Self {
        Self {
            client,
            stop_timeout,
        }
    }

    /// Connect to a Docker or Podman socket.
    pub fn connect_unix(socket_path: &str, stop_timeout: Duration) -> Result<Self> {
        let client =
            Docker::connect_with_unix(socket_path, CLIENT_TIMEOUT_SECS, bollard::API_DEFAULT_VERSION)
                .map_err(|e| Error::RuntimeConnection(e.to_string()))?;
        Ok(Self::new(client, stop_timeout))
    }

    /// Connect using `DOCKER_HOST` or the platform default socket.
    pub fn connect_local(stop_timeout: Duration) -> Result<Self> {
        let client = Docker::connect_with_local_defaults()
            .map_err(|e| Error::RuntimeConnection(e.to_string()))?;
        Ok(Self::new(client, stop_timeout))
    }

    /// Connect to the local runtime with the configured stop grace period.
    pub fn from_config(config: &CleanupConfig) -> Result<Self> {
        Self::connect_local(config.stop_timeout)
    }

    /// Labels a runtime container needs to be found by deletion.
    pub fn labels_for(id: &DeploymentId) -> HashMap<String, String> {
        HashMap::from([(DEPLOYMENT_LABEL.to_string(), id.to_string())])
    }

    async fn containers_of(&self, id: &DeploymentId) -> std::result::Result<Vec<String>, DeletionError> {
        let filters = HashMap::from([(
            "label".to_string(),
            vec![format!("{DEPLOYMENT_LABEL}={id}")],
        )]);
        let opts = ListContainersOptions {
            all: true,
            filters: Some(filters),
            ..Default::default()
        };

        let containers = self
            .client
            .list_containers(Some(opts))
            .await
            .map_err(|e| map_delete_error(e, id))?;

        Ok(containers.into_iter().filter_map(|c| c.id).collect())
    }
}

#[async_trait]
impl ContainerDriver for BollardRuntime {
    async fn disable(&self, container: &Container) -> std::result::Result<(), DriverError> {
        let opts = StopContainerOptions {
            t: Some(stop_seconds(self.stop_timeout)),
            signal: None,
        };

        match self.client.stop_container(&container.name, Some(opts)).await {
            Ok(()) => Ok(()),
            // 304: already stopped, 404: already gone.
            Err(e) if matches!(status_of(&e), Some(304 | 404)) => {
                tracing::debug!(container = %container.name, "container already stopped");
                Ok(())
            }
            Err(e) => Err(map_stop_error(e, &container.name)),
        }
    }
}

#[async_trait]
impl DeletionHandler for BollardRuntime {
    async fn delete(&self, id: &DeploymentId) -> std::result::Result<(), DeletionError> {
        let containers = self.containers_of(id).await?;
        if containers.is_empty() {
            tracing::debug!(deployment = %id, "nothing left to delete");
            return Ok(());
        }

        for container_id in &containers {
            let opts = RemoveContainerOptions {
                force: true,
                ..Default::default()
            };
            match self.client.remove_container(container_id, Some(opts)).await {
                Ok(()) => {}
                Err(e) if status_of(&e) == Some(404) => {}
                Err(e) => return Err(map_delete_error(e, id)),
            }
        }

        tracing::info!(deployment = %id, removed = containers.len(), "deployment containers removed");
        Ok(())
    }
}
