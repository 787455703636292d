// ABOUTME: Capability trait for stopping a deployment's containers.
// ABOUTME: Implemented by the bollard runtime and by test doubles.

use async_trait::async_trait;
use thiserror::Error;

use super::Container;

#[derive(Debug, Clone, Error)]
pub enum DriverError {
    #[error("container runtime unreachable: {0}")]
    Connection(String),

    #[error("failed to disable container {name}: {reason}")]
    DisableFailed { name: String, reason: String },
}

/// Disables containers on the runtime.
///
/// A container that is already stopped or no longer exists must count as
/// disabled, so cleanup can be retried.
#[async_trait]
pub trait ContainerDriver: Send + Sync {
    async fn disable(&self, container: &Container) -> Result<(), DriverError>;
}
