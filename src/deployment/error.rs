// ABOUTME: Lifecycle error types with SNAFU pattern.
// ABOUTME: Distinguishes rejected events, missing records, and post-commit scheduling failures.

use snafu::Snafu;

use super::transitions::InvalidTransition;
use crate::container::{ContainerSetError, DisableOutcome};
use crate::diagnostics::Diagnostics;
use crate::scheduler::SchedulingError;
use crate::store::StoreError;
use crate::types::DeploymentId;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum LifecycleError {
    #[snafu(display("deployment {id}: {source}"))]
    Transition {
        id: DeploymentId,
        source: InvalidTransition,
    },

    #[snafu(display("deployment {id} not found"))]
    NotFound { id: DeploymentId },

    #[snafu(display("deployment {id} already exists"))]
    AlreadyExists { id: DeploymentId },

    #[snafu(display("deployment {id} is disabled"))]
    Disabled { id: DeploymentId },

    #[snafu(display("deployment {id}: {source}"))]
    InvalidContainers {
        id: DeploymentId,
        source: ContainerSetError,
    },

    /// The state change (if any) was saved and containers were disabled, but
    /// the deletion task could not be queued.
    #[snafu(display("deployment {id}: deletion not scheduled: {source}"))]
    Scheduling {
        id: DeploymentId,
        source: SchedulingError,
        disabled: DisableOutcome,
        diagnostics: Diagnostics,
    },

    #[snafu(display("deployment store failed: {source}"))]
    Store { source: StoreError },
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleErrorKind {
    /// Event not allowed from the current state.
    InvalidTransition,
    NotFound,
    AlreadyExists,
    /// Containers cannot be added once the deployment is disabled.
    Disabled,
    InvalidContainers,
    /// Deletion could not be queued; retry with `clean`.
    SchedulingFailed,
    StoreFailed,
}

impl LifecycleError {
    /// Returns the error kind for programmatic handling.
    pub fn kind(&self) -> LifecycleErrorKind {
        match self {
            LifecycleError::Transition { .. } => LifecycleErrorKind::InvalidTransition,
            LifecycleError::NotFound { .. } => LifecycleErrorKind::NotFound,
            LifecycleError::AlreadyExists { .. } => LifecycleErrorKind::AlreadyExists,
            LifecycleError::Disabled { .. } => LifecycleErrorKind::Disabled,
            LifecycleError::InvalidContainers { .. } => LifecycleErrorKind::InvalidContainers,
            LifecycleError::Scheduling { .. } => LifecycleErrorKind::SchedulingFailed,
            LifecycleError::Store { .. } => LifecycleErrorKind::StoreFailed,
        }
    }

    pub fn is_retryable(&self) -> bool {
        match self {
            LifecycleError::Scheduling { source, .. } => source.is_retryable(),
            LifecycleError::Store { .. } => true,
            _ => false,
        }
    }

    /// The rejected transition, if this is one.
    pub fn invalid_transition(&self) -> Option<&InvalidTransition> {
        match self {
            LifecycleError::Transition { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<StoreError> for LifecycleError {
    fn from(source: StoreError) -> Self {
        LifecycleError::Store { source }
    }
}
