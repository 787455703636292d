// ABOUTME: Pure transition table for the deployment lifecycle.
// ABOUTME: Decides the target state for an event without touching any collaborator.

use thiserror::Error;

use super::state::{DeploymentState, LifecycleEvent};

/// An event fired from a state it is not allowed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("cannot {event} a deployment that is {from}")]
pub struct InvalidTransition {
    pub from: DeploymentState,
    pub event: LifecycleEvent,
}

/// Every allowed `(from, event) -> to` edge.
pub const TRANSITIONS: &[(DeploymentState, LifecycleEvent, DeploymentState)] = &[
    (
        DeploymentState::Disabled,
        LifecycleEvent::Activate,
        DeploymentState::Active,
    ),
    (
        DeploymentState::Failed,
        LifecycleEvent::Activate,
        DeploymentState::Active,
    ),
    (
        DeploymentState::Active,
        LifecycleEvent::Fail,
        DeploymentState::Failed,
    ),
    (
        DeploymentState::Active,
        LifecycleEvent::Disable,
        DeploymentState::Disabled,
    ),
    (
        DeploymentState::Failed,
        LifecycleEvent::Disable,
        DeploymentState::Disabled,
    ),
];

/// Target state for `event` fired from `from`.
pub fn transition(
    from: DeploymentState,
    event: LifecycleEvent,
) -> Result<DeploymentState, InvalidTransition> {
    TRANSITIONS
        .iter()
        .find(|(f, e, _)| *f == from && *e == event)
        .map(|(_, _, to)| *to)
        .ok_or(InvalidTransition { from, event })
}

/// Whether entering the event's target state tears down containers.
pub fn runs_cleanup(event: LifecycleEvent) -> bool {
    event == LifecycleEvent::Disable
}
