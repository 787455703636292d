// ABOUTME: The deployment record and its state invariants.
// ABOUTME: State only changes through apply_event, which keeps disabled_at in sync.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::state::{CreationSource, DeploymentKind, DeploymentState, LifecycleEvent};
use super::transitions::{InvalidTransition, transition};
use crate::container::{Container, ContainerSet};
use crate::types::{DeploymentId, Subdomain};

/// An ephemeral preview environment.
///
/// `disabled_at` is set exactly when `state` is `Disabled`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deployment {
    id: DeploymentId,
    kind: DeploymentKind,
    #[serde(default)]
    creation_source: CreationSource,
    state: DeploymentState,
    disabled_at: Option<DateTime<Utc>>,
    subdomain: Subdomain,
    #[serde(default)]
    containers: ContainerSet,
}

impl Deployment {
    /// A new deployment in the `Active` state.
    pub fn new(
        id: DeploymentId,
        kind: DeploymentKind,
        creation_source: CreationSource,
        subdomain: Subdomain,
        containers: ContainerSet,
    ) -> Self {
        Self {
            id,
            kind,
            creation_source,
            state: DeploymentState::Active,
            disabled_at: None,
            subdomain,
            containers,
        }
    }

    pub fn id(&self) -> &DeploymentId {
        &self.id
    }

    pub fn kind(&self) -> DeploymentKind {
        self.kind
    }

    pub fn creation_source(&self) -> CreationSource {
        self.creation_source
    }

    pub fn state(&self) -> DeploymentState {
        self.state
    }

    pub fn disabled_at(&self) -> Option<DateTime<Utc>> {
        self.disabled_at
    }

    pub fn subdomain(&self) -> &Subdomain {
        &self.subdomain
    }

    pub fn containers(&self) -> &ContainerSet {
        &self.containers
    }

    pub(crate) fn containers_mut(&mut self) -> &mut ContainerSet {
        &mut self.containers
    }

    pub fn active_containers(&self) -> impl Iterator<Item = &Container> {
        self.containers.active_containers()
    }

    /// Host name the preview is served under, e.g. `pr-42.preview.example.com`.
    pub fn preview_url(&self, managed_dns_zone: &str) -> String {
        self.subdomain.within(managed_dns_zone)
    }

    /// Move to the event's target state, stamping or clearing `disabled_at`.
    ///
    /// Leaves the record untouched when the event is not allowed.
    pub(crate) fn apply_event(
        &mut self,
        event: LifecycleEvent,
        now: DateTime<Utc>,
    ) -> Result<DeploymentState, InvalidTransition> {
        let to = transition(self.state, event)?;
        self.state = to;
        self.disabled_at = match to {
            DeploymentState::Disabled => Some(now),
            DeploymentState::Active | DeploymentState::Failed => match event {
                LifecycleEvent::Activate => None,
                _ => self.disabled_at,
            },
        };
        Ok(to)
    }
}
