// ABOUTME: A single container belonging to a deployment.
// ABOUTME: Tracks image, registry, ingress flag, and whether it is still active.

use serde::{Deserialize, Serialize};

use crate::registry::RegistryProvider;
use crate::types::{ContainerId, ImageRef};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Container {
    pub id: ContainerId,

    /// Name the container runtime knows it by.
    pub name: String,

    pub image: ImageRef,

    /// Registry the image is validated against; `None` skips validation.
    #[serde(default)]
    pub registry: Option<RegistryProvider>,

    /// Whether the deployment's public traffic is routed to this container.
    #[serde(default)]
    pub receive_incoming_requests: bool,

    #[serde(default = "default_active")]
    active: bool,
}

fn default_active() -> bool {
    true
}

impl Container {
    pub fn new(id: impl Into<ContainerId>, name: impl Into<String>, image: ImageRef) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            image,
            registry: None,
            receive_incoming_requests: false,
            active: true,
        }
    }

    pub fn with_registry(mut self, provider: RegistryProvider) -> Self {
        self.registry = Some(provider);
        self
    }

    pub fn receiving_requests(mut self) -> Self {
        self.receive_incoming_requests = true;
        self
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub(crate) fn mark_disabled(&mut self) {
        self.active = false;
    }
}
