// ABOUTME: Builders for deployments, containers, and wired lifecycles used across tests.
// ABOUTME: Keeps test bodies focused on the behavior under test.

use std::sync::Arc;

use vitrine::container::{Container, ContainerSet};
use vitrine::deployment::{
    CreationSource, Deployment, DeploymentKind, DeploymentLifecycle, DeploymentState,
};
use vitrine::store::{DeploymentStore, InMemoryStore};
use vitrine::types::{DeploymentId, ImageRef, Subdomain};
use vitrine::{DeploymentFacade, NewDeployment};

use super::fakes::{RecordingDriver, RecordingScheduler};

pub type TestLifecycle = DeploymentLifecycle<InMemoryStore, RecordingDriver, RecordingScheduler>;
pub type TestFacade = DeploymentFacade<InMemoryStore, RecordingDriver, RecordingScheduler>;

pub const ZONE: &str = "preview.example.com";

pub fn container(id: &str) -> Container {
    Container::new(id, format!("app-{id}"), ImageRef::parse("nginx:1.25").unwrap())
}

pub fn deployment(id: &str, containers: Vec<Container>) -> Deployment {
    Deployment::new(
        DeploymentId::new(id),
        DeploymentKind::Standard,
        CreationSource::Manual,
        Subdomain::new(id).unwrap(),
        ContainerSet::new(containers).unwrap(),
    )
}

pub fn new_deployment(id: &str, containers: Vec<Container>) -> NewDeployment {
    NewDeployment {
        id: DeploymentId::new(id),
        kind: DeploymentKind::Standard,
        creation_source: CreationSource::Manual,
        subdomain: Subdomain::new(id).unwrap(),
        containers,
    }
}

/// Collaborators shared between a lifecycle and the test observing it.
pub struct Harness {
    pub store: Arc<InMemoryStore>,
    pub driver: Arc<RecordingDriver>,
    pub scheduler: Arc<RecordingScheduler>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_driver(RecordingDriver::new())
    }

    pub fn with_driver(driver: RecordingDriver) -> Self {
        Self {
            store: Arc::new(InMemoryStore::new()),
            driver: Arc::new(driver),
            scheduler: Arc::new(RecordingScheduler::new()),
        }
    }

    pub fn lifecycle(&self) -> TestLifecycle {
        DeploymentLifecycle::new(
            Arc::clone(&self.store),
            Arc::clone(&self.driver),
            Arc::clone(&self.scheduler),
        )
    }

    pub fn facade(&self) -> TestFacade {
        DeploymentFacade::new(self.lifecycle(), ZONE)
    }

    /// Store a deployment and drive it into `state` without recording side effects.
    pub async fn seed(&self, deployment: Deployment, state: DeploymentState) -> DeploymentId {
        let id = deployment.id().clone();
        self.store.put(&deployment).await.unwrap();

        let seeding = DeploymentLifecycle::new(
            Arc::clone(&self.store),
            Arc::new(RecordingDriver::new()),
            Arc::new(RecordingScheduler::new()),
        );
        match state {
            DeploymentState::Active => {}
            DeploymentState::Failed => {
                seeding.fail(&id).await.unwrap();
            }
            DeploymentState::Disabled => {
                seeding.disable(&id).await.unwrap();
            }
        }
        id
    }
}
