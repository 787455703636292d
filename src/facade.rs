// ABOUTME: Entry point for request handling code: deployment creation, registry checks, lifecycle events.
// ABOUTME: Maps every failure onto CoreError with a fixed class and a JSON `errors` body.

use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

use crate::config::Config;
use crate::container::{Container, ContainerDriver, ContainerSet, ContainerSetError, DisableOutcome};
use crate::deployment::{
    CleanupReport, CleanupSettings, CreationSource, Deployment, DeploymentKind, DeploymentState,
    DeploymentLifecycle, InvalidTransition, LifecycleError, RemovalOutcome, TransitionOutcome,
};
use crate::diagnostics::Diagnostics;
use crate::registry::{
    RawRegistryFailure, RegistryAction, RegistryClient, RegistryErrorResult,
    RegistryErrorTranslator, RegistryProvider, RegistryResponse, clients_from_config,
};
use crate::scheduler::{SchedulingError, TaskScheduler};
use crate::store::{DeploymentStore, StoreError};
use crate::types::{DeploymentId, Subdomain};

/// Everything needed to create a deployment.
#[derive(Debug, Clone)]
pub struct NewDeployment {
    pub id: DeploymentId,
    pub kind: DeploymentKind,
    pub creation_source: CreationSource,
    pub subdomain: Subdomain,
    pub containers: Vec<Container>,
}

/// How a caller should treat a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Well-formed request rejected on its merits (registry refusal, bad container set).
    Unprocessable,
    /// Conflicts with the deployment's current state.
    Conflict,
    NotFound,
    /// Transient; the same request may succeed later.
    Retryable,
    Internal,
}

impl ErrorClass {
    pub fn http_status(&self) -> u16 {
        match self {
            ErrorClass::Unprocessable => 422,
            ErrorClass::Conflict => 409,
            ErrorClass::NotFound => 404,
            ErrorClass::Retryable => 503,
            ErrorClass::Internal => 500,
        }
    }
}

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("registry rejected the request: {0}")]
    RegistryUnprocessable(RegistryErrorResult),

    #[error("no registry client configured for {0}")]
    RegistryNotConfigured(RegistryProvider),

    #[error("invalid containers: {0}")]
    InvalidContainers(#[from] ContainerSetError),

    #[error("deployment {0} already exists")]
    AlreadyExists(DeploymentId),

    #[error("deployment {0} is disabled")]
    DeploymentDisabled(DeploymentId),

    #[error("deployment {id}: {source}")]
    InvalidTransition {
        id: DeploymentId,
        source: InvalidTransition,
    },

    #[error("deployment {0} not found")]
    NotFound(DeploymentId),

    /// The transition stands; only the deletion task is missing.
    #[error("deployment {id}: deletion not scheduled: {source}")]
    Scheduling {
        id: DeploymentId,
        source: SchedulingError,
        disabled: DisableOutcome,
        diagnostics: Diagnostics,
    },

    #[error("deployment store failed: {0}")]
    Store(#[from] StoreError),
}

impl CoreError {
    pub fn class(&self) -> ErrorClass {
        match self {
            CoreError::RegistryUnprocessable(_)
            | CoreError::RegistryNotConfigured(_)
            | CoreError::InvalidContainers(_) => ErrorClass::Unprocessable,
            CoreError::AlreadyExists(_)
            | CoreError::DeploymentDisabled(_)
            | CoreError::InvalidTransition { .. } => {
                ErrorClass::Conflict
            }
            CoreError::NotFound(_) => ErrorClass::NotFound,
            CoreError::Scheduling { .. } | CoreError::Store(_) => ErrorClass::Retryable,
        }
    }

    pub fn is_retryable(&self) -> bool {
        self.class() == ErrorClass::Retryable
    }

    /// Caller-facing JSON: always `{"errors": {<key>: [message, ...]}}`.
    pub fn response_body(&self) -> Value {
        match self {
            CoreError::RegistryUnprocessable(result) => result.to_json(),
            CoreError::RegistryNotConfigured(_) => errors_body("registry", self),
            CoreError::InvalidContainers(_) => errors_body("containers", self),
            CoreError::AlreadyExists(_) => errors_body("id", self),
            CoreError::DeploymentDisabled(_) => errors_body("state", self),
            CoreError::InvalidTransition { source, .. } => errors_body("state", source),
            CoreError::NotFound(_) => errors_body("title", self),
            CoreError::Scheduling { .. } => errors_body("deletion", self),
            CoreError::Store(_) => errors_body("store", self),
        }
    }
}

fn errors_body(key: &str, message: &impl std::fmt::Display) -> Value {
    json!({ "errors": { key: [message.to_string()] } })
}

impl From<LifecycleError> for CoreError {
    fn from(err: LifecycleError) -> Self {
        match err {
            LifecycleError::Transition { id, source } => CoreError::InvalidTransition { id, source },
            LifecycleError::NotFound { id } => CoreError::NotFound(id),
            LifecycleError::AlreadyExists { id } => CoreError::AlreadyExists(id),
            LifecycleError::Disabled { id } => CoreError::DeploymentDisabled(id),
            LifecycleError::InvalidContainers { source, .. } => CoreError::InvalidContainers(source),
            LifecycleError::Scheduling {
                id,
                source,
                disabled,
                diagnostics,
            } => CoreError::Scheduling {
                id,
                source,
                disabled,
                diagnostics,
            },
            LifecycleError::Store { source } => CoreError::Store(source),
        }
    }
}

pub struct DeploymentFacade<S: ?Sized, D: ?Sized, T: ?Sized> {
    lifecycle: DeploymentLifecycle<S, D, T>,
    registries: HashMap<RegistryProvider, Arc<dyn RegistryClient>>,
    translator: RegistryErrorTranslator,
    managed_dns_zone: String,
}

impl<S, D, T> DeploymentFacade<S, D, T>
where
    S: DeploymentStore + ?Sized,
    D: ContainerDriver + ?Sized,
    T: TaskScheduler + ?Sized,
{
    pub fn new(lifecycle: DeploymentLifecycle<S, D, T>, managed_dns_zone: impl Into<String>) -> Self {
        Self {
            lifecycle,
            registries: HashMap::new(),
            translator: RegistryErrorTranslator::default(),
            managed_dns_zone: managed_dns_zone.into(),
        }
    }

    /// Wire collaborators using the loaded configuration.
    pub fn from_config(
        config: &Config,
        store: Arc<S>,
        driver: Arc<D>,
        scheduler: Arc<T>,
    ) -> crate::error::Result<Self> {
        let lifecycle = DeploymentLifecycle::with_settings(
            store,
            driver,
            scheduler,
            CleanupSettings::from(&config.cleanup),
        );

        Ok(Self {
            lifecycle,
            registries: clients_from_config(config)?,
            translator: RegistryErrorTranslator::new(config.registry_error_template.clone()),
            managed_dns_zone: config.managed_dns_zone.clone(),
        })
    }

    pub fn with_registry(mut self, client: Arc<dyn RegistryClient>) -> Self {
        self.registries.insert(client.provider(), client);
        self
    }

    pub fn with_translator(mut self, translator: RegistryErrorTranslator) -> Self {
        self.translator = translator;
        self
    }

    pub fn lifecycle(&self) -> &DeploymentLifecycle<S, D, T> {
        &self.lifecycle
    }

    /// Validate containers, check their images, and store the deployment as `active`.
    pub async fn create_deployment(&self, new: NewDeployment) -> Result<Deployment, CoreError> {
        let containers = ContainerSet::new(new.containers)?;
        self.check_images(containers.iter()).await?;

        let deployment = Deployment::new(
            new.id,
            new.kind,
            new.creation_source,
            new.subdomain,
            containers,
        );
        Ok(self.lifecycle.register(deployment).await?)
    }

    /// Append containers after the same checks as creation.
    pub async fn add_containers(
        &self,
        id: &DeploymentId,
        containers: Vec<Container>,
    ) -> Result<Deployment, CoreError> {
        let current = self.lifecycle.get(id).await?;
        if current.state() == DeploymentState::Disabled {
            return Err(CoreError::DeploymentDisabled(id.clone()));
        }
        current.containers().clone().extend(containers.clone())?;
        self.check_images(containers.iter()).await?;

        Ok(self.lifecycle.append_containers(id, containers).await?)
    }

    pub async fn validate_credentials(
        &self,
        provider: RegistryProvider,
    ) -> Result<RegistryResponse, CoreError> {
        let client = self.client_for(provider)?;
        client
            .perform_action(&RegistryAction::ValidateCredentials)
            .await
            .map_err(|failure| self.translate_failure(&failure))
    }

    /// Normalize a registry failure obtained outside the facade.
    pub fn translate_failure(&self, failure: &RawRegistryFailure) -> CoreError {
        let result = self.translator.translate(failure);
        tracing::debug!(status = failure.status, errors = %result, "registry failure translated");
        CoreError::RegistryUnprocessable(result)
    }

    pub async fn get(&self, id: &DeploymentId) -> Result<Deployment, CoreError> {
        Ok(self.lifecycle.get(id).await?)
    }

    pub async fn activate(&self, id: &DeploymentId) -> Result<TransitionOutcome, CoreError> {
        Ok(self.lifecycle.activate(id).await?)
    }

    pub async fn fail(&self, id: &DeploymentId) -> Result<TransitionOutcome, CoreError> {
        Ok(self.lifecycle.fail(id).await?)
    }

    pub async fn disable(&self, id: &DeploymentId) -> Result<TransitionOutcome, CoreError> {
        Ok(self.lifecycle.disable(id).await?)
    }

    pub async fn clean(&self, id: &DeploymentId) -> Result<CleanupReport, CoreError> {
        Ok(self.lifecycle.clean(id).await?)
    }

    pub async fn remove(&self, id: &DeploymentId) -> Result<RemovalOutcome, CoreError> {
        Ok(self.lifecycle.remove(id).await?)
    }

    pub fn preview_url(&self, deployment: &Deployment) -> String {
        deployment.preview_url(&self.managed_dns_zone)
    }

    fn client_for(&self, provider: RegistryProvider) -> Result<&Arc<dyn RegistryClient>, CoreError> {
        self.registries
            .get(&provider)
            .ok_or(CoreError::RegistryNotConfigured(provider))
    }

    async fn check_images<'a>(
        &self,
        containers: impl Iterator<Item = &'a Container>,
    ) -> Result<(), CoreError> {
        for container in containers {
            let Some(provider) = container.registry else {
                continue;
            };
            let client = self.client_for(provider)?;
            client
                .perform_action(&RegistryAction::CheckImage(container.image.clone()))
                .await
                .map_err(|failure| self.translate_failure(&failure))?;
        }
        Ok(())
    }
}
