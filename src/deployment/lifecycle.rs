// ABOUTME: Drives deployment state changes and their side effects.
// ABOUTME: Checks the transition first, then disables containers, saves, and schedules deletion.

use chrono::Utc;
use snafu::ResultExt;
use std::sync::Arc;

use super::deployment::Deployment;
use super::error::{LifecycleError, TransitionSnafu};
use super::lock::DeploymentLocks;
use super::state::{DeploymentState, LifecycleEvent};
use super::transitions::{runs_cleanup, transition};
use crate::config::CleanupConfig;
use crate::container::{Container, ContainerDriver, DisableOutcome};
use crate::diagnostics::{Diagnostics, Warning};
use crate::scheduler::{TaskHandle, TaskScheduler};
use crate::store::DeploymentStore;
use crate::types::DeploymentId;

#[derive(Debug, Clone, Copy)]
pub struct CleanupSettings {
    pub max_parallel_disables: usize,
}

impl Default for CleanupSettings {
    fn default() -> Self {
        Self {
            max_parallel_disables: 4,
        }
    }
}

impl From<&CleanupConfig> for CleanupSettings {
    fn from(config: &CleanupConfig) -> Self {
        Self {
            max_parallel_disables: config.max_parallel_disables,
        }
    }
}

/// What one cleanup run did.
#[derive(Debug, Clone)]
pub struct CleanupReport {
    pub disabled: DisableOutcome,
    pub task: TaskHandle,
    pub diagnostics: Diagnostics,
}

/// Result of a successful lifecycle event.
#[derive(Debug, Clone)]
pub struct TransitionOutcome {
    /// The record as saved after the event.
    pub deployment: Deployment,
    pub event: LifecycleEvent,
    pub from: DeploymentState,
    /// Present when the event tore the deployment down.
    pub cleanup: Option<CleanupReport>,
}

/// Result of permanently removing a deployment.
#[derive(Debug, Clone)]
pub struct RemovalOutcome {
    /// The record as it was when removed.
    pub deployment: Deployment,
    pub cleanup: CleanupReport,
}

/// Owns deployment state. All state changes go through here.
pub struct DeploymentLifecycle<S: ?Sized, D: ?Sized, T: ?Sized> {
    store: Arc<S>,
    driver: Arc<D>,
    scheduler: Arc<T>,
    locks: DeploymentLocks,
    settings: CleanupSettings,
}

impl<S, D, T> DeploymentLifecycle<S, D, T>
where
    S: DeploymentStore + ?Sized,
    D: ContainerDriver + ?Sized,
    T: TaskScheduler + ?Sized,
{
    pub fn new(store: Arc<S>, driver: Arc<D>, scheduler: Arc<T>) -> Self {
        Self::with_settings(store, driver, scheduler, CleanupSettings::default())
    }

    pub fn with_settings(
        store: Arc<S>,
        driver: Arc<D>,
        scheduler: Arc<T>,
        settings: CleanupSettings,
    ) -> Self {
        Self {
            store,
            driver,
            scheduler,
            locks: DeploymentLocks::new(),
            settings,
        }
    }

    pub async fn get(&self, id: &DeploymentId) -> Result<Deployment, LifecycleError> {
        self.store
            .get(id)
            .await?
            .ok_or_else(|| LifecycleError::NotFound { id: id.clone() })
    }

    /// Save a new deployment. Fails if the id is taken.
    pub async fn register(&self, deployment: Deployment) -> Result<Deployment, LifecycleError> {
        let id = deployment.id().clone();
        let _guard = self.locks.acquire(&id).await;

        if self.store.get(&id).await?.is_some() {
            return Err(LifecycleError::AlreadyExists { id });
        }
        self.store.put(&deployment).await?;

        tracing::info!(
            deployment = %id,
            kind = %deployment.kind(),
            compose = deployment.creation_source().is_compose(),
            "deployment created"
        );
        Ok(deployment)
    }

    /// Add containers to an existing deployment, all or none.
    ///
    /// A disabled deployment takes no new containers.
    pub async fn append_containers(
        &self,
        id: &DeploymentId,
        containers: Vec<Container>,
    ) -> Result<Deployment, LifecycleError> {
        let _guard = self.locks.acquire(id).await;
        let mut deployment = self.get(id).await?;
        if deployment.state() == DeploymentState::Disabled {
            return Err(LifecycleError::Disabled { id: id.clone() });
        }

        deployment
            .containers_mut()
            .extend(containers)
            .map_err(|source| LifecycleError::InvalidContainers {
                id: id.clone(),
                source,
            })?;
        self.store.put(&deployment).await?;

        Ok(deployment)
    }

    pub async fn activate(&self, id: &DeploymentId) -> Result<TransitionOutcome, LifecycleError> {
        self.apply(id, LifecycleEvent::Activate).await
    }

    pub async fn fail(&self, id: &DeploymentId) -> Result<TransitionOutcome, LifecycleError> {
        self.apply(id, LifecycleEvent::Fail).await
    }

    pub async fn disable(&self, id: &DeploymentId) -> Result<TransitionOutcome, LifecycleError> {
        self.apply(id, LifecycleEvent::Disable).await
    }

    /// Fire `event` on the deployment.
    ///
    /// A rejected event changes nothing. For `Disable`, containers are torn
    /// down before `disabled_at` is stamped; if the deletion task cannot be
    /// queued afterwards the new state is still saved and
    /// `LifecycleError::Scheduling` is returned.
    ///
    /// If saving fails after a `Disable` already stopped containers, the stored
    /// record keeps its previous state and the retryable store error is
    /// returned. Repeating the event converges: stopped containers are
    /// reported as disabled by the driver.
    pub async fn apply(
        &self,
        id: &DeploymentId,
        event: LifecycleEvent,
    ) -> Result<TransitionOutcome, LifecycleError> {
        let _guard = self.locks.acquire(id).await;
        let mut deployment = self.get(id).await?;
        let from = deployment.state();

        transition(from, event).context(TransitionSnafu { id: id.clone() })?;

        let disabled = if runs_cleanup(event) {
            Some(self.disable_containers(&mut deployment).await)
        } else {
            None
        };

        let to = deployment
            .apply_event(event, Utc::now())
            .context(TransitionSnafu { id: id.clone() })?;
        if let Err(e) = self.store.put(&deployment).await {
            tracing::error!(deployment = %id, %event, "deployment state not saved: {e}");
            return Err(e.into());
        }

        tracing::info!(deployment = %id, %event, %from, %to, "deployment transitioned");

        let cleanup = match disabled {
            Some(disabled) => Some(self.schedule_deletion(id, disabled).await?),
            None => None,
        };

        Ok(TransitionOutcome {
            deployment,
            event,
            from,
            cleanup,
        })
    }

    /// Run cleanup without changing state.
    ///
    /// Safe to repeat: disabled containers are skipped and a pending deletion
    /// is reused.
    pub async fn clean(&self, id: &DeploymentId) -> Result<CleanupReport, LifecycleError> {
        let _guard = self.locks.acquire(id).await;
        let mut deployment = self.get(id).await?;

        let disabled = self.disable_containers(&mut deployment).await;
        self.store.put(&deployment).await?;

        self.schedule_deletion(id, disabled).await
    }

    /// Permanently delete the record, then clean up what it owned.
    ///
    /// Cleanup runs whatever state the deployment was in. If the deletion task
    /// cannot be queued the record is put back, with its containers as
    /// disabled as the driver left them, so a later `remove` or `clean` can
    /// retry the enqueue.
    pub async fn remove(&self, id: &DeploymentId) -> Result<RemovalOutcome, LifecycleError> {
        let _guard = self.locks.acquire(id).await;
        let mut deployment = self
            .store
            .remove(id)
            .await?
            .ok_or_else(|| LifecycleError::NotFound { id: id.clone() })?;

        tracing::info!(deployment = %id, state = %deployment.state(), "deployment removed");

        let disabled = self.disable_containers(&mut deployment).await;
        match self.schedule_deletion(id, disabled).await {
            Ok(cleanup) => Ok(RemovalOutcome {
                deployment,
                cleanup,
            }),
            Err(err) => {
                tracing::warn!(deployment = %id, "restoring removed deployment until deletion is queued");
                self.store.put(&deployment).await?;
                Err(err)
            }
        }
    }

    async fn disable_containers(&self, deployment: &mut Deployment) -> DisableOutcome {
        deployment
            .containers_mut()
            .disable_all(&*self.driver, self.settings.max_parallel_disables)
            .await
    }

    async fn schedule_deletion(
        &self,
        id: &DeploymentId,
        disabled: DisableOutcome,
    ) -> Result<CleanupReport, LifecycleError> {
        let mut diagnostics = Diagnostics::default();
        for failure in &disabled.failures {
            diagnostics.warn(Warning::container_disable(format!(
                "deployment {id}: container {} still running: {}",
                failure.container_id, failure.error
            )));
        }

        match self.scheduler.enqueue_deletion(id).await {
            Ok(task) => Ok(CleanupReport {
                disabled,
                task,
                diagnostics,
            }),
            Err(source) => {
                tracing::error!(deployment = %id, "deletion not scheduled: {source}");
                diagnostics.warn(Warning::deletion_pending(format!(
                    "deployment {id}: deletion not scheduled, retry cleanup: {source}"
                )));
                Err(LifecycleError::Scheduling {
                    id: id.clone(),
                    source,
                    disabled,
                    diagnostics,
                })
            }
        }
    }
}
