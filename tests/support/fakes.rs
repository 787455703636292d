// ABOUTME: In-process fakes for the driver, scheduler, deletion handler, and registry clients.
// ABOUTME: Each fake records what it was asked to do so tests can assert on side effects.

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use std::collections::{HashSet, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use vitrine::container::{Container, ContainerDriver, DriverError};
use vitrine::registry::{
    RawRegistryFailure, RegistryAction, RegistryClient, RegistryProvider, RegistryResponse,
};
use vitrine::scheduler::{
    DeletionError, DeletionHandler, SchedulingError, TaskHandle, TaskScheduler,
};
use vitrine::deployment::Deployment;
use vitrine::store::{DeploymentStore, InMemoryStore, StoreError};
use vitrine::types::{DeploymentId, TaskId};

// =============================================================================
// Container driver
// =============================================================================

/// Records disable calls; containers named in `failing` report an error.
#[derive(Default)]
pub struct RecordingDriver {
    calls: Mutex<Vec<String>>,
    failing: HashSet<String>,
    delay: Option<Duration>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl RecordingDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(names: &[&str]) -> Self {
        Self {
            failing: names.iter().map(|n| n.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Container names passed to `disable`, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    /// Highest number of concurrent `disable` calls observed.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ContainerDriver for RecordingDriver {
    async fn disable(&self, container: &Container) -> Result<(), DriverError> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.calls.lock().push(container.name.clone());
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.failing.contains(&container.name) {
            return Err(DriverError::DisableFailed {
                name: container.name.clone(),
                reason: "stop timed out".to_string(),
            });
        }
        Ok(())
    }
}

// =============================================================================
// Task scheduler
// =============================================================================

/// Accepts every enqueue unless switched to unavailable.
#[derive(Default)]
pub struct RecordingScheduler {
    enqueued: Mutex<Vec<DeploymentId>>,
    unavailable: AtomicBool,
}

impl RecordingScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn enqueued(&self) -> Vec<DeploymentId> {
        self.enqueued.lock().clone()
    }
}

#[async_trait]
impl TaskScheduler for RecordingScheduler {
    async fn enqueue_deletion(&self, id: &DeploymentId) -> Result<TaskHandle, SchedulingError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(SchedulingError::Unavailable);
        }
        let mut enqueued = self.enqueued.lock();
        enqueued.push(id.clone());
        Ok(TaskHandle {
            task_id: TaskId::new(format!("task-{}", enqueued.len())),
            deployment_id: id.clone(),
            enqueued_at: Utc::now(),
            duplicate: false,
        })
    }
}

// =============================================================================
// Deletion handler
// =============================================================================

/// Records deleted ids; ids in `failing` report an error.
#[derive(Default)]
pub struct RecordingDeletionHandler {
    deleted: Mutex<Vec<DeploymentId>>,
    failing: HashSet<String>,
}

impl RecordingDeletionHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(ids: &[&str]) -> Self {
        Self {
            failing: ids.iter().map(|n| n.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn deleted(&self) -> Vec<DeploymentId> {
        self.deleted.lock().clone()
    }
}

#[async_trait]
impl DeletionHandler for RecordingDeletionHandler {
    async fn delete(&self, id: &DeploymentId) -> Result<(), DeletionError> {
        self.deleted.lock().push(id.clone());
        if self.failing.contains(id.as_str()) {
            return Err(DeletionError::Failed {
                id: id.clone(),
                reason: "runtime refused".to_string(),
            });
        }
        Ok(())
    }
}

// =============================================================================
// Deployment store
// =============================================================================

/// In-memory store whose next `put` can be made to fail once.
#[derive(Default)]
pub struct FlakyStore {
    inner: InMemoryStore,
    fail_next_put: AtomicBool,
}

impl FlakyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_next_put(&self) {
        self.fail_next_put.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl DeploymentStore for FlakyStore {
    async fn get(&self, id: &DeploymentId) -> Result<Option<Deployment>, StoreError> {
        self.inner.get(id).await
    }

    async fn put(&self, deployment: &Deployment) -> Result<(), StoreError> {
        if self.fail_next_put.swap(false, Ordering::SeqCst) {
            return Err(StoreError::Unavailable("write rejected".to_string()));
        }
        self.inner.put(deployment).await
    }

    async fn remove(&self, id: &DeploymentId) -> Result<Option<Deployment>, StoreError> {
        self.inner.remove(id).await
    }
}

// =============================================================================
// Registry client
// =============================================================================

/// Replies from a script; once the script runs out every call succeeds.
pub struct StubRegistryClient {
    provider: RegistryProvider,
    replies: Mutex<VecDeque<Result<RegistryResponse, RawRegistryFailure>>>,
    actions: Mutex<Vec<RegistryAction>>,
}

impl StubRegistryClient {
    pub fn ok(provider: RegistryProvider) -> Self {
        Self {
            provider,
            replies: Mutex::new(VecDeque::new()),
            actions: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(provider: RegistryProvider, status: u16, body: &str) -> Self {
        let client = Self::ok(provider);
        client.replies.lock().push_back(Err(RawRegistryFailure {
            status,
            body: body.to_string(),
        }));
        client
    }

    pub fn actions(&self) -> Vec<RegistryAction> {
        self.actions.lock().clone()
    }
}

#[async_trait]
impl RegistryClient for StubRegistryClient {
    fn provider(&self) -> RegistryProvider {
        self.provider
    }

    async fn perform_action(
        &self,
        action: &RegistryAction,
    ) -> Result<RegistryResponse, RawRegistryFailure> {
        self.actions.lock().push(action.clone());
        self.replies
            .lock()
            .pop_front()
            .unwrap_or(Ok(RegistryResponse { status: 200 }))
    }
}
