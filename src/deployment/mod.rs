// ABOUTME: Deployment lifecycle: record, states, transition table, and the driver of side effects.
// ABOUTME: Exports the Deployment record and DeploymentLifecycle.

mod deployment;
mod error;
mod lifecycle;
mod lock;
mod state;
pub mod transitions;

pub use deployment::Deployment;
pub use error::{LifecycleError, LifecycleErrorKind};
pub use lifecycle::{
    CleanupReport, CleanupSettings, DeploymentLifecycle, RemovalOutcome, TransitionOutcome,
};
pub use lock::{DeploymentGuard, DeploymentLocks};
pub use state::{CreationSource, DeploymentKind, DeploymentState, LifecycleEvent};
pub use transitions::{InvalidTransition, transition};
