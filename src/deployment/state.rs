// ABOUTME: Deployment lifecycle states, events, and immutable classification enums.
// ABOUTME: All serialize as snake_case strings.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of a deployment.
///
/// No state is terminal: `disabled` deployments can be activated again.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeploymentState {
    /// Serving traffic. Initial state.
    #[default]
    Active,
    /// Something went wrong; containers may still exist.
    Failed,
    /// Torn down; containers disabled and deletion scheduled.
    Disabled,
}

impl DeploymentState {
    pub const ALL: [DeploymentState; 3] = [
        DeploymentState::Active,
        DeploymentState::Failed,
        DeploymentState::Disabled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DeploymentState::Active => "active",
            DeploymentState::Failed => "failed",
            DeploymentState::Disabled => "disabled",
        }
    }
}

impl fmt::Display for DeploymentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Named events that move a deployment between states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleEvent {
    Activate,
    Fail,
    Disable,
}

impl LifecycleEvent {
    pub const ALL: [LifecycleEvent; 3] = [
        LifecycleEvent::Activate,
        LifecycleEvent::Fail,
        LifecycleEvent::Disable,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LifecycleEvent::Activate => "activate",
            LifecycleEvent::Fail => "fail",
            LifecycleEvent::Disable => "disable",
        }
    }
}

impl fmt::Display for LifecycleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resource tier of a deployment. Fixed at creation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeploymentKind {
    #[default]
    Standard,
    Performance,
    Enterprise,
    Free,
}

impl DeploymentKind {
    pub const ALL: [DeploymentKind; 4] = [
        DeploymentKind::Standard,
        DeploymentKind::Performance,
        DeploymentKind::Enterprise,
        DeploymentKind::Free,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DeploymentKind::Standard => "standard",
            DeploymentKind::Performance => "performance",
            DeploymentKind::Enterprise => "enterprise",
            DeploymentKind::Free => "free",
        }
    }
}

impl fmt::Display for DeploymentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a deployment came into existence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreationSource {
    #[default]
    Manual,
    Demo,
    ContinuousPreview,
    ComposeFileManual,
    ComposeFileContinuousPreview,
}

impl CreationSource {
    pub const ALL: [CreationSource; 5] = [
        CreationSource::Manual,
        CreationSource::Demo,
        CreationSource::ContinuousPreview,
        CreationSource::ComposeFileManual,
        CreationSource::ComposeFileContinuousPreview,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CreationSource::Manual => "manual",
            CreationSource::Demo => "demo",
            CreationSource::ContinuousPreview => "continuous_preview",
            CreationSource::ComposeFileManual => "compose_file_manual",
            CreationSource::ComposeFileContinuousPreview => "compose_file_continuous_preview",
        }
    }

    /// Sources driven by a compose file rather than hand-picked containers.
    pub fn is_compose(&self) -> bool {
        matches!(
            self,
            CreationSource::ComposeFileManual | CreationSource::ComposeFileContinuousPreview
        )
    }
}

impl fmt::Display for CreationSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
