// ABOUTME: Diagnostics accumulator for non-fatal problems during cleanup.
// ABOUTME: Collects container disable failures and deferred deletions for operators.

/// Collects non-fatal warnings raised while cleaning up a deployment.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    warnings: Vec<Warning>,
}

impl Diagnostics {
    /// Record a warning, auto-logging it via tracing.
    pub fn warn(&mut self, warning: Warning) {
        tracing::warn!(kind = ?warning.kind, "{}", warning.message);
        self.warnings.push(warning);
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Warnings of one kind.
    pub fn of_kind(&self, kind: WarningKind) -> impl Iterator<Item = &Warning> {
        self.warnings.iter().filter(move |w| w.kind == kind)
    }
}

/// A non-fatal warning collected during cleanup.
#[derive(Debug, Clone)]
pub struct Warning {
    pub kind: WarningKind,
    pub message: String,
}

impl Warning {
    pub fn container_disable(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::ContainerDisable,
            message: message.into(),
        }
    }

    pub fn deletion_pending(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::DeletionPending,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    /// A container could not be disabled and is still running.
    ContainerDisable,
    /// Deletion could not be scheduled; the deployment needs a retried `clean`.
    DeletionPending,
}
