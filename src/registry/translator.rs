// ABOUTME: Provider-agnostic translation of raw registry failures.
// ABOUTME: Folds a distribution `errors` array into a keyed map, or falls back to a status message.

use serde_json::Value;

use super::client::RawRegistryFailure;
use super::result::{RegistryErrorEntry, RegistryErrorResult};

/// Key used when the registry gave nothing structured to report.
pub const FALLBACK_KEY: &str = "registry_error";

/// Default fallback message; `{status}` is replaced by the HTTP status code.
pub const DEFAULT_ERROR_TEMPLATE: &str = "registry call failed with status {status}";

/// Turns a `RawRegistryFailure` into a `RegistryErrorResult`.
///
/// Never fails: a body without an `errors` array collapses to a single
/// `registry_error` entry built from the status code. A present array is
/// always reduced, even when that leaves the map empty.
#[derive(Debug, Clone)]
pub struct RegistryErrorTranslator {
    template: String,
}

impl Default for RegistryErrorTranslator {
    fn default() -> Self {
        Self::new(DEFAULT_ERROR_TEMPLATE)
    }
}

impl RegistryErrorTranslator {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    pub fn translate(&self, failure: &RawRegistryFailure) -> RegistryErrorResult {
        match structured_errors(&failure.body) {
            Some(result) => result,
            None => self.fallback(failure.status),
        }
    }

    pub fn fallback(&self, status: u16) -> RegistryErrorResult {
        let mut result = RegistryErrorResult::default();
        result.insert(FALLBACK_KEY, RegistryErrorEntry::new(self.message_for(status), None));
        result
    }

    fn message_for(&self, status: u16) -> String {
        self.template.replace("{status}", &status.to_string())
    }
}

/// Reduce `{"errors": [...]}` into a map keyed by `code`.
///
/// Later entries overwrite earlier ones with the same code. Entries without a
/// code are skipped.
fn structured_errors(body: &str) -> Option<RegistryErrorResult> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }

    let value: Value = serde_json::from_str(body).ok()?;
    let errors = value.get("errors")?.as_array()?;

    let mut result = RegistryErrorResult::default();
    for error in errors {
        let Some(code) = error.get("code").and_then(text_of) else {
            tracing::debug!("skipping registry error entry without a code: {error}");
            continue;
        };
        let message = error.get("message").and_then(text_of).unwrap_or_default();
        let detail = error.get("detail").unwrap_or(&Value::Null).to_string();

        if result
            .insert(code.as_str(), RegistryErrorEntry::new(message, Some(detail)))
            .is_some()
        {
            tracing::debug!(code = %code, "duplicate registry error code, keeping the later entry");
        }
    }

    Some(result)
}

fn text_of(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
