// ABOUTME: Normalized registry error map returned to callers.
// ABOUTME: Serializes as `{code: [message, detail]}` inside an `errors` envelope.

use serde::ser::{SerializeSeq, Serializer};
use serde::Serialize;
use serde_json::{Value, json};
use std::collections::BTreeMap;
use std::fmt;

/// One normalized registry error: a message plus the detail payload as text.
///
/// Entries built from structured registry errors always carry a detail; the
/// status-code fallback carries only a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryErrorEntry {
    message: String,
    detail: Option<String>,
}

impl RegistryErrorEntry {
    pub fn new(message: impl Into<String>, detail: Option<String>) -> Self {
        Self {
            message: message.into(),
            detail,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn detail(&self) -> Option<&str> {
        self.detail.as_deref()
    }
}

impl Serialize for RegistryErrorEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = if self.detail.is_some() { 2 } else { 1 };
        let mut seq = serializer.serialize_seq(Some(len))?;
        seq.serialize_element(&self.message)?;
        if let Some(ref detail) = self.detail {
            seq.serialize_element(detail)?;
        }
        seq.end()
    }
}

/// Error key to entry mapping produced for one failed registry call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RegistryErrorResult {
    entries: BTreeMap<String, RegistryErrorEntry>,
}

impl RegistryErrorResult {
    /// Insert an entry, returning the one it replaced.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        entry: RegistryErrorEntry,
    ) -> Option<RegistryErrorEntry> {
        self.entries.insert(key.into(), entry)
    }

    pub fn get(&self, key: &str) -> Option<&RegistryErrorEntry> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RegistryErrorEntry)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// The caller-facing body: `{"errors": {<key>: [message, detail?]}}`.
    pub fn to_json(&self) -> Value {
        json!({ "errors": self })
    }
}

impl fmt::Display for RegistryErrorResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (key, entry) in &self.entries {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{key}: {}", entry.message)?;
            first = false;
        }
        Ok(())
    }
}
