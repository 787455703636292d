// ABOUTME: Registry provider variants and their request/response conventions.
// ABOUTME: Rewrites provider-specific failure bodies into the distribution `errors` shape.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::fmt;

use crate::types::ImageRef;

/// Registry backends a deployment's images can live in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistryProvider {
    /// Docker Hub and Docker-Hub-compatible registries.
    DockerHub,
    /// Amazon Elastic Container Registry.
    Ecr,
    /// GitHub Container Registry.
    Ghcr,
}

impl RegistryProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            RegistryProvider::DockerHub => "docker_hub",
            RegistryProvider::Ecr => "ecr",
            RegistryProvider::Ghcr => "ghcr",
        }
    }

    /// `Authorization` header value for a pre-issued token.
    ///
    /// ECR authorization tokens are already base64 `AWS:<password>` pairs and
    /// travel as Basic credentials; the others are bearer tokens.
    pub fn authorization(&self, token: &str) -> String {
        match self {
            RegistryProvider::Ecr => format!("Basic {token}"),
            RegistryProvider::DockerHub | RegistryProvider::Ghcr => format!("Bearer {token}"),
        }
    }

    /// Repository path used in `/v2/<repository>/...` URLs.
    pub fn repository_path(&self, image: &ImageRef) -> String {
        match self {
            RegistryProvider::DockerHub if !image.name().contains('/') => {
                format!("library/{}", image.name())
            }
            _ => image.name().to_string(),
        }
    }

    /// Assemble a failure body into `{"errors":[{code,message,detail}]}`.
    ///
    /// Bodies that already carry `errors`, are empty, or are not JSON pass
    /// through untouched and are left to the translator.
    pub fn failure_body(&self, status: u16, body: &str) -> String {
        let trimmed = body.trim();
        if trimmed.is_empty() {
            return String::new();
        }

        let Ok(value) = serde_json::from_str::<Value>(trimmed) else {
            return body.to_string();
        };
        if value.get("errors").is_some() {
            return body.to_string();
        }

        let entry = match self {
            RegistryProvider::DockerHub => docker_hub_entry(status, &value),
            RegistryProvider::Ecr => ecr_entry(&value),
            RegistryProvider::Ghcr => None,
        };

        match entry {
            Some(entry) => json!({ "errors": [entry] }).to_string(),
            None => body.to_string(),
        }
    }
}

impl fmt::Display for RegistryProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Docker Hub's account API answers `{"message": ..., "errinfo": {...}}` or
/// `{"detail": ...}` instead of distribution errors.
fn docker_hub_entry(status: u16, value: &Value) -> Option<Value> {
    let message = value
        .get("message")
        .or_else(|| value.get("detail"))
        .and_then(Value::as_str)?;

    Some(json!({
        "code": distribution_code(status),
        "message": message,
        "detail": value.get("errinfo").cloned().unwrap_or(Value::Null),
    }))
}

/// ECR's AWS JSON protocol reports `{"__type": "ns#Name", "message": ...}`.
fn ecr_entry(value: &Value) -> Option<Value> {
    let error_type = value.get("__type").and_then(Value::as_str)?;
    let code = error_type.rsplit('#').next().unwrap_or(error_type);
    let message = value
        .get("message")
        .or_else(|| value.get("Message"))
        .and_then(Value::as_str)
        .unwrap_or_default();

    Some(json!({
        "code": code,
        "message": message,
        "detail": Value::Null,
    }))
}

/// OCI distribution error code closest to an HTTP status.
fn distribution_code(status: u16) -> &'static str {
    match status {
        401 => "UNAUTHORIZED",
        403 => "DENIED",
        404 => "NAME_UNKNOWN",
        429 => "TOOMANYREQUESTS",
        _ => "UNKNOWN",
    }
}
