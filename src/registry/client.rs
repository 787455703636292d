// ABOUTME: Registry client capability and its HTTP implementation.
// ABOUTME: Turns registry actions into distribution API calls and non-2xx replies into raw failures.

use async_trait::async_trait;

use super::provider::RegistryProvider;
use super::transport::{HttpRequest, HttpTransport};
use crate::types::ImageRef;

const MANIFEST_MEDIA_TYPES: &str = "application/vnd.oci.image.index.v1+json, \
application/vnd.oci.image.manifest.v1+json, \
application/vnd.docker.distribution.manifest.list.v2+json, \
application/vnd.docker.distribution.manifest.v2+json";

/// A registry call that did not succeed: status plus the raw body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRegistryFailure {
    pub status: u16,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryAction {
    /// Check that the configured token is accepted.
    ValidateCredentials,
    /// Check that the image's manifest exists.
    CheckImage(ImageRef),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryResponse {
    pub status: u16,
}

#[async_trait]
pub trait RegistryClient: Send + Sync {
    fn provider(&self) -> RegistryProvider;

    async fn perform_action(
        &self,
        action: &RegistryAction,
    ) -> Result<RegistryResponse, RawRegistryFailure>;
}

pub struct HttpRegistryClient<T> {
    provider: RegistryProvider,
    base_url: String,
    token: Option<String>,
    transport: T,
}

impl<T: HttpTransport> HttpRegistryClient<T> {
    pub fn new(provider: RegistryProvider, base_url: impl Into<String>, transport: T) -> Self {
        Self {
            provider,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
            transport,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn request_for(&self, action: &RegistryAction) -> HttpRequest {
        let request = match action {
            RegistryAction::ValidateCredentials => HttpRequest::get(format!("{}/v2/", self.base_url)),
            RegistryAction::CheckImage(image) => HttpRequest::get(format!(
                "{}/v2/{}/manifests/{}",
                self.base_url,
                self.provider.repository_path(image),
                image.manifest_reference()
            ))
            .header("Accept", MANIFEST_MEDIA_TYPES),
        };

        match self.token {
            Some(ref token) => request.header("Authorization", self.provider.authorization(token)),
            None => request,
        }
    }
}

#[async_trait]
impl<T: HttpTransport> RegistryClient for HttpRegistryClient<T> {
    fn provider(&self) -> RegistryProvider {
        self.provider
    }

    async fn perform_action(
        &self,
        action: &RegistryAction,
    ) -> Result<RegistryResponse, RawRegistryFailure> {
        let request = self.request_for(action);
        let response = self.transport.send(request).await.map_err(|e| {
            tracing::debug!(provider = %self.provider, "registry transport failed: {e}");
            RawRegistryFailure::from(e)
        })?;

        if (200..300).contains(&response.status) {
            return Ok(RegistryResponse {
                status: response.status,
            });
        }

        tracing::debug!(provider = %self.provider, status = response.status, "registry call failed");
        Err(RawRegistryFailure {
            status: response.status,
            body: self.provider.failure_body(response.status, &response.body),
        })
    }
}
