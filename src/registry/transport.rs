// ABOUTME: HTTP transport for registry calls, built on a shared reqwest client.
// ABOUTME: Connection failures and timeouts surface as bodiless registry failures.

use async_trait::async_trait;
use reqwest::{Method, Url};
use std::time::Duration;
use thiserror::Error;

use super::client::RawRegistryFailure;

#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
}

impl HttpRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            url: url.into(),
            headers: Vec::new(),
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("failed to build HTTP client: {0}")]
    Client(String),

    #[error("invalid registry url {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("connection to {host} failed: {reason}")]
    Connect { host: String, reason: String },

    #[error("registry request timed out after {0:?}")]
    Timeout(Duration),

    #[error("HTTP exchange failed: {0}")]
    Protocol(String),
}

impl TransportError {
    /// Status reported to the translator in place of a real response.
    pub fn status(&self) -> u16 {
        match self {
            TransportError::Timeout(_) => 504,
            _ => 502,
        }
    }
}

impl From<TransportError> for RawRegistryFailure {
    fn from(err: TransportError) -> Self {
        RawRegistryFailure {
            status: err.status(),
            body: String::new(),
        }
    }
}

#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// HTTP and HTTPS transport with a whole-request deadline. Redirects are followed.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http: reqwest::Client,
    timeout: Duration,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::Client(e.to_string()))?;
        Ok(Self { http, timeout })
    }

    fn parse_url(raw: &str) -> Result<Url, TransportError> {
        let url = Url::parse(raw).map_err(|e| TransportError::InvalidUrl {
            url: raw.to_string(),
            reason: e.to_string(),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(TransportError::InvalidUrl {
                url: raw.to_string(),
                reason: format!("unsupported scheme '{}'", url.scheme()),
            });
        }
        Ok(url)
    }

    fn map_error(&self, url: &Url, e: reqwest::Error) -> TransportError {
        if e.is_timeout() {
            TransportError::Timeout(self.timeout)
        } else if e.is_connect() {
            TransportError::Connect {
                host: url.host_str().unwrap_or_default().to_string(),
                reason: e.to_string(),
            }
        } else if e.is_builder() {
            TransportError::InvalidUrl {
                url: url.to_string(),
                reason: e.to_string(),
            }
        } else {
            TransportError::Protocol(e.to_string())
        }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        tracing::debug!(method = %request.method, url = %request.url, "registry request");
        let url = Self::parse_url(&request.url)?;

        let mut builder = self.http.request(request.method, url.clone());
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let resp = builder.send().await.map_err(|e| self.map_error(&url, e))?;
        let status = resp.status().as_u16();
        let body = resp.text().await.map_err(|e| self.map_error(&url, e))?;

        Ok(HttpResponse { status, body })
    }
}
