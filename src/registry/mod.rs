// ABOUTME: Registry access and failure normalization.
// ABOUTME: Clients per provider, the HTTP transport, and the provider-agnostic error translator.

pub mod client;
pub mod provider;
pub mod result;
pub mod transport;
pub mod translator;

pub use client::{
    HttpRegistryClient, RawRegistryFailure, RegistryAction, RegistryClient, RegistryResponse,
};
pub use provider::RegistryProvider;
pub use result::{RegistryErrorEntry, RegistryErrorResult};
pub use translator::RegistryErrorTranslator;
pub use transport::{HttpRequest, HttpResponse, HttpTransport, ReqwestTransport, TransportError};

use std::collections::HashMap;
use std::sync::Arc;

use crate::config::Config;
use crate::error::{Error, Result};

/// Build one HTTP client per configured registry, resolving tokens now.
pub fn clients_from_config(
    config: &Config,
) -> Result<HashMap<RegistryProvider, Arc<dyn RegistryClient>>> {
    let mut clients: HashMap<RegistryProvider, Arc<dyn RegistryClient>> = HashMap::new();
    if config.registries.is_empty() {
        return Ok(clients);
    }

    // One connection pool shared by every provider.
    let transport = ReqwestTransport::new(config.request_timeout)
        .map_err(|e| Error::HttpClient(e.to_string()))?;

    for endpoint in &config.registries {
        let mut client =
            HttpRegistryClient::new(endpoint.provider, endpoint.url.clone(), transport.clone());
        if let Some(token) = endpoint.resolve_token()? {
            client = client.with_token(token);
        }
        clients.insert(endpoint.provider, Arc::new(client));
    }

    Ok(clients)
}
