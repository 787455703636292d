// ABOUTME: Configured registry endpoints, one per provider.
// ABOUTME: Tokens stay unresolved until a client is built.

use serde::Deserialize;

use super::EnvValue;
use crate::error::Result;
use crate::registry::RegistryProvider;

#[derive(Debug, Clone, Deserialize)]
pub struct RegistryEndpoint {
    pub provider: RegistryProvider,

    /// Base URL, e.g. `http://registry.internal:5000`.
    pub url: String,

    #[serde(default)]
    pub token: Option<EnvValue>,
}

impl RegistryEndpoint {
    pub fn resolve_token(&self) -> Result<Option<String>> {
        self.token.as_ref().map(EnvValue::resolve).transpose()
    }
}
