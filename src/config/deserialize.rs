// ABOUTME: Custom serde deserializers for config types.
// ABOUTME: Handles the managed DNS zone and the registry list.

use serde::Deserialize;
use std::collections::HashSet;

use super::RegistryEndpoint;
use crate::types::validate_label;

pub fn deserialize_dns_zone<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    let zone = s.trim().trim_end_matches('.');
    if zone.is_empty() {
        return Err(serde::de::Error::custom("managed_dns_zone cannot be empty"));
    }

    for label in zone.split('.') {
        validate_label(label).map_err(|e| {
            serde::de::Error::custom(format!("invalid managed_dns_zone label '{label}': {e}"))
        })?;
    }

    Ok(zone.to_string())
}

pub fn deserialize_registries<'de, D>(deserializer: D) -> Result<Vec<RegistryEndpoint>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let endpoints: Vec<RegistryEndpoint> = Vec::deserialize(deserializer)?;

    let mut seen = HashSet::new();
    for endpoint in &endpoints {
        if !seen.insert(endpoint.provider) {
            return Err(serde::de::Error::custom(format!(
                "registry provider '{}' is configured more than once",
                endpoint.provider
            )));
        }
        if !(endpoint.url.starts_with("https://") || endpoint.url.starts_with("http://")) {
            return Err(serde::de::Error::custom(format!(
                "registry url for '{}' must start with https:// or http://",
                endpoint.provider
            )));
        }
    }

    Ok(endpoints)
}
