// ABOUTME: DNS label validation for preview subdomains.
// ABOUTME: Ensures subdomains follow RFC 1123 label requirements.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Longest label DNS allows.
const MAX_LABEL_LEN: usize = 63;

#[derive(Debug, Error)]
pub enum SubdomainError {
    #[error("subdomain cannot be empty")]
    Empty,

    #[error("subdomain exceeds maximum length of 63 characters")]
    TooLong,

    #[error("subdomain cannot start with a hyphen")]
    StartsWithHyphen,

    #[error("subdomain cannot end with a hyphen")]
    EndsWithHyphen,

    #[error("subdomain must be lowercase")]
    NotLowercase,

    #[error("invalid character in subdomain: '{0}'")]
    InvalidChar(char),
}

/// The leftmost label of a deployment's preview host name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Subdomain(String);

impl Subdomain {
    pub fn new(value: &str) -> Result<Self, SubdomainError> {
        validate_label(value)?;
        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Full preview host name under the given managed zone.
    pub fn within(&self, zone: &str) -> String {
        format!("{}.{}", self.0, zone.trim_end_matches('.'))
    }
}

/// Validate a single DNS label.
pub(crate) fn validate_label(value: &str) -> Result<(), SubdomainError> {
    if value.is_empty() {
        return Err(SubdomainError::Empty);
    }
    if value.len() > MAX_LABEL_LEN {
        return Err(SubdomainError::TooLong);
    }
    if value.starts_with('-') {
        return Err(SubdomainError::StartsWithHyphen);
    }
    if value.ends_with('-') {
        return Err(SubdomainError::EndsWithHyphen);
    }

    for c in value.chars() {
        if c.is_ascii_uppercase() {
            return Err(SubdomainError::NotLowercase);
        }
        if !c.is_ascii_lowercase() && !c.is_ascii_digit() && c != '-' {
            return Err(SubdomainError::InvalidChar(c));
        }
    }

    Ok(())
}

impl TryFrom<String> for Subdomain {
    type Error = SubdomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        validate_label(&value)?;
        Ok(Self(value))
    }
}

impl From<Subdomain> for String {
    fn from(value: Subdomain) -> Self {
        value.0
    }
}

impl fmt::Display for Subdomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
