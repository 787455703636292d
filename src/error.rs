// ABOUTME: Setup-time errors for vitrine: configuration, secrets, and runtime connection.
// ABOUTME: Request-time failures use CoreError in the facade instead.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("no vitrine.yml, vitrine.yaml, or .vitrine/config.yml in {0}")]
    ConfigNotFound(PathBuf),

    #[error("environment variable {0} is not set and has no default")]
    MissingEnvVar(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("cannot reach container runtime: {0}")]
    RuntimeConnection(String),

    #[error("failed to build registry HTTP client: {0}")]
    HttpClient(String),

    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
