// ABOUTME: Configuration types and parsing for vitrine.yml.
// ABOUTME: Handles YAML parsing, defaults, and validation of lifecycle and registry settings.

mod deserialize;
mod env_value;
mod registry;

pub use env_value::EnvValue;
pub use registry::RegistryEndpoint;

use crate::error::{Error, Result};
use crate::registry::translator::DEFAULT_ERROR_TEMPLATE;
use deserialize::{deserialize_dns_zone, deserialize_registries};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

pub const CONFIG_FILENAME: &str = "vitrine.yml";
pub const CONFIG_FILENAME_ALT: &str = "vitrine.yaml";
pub const CONFIG_FILENAME_DIR: &str = ".vitrine/config.yml";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Zone preview URLs are built under.
    #[serde(deserialize_with = "deserialize_dns_zone")]
    pub managed_dns_zone: String,

    #[serde(default = "default_error_template")]
    pub registry_error_template: String,

    #[serde(default = "default_request_timeout", with = "humantime_serde")]
    pub request_timeout: Duration,

    #[serde(default)]
    pub cleanup: CleanupConfig,

    #[serde(default)]
    pub scheduler: SchedulerConfig,

    #[serde(default, deserialize_with = "deserialize_registries")]
    pub registries: Vec<RegistryEndpoint>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CleanupConfig {
    #[serde(default = "default_max_parallel_disables")]
    pub max_parallel_disables: usize,

    /// Grace period the runtime gives a container before killing it.
    #[serde(default = "default_stop_timeout", with = "humantime_serde")]
    pub stop_timeout: Duration,
}

impl Default for CleanupConfig {
    fn default() -> Self {
        Self {
            max_parallel_disables: default_max_parallel_disables(),
            stop_timeout: default_stop_timeout(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SchedulerConfig {
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            queue_capacity: default_queue_capacity(),
        }
    }
}

fn default_error_template() -> String {
    DEFAULT_ERROR_TEMPLATE.to_string()
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_max_parallel_disables() -> usize {
    4
}

fn default_stop_timeout() -> Duration {
    Duration::from_secs(10)
}

fn default_queue_capacity() -> usize {
    256
}

impl Config {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn discover(dir: &Path) -> Result<Self> {
        let candidates = [
            dir.join(CONFIG_FILENAME),
            dir.join(CONFIG_FILENAME_ALT),
            dir.join(CONFIG_FILENAME_DIR),
        ];

        for path in &candidates {
            if path.exists() {
                tracing::debug!(path = %path.display(), "loading configuration");
                return Self::load(path);
            }
        }

        Err(Error::ConfigNotFound(dir.to_path_buf()))
    }

    fn validate(&self) -> Result<()> {
        if !self.registry_error_template.contains("{status}") {
            return Err(Error::InvalidConfig(
                "registry_error_template must contain {status}".to_string(),
            ));
        }
        if self.cleanup.max_parallel_disables == 0 {
            return Err(Error::InvalidConfig(
                "cleanup.max_parallel_disables must be at least 1".to_string(),
            ));
        }
        if self.scheduler.queue_capacity == 0 {
            return Err(Error::InvalidConfig(
                "scheduler.queue_capacity must be at least 1".to_string(),
            ));
        }
        if self.request_timeout.is_zero() {
            return Err(Error::InvalidConfig(
                "request_timeout must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
