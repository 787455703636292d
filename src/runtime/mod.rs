// ABOUTME: Container runtime integration for Docker and Podman.
// ABOUTME: Provides the bollard-backed driver and deletion handler.

mod bollard;

pub use self::bollard::{BollardRuntime, DEPLOYMENT_LABEL};
