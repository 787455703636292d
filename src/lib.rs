// ABOUTME: Library root for vitrine - preview deployment lifecycle and registry error handling.
// ABOUTME: Exposes the facade plus the collaborator traits it is wired with.

pub mod config;
pub mod container;
pub mod deployment;
pub mod diagnostics;
pub mod error;
pub mod facade;
pub mod registry;
pub mod runtime;
pub mod scheduler;
pub mod store;
pub mod telemetry;
pub mod types;

pub use facade::{CoreError, DeploymentFacade, ErrorClass, NewDeployment};
