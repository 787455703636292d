// ABOUTME: Type-safe identifiers and validated domain types.
// ABOUTME: Uses phantom types to prevent ID confusion at compile time.

mod id;
mod image_ref;
mod subdomain;

pub use id::{ContainerId, DeploymentId, Id, TaskId};
pub use image_ref::{ImageRef, ParseImageRefError};
pub(crate) use subdomain::validate_label;
pub use subdomain::{Subdomain, SubdomainError};
