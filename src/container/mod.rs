// ABOUTME: Containers of a deployment and the driver that disables them.
// ABOUTME: Exposes Container, ContainerSet, and the ContainerDriver capability.

mod driver;
mod model;
mod set;

pub use driver::{ContainerDriver, DriverError};
pub use model::Container;
pub use set::{ContainerSet, ContainerSetError, DisableFailure, DisableOutcome};
