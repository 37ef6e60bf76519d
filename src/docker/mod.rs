//! Container runtime boundary: docker CLI driver and an in-memory double.

mod commands;
pub mod engine;
#[cfg(any(test, feature = "testkit"))]
pub mod memory;
mod types;

use std::time::Duration;

pub use engine::DockerCli;
#[cfg(any(test, feature = "testkit"))]
pub use memory::{InMemoryRuntime, RuntimeCall};
pub use types::{ContainerSpec, ContainerState, RuntimeError};

/// The narrow set of container operations the launcher relies on.
///
/// Implementations are blocking; async callers should run them on a
/// blocking thread.
pub trait ContainerRuntime: Send + Sync {
    /// Create a container from `spec` and start it detached.
    fn create(&self, spec: &ContainerSpec) -> Result<(), RuntimeError>;

    /// Ask the container to stop, killing it after `timeout`.
    fn stop(&self, name: &str, timeout: Duration) -> Result<(), RuntimeError>;

    /// Remove the container object, whatever its state.
    fn remove(&self, name: &str) -> Result<(), RuntimeError>;

    /// Current state as reported by the runtime.
    fn state(&self, name: &str) -> Result<ContainerState, RuntimeError>;
}
