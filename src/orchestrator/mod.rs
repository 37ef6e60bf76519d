//! Single-active-product policy.
//!
//! At most one catalog product container is meant to run on the host.
//! [`Orchestrator::activate`] enforces that by stopping every other product
//! before starting the requested one. The sequence is not transactional: a
//! runtime failure after the other products were stopped leaves nothing
//! running, and that state is left for the operator to resolve by issuing
//! another start.

mod activate;
mod status;
mod types;

use std::sync::Arc;

use crate::catalog::{Catalog, ProductEntry};
use crate::docker::ContainerRuntime;

pub use types::{
    Activation, ActivationStatus, LaunchSettings, OrchestratorError, ProductStatus, StatusReport,
};

/// Applies the single-active-product policy to a catalog through a runtime.
#[derive(Clone)]
pub struct Orchestrator {
    catalog: Arc<Catalog>,
    runtime: Arc<dyn ContainerRuntime>,
    settings: LaunchSettings,
}

impl Orchestrator {
    pub fn new(
        catalog: Arc<Catalog>,
        runtime: Arc<dyn ContainerRuntime>,
        settings: LaunchSettings,
    ) -> Self {
        Self {
            catalog,
            runtime,
            settings,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    fn lookup(&self, key: &str) -> Result<&ProductEntry, OrchestratorError> {
        self.catalog
            .get(key)
            .ok_or_else(|| OrchestratorError::UnknownProduct(key.to_string()))
    }
}
