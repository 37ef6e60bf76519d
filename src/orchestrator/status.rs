use tracing::debug;

use super::{Orchestrator, OrchestratorError, ProductStatus, StatusReport};

impl Orchestrator {
    /// Whether the runtime reports `container` as running right now.
    ///
    /// Never fails: a missing container and an unreachable runtime both read
    /// as "not running". Callers cannot tell the two apart.
    pub fn is_running(&self, container: &str) -> bool {
        match self.runtime.state(container) {
            Ok(state) => state.is_running(),
            Err(e) => {
                debug!(container, error = %e, "probe failed; treating as not running");
                false
            }
        }
    }

    pub fn status(&self, key: &str) -> Result<ProductStatus, OrchestratorError> {
        let entry = self.lookup(key)?;
        Ok(ProductStatus {
            running: self.is_running(&entry.container_name),
            image: entry.image.clone(),
        })
    }

    /// Probe every catalog product once.
    pub fn status_all(&self) -> StatusReport {
        self.catalog
            .iter()
            .map(|entry| {
                let status = ProductStatus {
                    running: self.is_running(&entry.container_name),
                    image: entry.image.clone(),
                };
                (entry.key.clone(), status)
            })
            .collect()
    }
}
