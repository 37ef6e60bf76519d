use tracing::{debug, error, info};

use super::{Activation, ActivationStatus, Orchestrator, OrchestratorError};
use crate::catalog::ProductEntry;
use crate::docker::{ContainerSpec, RuntimeError};

impl Orchestrator {
    /// Make `key` the only running product.
    ///
    /// Already running: returns [`ActivationStatus::Running`] and touches
    /// nothing. Otherwise stops every other product, clears any leftover
    /// container for `key`, and creates a fresh one.
    pub fn activate(&self, key: &str) -> Result<Activation, OrchestratorError> {
        let entry = self.lookup(key)?;

        if self.is_running(&entry.container_name) {
            debug!(product = key, "already running");
            return Ok(Activation {
                status: ActivationStatus::Running,
                image: entry.image.clone(),
            });
        }

        for other in self.catalog.iter().filter(|e| e.key != entry.key) {
            self.stop_container(&other.container_name);
        }

        // A crashed or exited instance would make the name conflict on create.
        self.stop_container(&entry.container_name);

        let spec = self.container_spec(entry);
        if let Err(e) = self.runtime.create(&spec) {
            error!(
                product = key,
                container = %spec.name,
                error = %e,
                "failed to start product"
            );
            return Err(e.into());
        }

        info!(
            product = key,
            container = %spec.name,
            image = %spec.image,
            "product starting"
        );
        Ok(Activation {
            status: ActivationStatus::Starting,
            image: entry.image.clone(),
        })
    }

    /// Stop and remove the container for `key`. Fails only for unknown keys.
    pub fn stop(&self, key: &str) -> Result<(), OrchestratorError> {
        let entry = self.lookup(key)?;
        self.stop_container(&entry.container_name);
        info!(product = key, container = %entry.container_name, "product stopped");
        Ok(())
    }

    /// Best-effort stop followed by removal. Both steps are attempted and
    /// their errors discarded: a product that was never started has nothing
    /// to stop, and `remove` is forced so a container that ignored the stop
    /// still goes away.
    fn stop_container(&self, container: &str) {
        if let Err(e) = self.runtime.stop(container, self.settings.stop_timeout) {
            log_ignored("stop", container, &e);
        }
        if let Err(e) = self.runtime.remove(container) {
            log_ignored("remove", container, &e);
        }
    }

    fn container_spec(&self, entry: &ProductEntry) -> ContainerSpec {
        ContainerSpec {
            name: entry.container_name.clone(),
            image: entry.image.clone(),
            network: self.settings.network.clone(),
            port: entry.port,
            env: entry.env.clone(),
            memory_limit: self.settings.memory_limit.clone(),
        }
    }
}

fn log_ignored(op: &str, container: &str, err: &RuntimeError) {
    match err {
        RuntimeError::NotFound(_) => debug!(container, op, "nothing to do"),
        other => debug!(container, op, error = %other, "ignored runtime error"),
    }
}
