//! In-memory [`ContainerRuntime`] for tests.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use super::ContainerRuntime;
use super::types::{ContainerSpec, ContainerState, RuntimeError};

/// One call observed by [`InMemoryRuntime`], in the order it happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuntimeCall {
    Create(String),
    Stop(String),
    Remove(String),
    State(String),
}

#[derive(Default)]
struct Inner {
    containers: BTreeMap<String, (ContainerSpec, ContainerState)>,
    calls: Vec<RuntimeCall>,
    create_error: Option<String>,
    unreachable: bool,
}

/// Tracks containers in a map and records every call. Behaves like the
/// docker daemon for the operations the launcher uses: `create` on an
/// existing name fails, `stop` leaves an exited container behind, `remove`
/// of an unknown name fails with [`RuntimeError::NotFound`].
#[derive(Default)]
pub struct InMemoryRuntime {
    inner: Mutex<Inner>,
}

impl InMemoryRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Seed a container in the given state without recording a call.
    pub fn insert(&self, spec: ContainerSpec, state: ContainerState) {
        self.lock()
            .containers
            .insert(spec.name.clone(), (spec, state));
    }

    /// Seed a running container with just a name and image.
    pub fn insert_running(&self, name: &str, image: &str) {
        self.insert(
            ContainerSpec {
                name: name.to_string(),
                image: image.to_string(),
                network: String::new(),
                port: 0,
                env: BTreeMap::new(),
                memory_limit: String::new(),
            },
            ContainerState::Running,
        );
    }

    /// Make every subsequent `create` fail with `message`.
    pub fn fail_create(&self, message: &str) {
        self.lock().create_error = Some(message.to_string());
    }

    /// Simulate a daemon that cannot be reached: every call fails.
    pub fn set_unreachable(&self, unreachable: bool) {
        self.lock().unreachable = unreachable;
    }

    pub fn calls(&self) -> Vec<RuntimeCall> {
        self.lock().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }

    /// Spec the named container was last created with, if it exists.
    pub fn spec_of(&self, name: &str) -> Option<ContainerSpec> {
        self.lock().containers.get(name).map(|(spec, _)| spec.clone())
    }

    pub fn running(&self) -> Vec<String> {
        self.lock()
            .containers
            .iter()
            .filter(|(_, (_, state))| state.is_running())
            .map(|(name, _)| name.clone())
            .collect()
    }
}

fn unreachable_error() -> RuntimeError {
    RuntimeError::Command {
        exit_code: Some(1),
        message: "Cannot connect to the Docker daemon".into(),
    }
}

impl ContainerRuntime for InMemoryRuntime {
    fn create(&self, spec: &ContainerSpec) -> Result<(), RuntimeError> {
        let mut inner = self.lock();
        inner.calls.push(RuntimeCall::Create(spec.name.clone()));
        if inner.unreachable {
            return Err(unreachable_error());
        }
        if let Some(message) = inner.create_error.clone() {
            return Err(RuntimeError::Command {
                exit_code: Some(125),
                message,
            });
        }
        if inner.containers.contains_key(&spec.name) {
            return Err(RuntimeError::Command {
                exit_code: Some(125),
                message: format!(
                    "Conflict. The container name \"/{}\" is already in use",
                    spec.name
                ),
            });
        }
        inner
            .containers
            .insert(spec.name.clone(), (spec.clone(), ContainerState::Running));
        Ok(())
    }

    fn stop(&self, name: &str, _timeout: Duration) -> Result<(), RuntimeError> {
        let mut inner = self.lock();
        inner.calls.push(RuntimeCall::Stop(name.to_string()));
        if inner.unreachable {
            return Err(unreachable_error());
        }
        match inner.containers.get_mut(name) {
            Some((_, state)) => {
                *state = ContainerState::Exited;
                Ok(())
            }
            None => Err(RuntimeError::NotFound(name.to_string())),
        }
    }

    fn remove(&self, name: &str) -> Result<(), RuntimeError> {
        let mut inner = self.lock();
        inner.calls.push(RuntimeCall::Remove(name.to_string()));
        if inner.unreachable {
            return Err(unreachable_error());
        }
        inner
            .containers
            .remove(name)
            .map(drop)
            .ok_or_else(|| RuntimeError::NotFound(name.to_string()))
    }

    fn state(&self, name: &str) -> Result<ContainerState, RuntimeError> {
        let mut inner = self.lock();
        inner.calls.push(RuntimeCall::State(name.to_string()));
        if inner.unreachable {
            return Err(unreachable_error());
        }
        inner
            .containers
            .get(name)
            .map(|(_, state)| state.clone())
            .ok_or_else(|| RuntimeError::NotFound(name.to_string()))
    }
}
