use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::docker::RuntimeError;

/// Host-wide parameters applied to every product container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchSettings {
    pub network: String,
    pub memory_limit: String,
    pub stop_timeout: Duration,
}

impl Default for LaunchSettings {
    fn default() -> Self {
        Self {
            network: "garfenter-network".to_string(),
            memory_limit: "512m".to_string(),
            stop_timeout: Duration::from_secs(10),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivationStatus {
    /// A fresh container was created and started.
    Starting,
    /// The container was already running; nothing was touched.
    Running,
}

/// Result of a successful activation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activation {
    pub status: ActivationStatus,
    pub image: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductStatus {
    pub running: bool,
    pub image: String,
}

/// Status of every catalog product, keyed by product key.
pub type StatusReport = BTreeMap<String, ProductStatus>;

#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error("unknown product: {0}")]
    UnknownProduct(String),
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}
