use std::collections::BTreeMap;
use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::loader::expand_env;
use crate::catalog::{Catalog, ProductEntry, Secrets};
use crate::logging::LogFormat;
use crate::orchestrator::LaunchSettings;

/// A product declared in the config file. Env values may reference
/// environment variables as `${NAME}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductConfig {
    pub key: String,
    /// Defaults to `garfenter-<key>`.
    #[serde(default)]
    pub container: Option<String>,
    pub port: u16,
    pub image: String,
    #[serde(default)]
    pub env: BTreeMap<String, String>,
}

impl ProductConfig {
    fn resolve(&self, lookup: &impl Fn(&str) -> Option<String>) -> ProductEntry {
        ProductEntry {
            key: self.key.clone(),
            container_name: self
                .container
                .clone()
                .unwrap_or_else(|| format!("garfenter-{}", self.key)),
            port: self.port,
            image: self.image.clone(),
            env: self
                .env
                .iter()
                .map(|(k, v)| (k.clone(), expand_env(v, lookup)))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub listen: String,
    pub network: String,
    pub memory_limit: String,
    /// Seconds `docker stop` waits before killing.
    pub stop_timeout: u64,
    /// Command line used to reach docker, e.g. `sudo -n docker`.
    pub docker_command: String,
    pub log_level: String,
    pub log_format: LogFormat,
    /// Empty means the built-in catalog.
    pub products: Vec<ProductConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen: "0.0.0.0:5000".to_string(),
            network: "garfenter-network".to_string(),
            memory_limit: "512m".to_string(),
            stop_timeout: 10,
            docker_command: "docker".to_string(),
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            products: Vec::new(),
        }
    }
}

impl Config {
    /// Build the product catalog, resolving secrets through `lookup`.
    pub fn catalog(&self, lookup: impl Fn(&str) -> Option<String>) -> Result<Catalog> {
        if self.products.is_empty() {
            return Ok(Catalog::builtin(&Secrets::from_lookup(lookup)));
        }
        let entries = self.products.iter().map(|p| p.resolve(&lookup)).collect();
        Catalog::new(entries)
    }

    pub fn launch_settings(&self) -> LaunchSettings {
        LaunchSettings {
            network: self.network.clone(),
            memory_limit: self.memory_limit.clone(),
            stop_timeout: Duration::from_secs(self.stop_timeout),
        }
    }
}
