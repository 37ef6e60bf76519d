//! Product catalog: the fixed set of products this host can run.

mod builtin;

use std::collections::{BTreeMap, HashSet};

use anyhow::{Result, bail};

pub use builtin::{Secrets, builtin_entries};

/// One launchable product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductEntry {
    pub key: String,
    pub container_name: String,
    pub port: u16,
    pub image: String,
    pub env: BTreeMap<String, String>,
}

/// Immutable, validated product table. Iteration follows insertion order.
#[derive(Debug, Clone)]
pub struct Catalog {
    entries: Vec<ProductEntry>,
}

impl Catalog {
    /// Build a catalog, rejecting blank or duplicate keys and container names.
    pub fn new(entries: Vec<ProductEntry>) -> Result<Self> {
        if entries.is_empty() {
            bail!("catalog must contain at least one product");
        }

        let mut keys = HashSet::new();
        let mut names = HashSet::new();
        for entry in &entries {
            if entry.key.trim().is_empty() {
                bail!("product key cannot be blank");
            }
            if entry.container_name.trim().is_empty() {
                bail!("product {:?} has a blank container name", entry.key);
            }
            if entry.image.trim().is_empty() {
                bail!("product {:?} has a blank image", entry.key);
            }
            if entry.port == 0 {
                bail!("product {:?} must publish a non-zero port", entry.key);
            }
            if !keys.insert(entry.key.as_str()) {
                bail!("duplicate product key {:?}", entry.key);
            }
            if !names.insert(entry.container_name.as_str()) {
                bail!(
                    "container name {:?} is used by more than one product",
                    entry.container_name
                );
            }
        }

        Ok(Self { entries })
    }

    /// The built-in product table with secrets filled in.
    pub fn builtin(secrets: &Secrets) -> Self {
        Self {
            entries: builtin_entries(secrets),
        }
    }

    pub fn get(&self, key: &str) -> Option<&ProductEntry> {
        self.entries.iter().find(|e| e.key == key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProductEntry> {
        self.entries.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.key.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
