use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

/// One row of the workflow product table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowProduct {
    /// Short key; also used for the file name and container name.
    pub name: String,
    pub display: String,
    /// Upstream image reference, or `build` to build from the repository.
    pub image: String,
    pub port: u16,
    pub health_path: String,
}

/// Parse and validate a YAML product table.
pub fn parse_products(raw: &str) -> Result<Vec<WorkflowProduct>> {
    let products: Vec<WorkflowProduct> =
        serde_yaml::from_str(raw).context("invalid workflow product table")?;
    validate(&products)?;
    Ok(products)
}

pub fn load_products(path: &Path) -> Result<Vec<WorkflowProduct>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    parse_products(&raw).with_context(|| format!("in {}", path.display()))
}

fn validate(products: &[WorkflowProduct]) -> Result<()> {
    if products.is_empty() {
        bail!("workflow product table is empty");
    }

    let mut seen = HashSet::new();
    for product in products {
        let valid_name = !product.name.is_empty()
            && product
                .name
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
        if !valid_name {
            bail!(
                "product name {:?} must be non-empty lowercase letters, digits or '-'",
                product.name
            );
        }
        if !seen.insert(product.name.as_str()) {
            bail!("duplicate product name {:?}", product.name);
        }
        if product.display.trim().is_empty() || product.image.trim().is_empty() {
            bail!("product {:?} needs a display name and an image", product.name);
        }
        if !product.health_path.starts_with('/') {
            bail!(
                "product {:?}: health_path must start with '/', got {:?}",
                product.name,
                product.health_path
            );
        }
    }
    Ok(())
}
