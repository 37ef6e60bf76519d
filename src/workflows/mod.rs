//! CI workflow rendering: one deployment workflow per product from a bundled template.

mod check;
mod render;
mod table;

use anyhow::{Context, Result};
use include_dir::{Dir, include_dir};

pub use check::{ChangeKind, DiffLine, FileDiff, check_outputs};
pub use render::{RenderedWorkflow, render, render_all, write_all};
pub use table::{WorkflowProduct, load_products, parse_products};

static TEMPLATES: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/templates");

fn bundled(name: &str) -> Result<&'static str> {
    TEMPLATES
        .get_file(name)
        .and_then(|f| f.contents_utf8())
        .with_context(|| format!("bundled file {name} is missing or not UTF-8"))
}

/// The deployment workflow template shipped with the binary.
pub fn builtin_template() -> Result<&'static str> {
    bundled("deploy-workflow.yml")
}

/// The product table shipped with the binary.
pub fn builtin_products() -> Result<Vec<WorkflowProduct>> {
    parse_products(bundled("products.yml")?)
}
