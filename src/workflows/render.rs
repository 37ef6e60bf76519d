use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use super::table::WorkflowProduct;

/// A workflow ready to be written to `<output>/<file_name>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedWorkflow {
    pub product: String,
    pub file_name: String,
    pub contents: String,
}

/// Substitute the product fields into `template`.
///
/// Only `{name}`, `{display}`, `{image}`, `{port}` and `{health_path}` are
/// replaced; any other brace text, including GitHub `${{ ... }}`
/// expressions, is left alone. The template is scanned once, so field
/// values are copied verbatim even if they contain placeholders. The result
/// must parse as YAML.
pub fn render(template: &str, product: &WorkflowProduct) -> Result<String> {
    let port = product.port.to_string();
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let field = after
            .find('}')
            .and_then(|close| field_value(product, &port, &after[..close]).map(|v| (close, v)));
        match field {
            Some((close, value)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);

    serde_yaml::from_str::<serde_yaml::Value>(&out)
        .with_context(|| format!("workflow for {:?} is not valid YAML", product.name))?;
    Ok(out)
}

fn field_value<'a>(product: &'a WorkflowProduct, port: &'a str, field: &str) -> Option<&'a str> {
    match field {
        "name" => Some(product.name.as_str()),
        "display" => Some(product.display.as_str()),
        "image" => Some(product.image.as_str()),
        "port" => Some(port),
        "health_path" => Some(product.health_path.as_str()),
        _ => None,
    }
}

/// Render one workflow per product, in table order.
pub fn render_all(template: &str, products: &[WorkflowProduct]) -> Result<Vec<RenderedWorkflow>> {
    products
        .iter()
        .map(|product| {
            Ok(RenderedWorkflow {
                product: product.name.clone(),
                file_name: format!("deploy-{}.yml", product.name),
                contents: render(template, product)?,
            })
        })
        .collect()
}

/// Write every workflow into `out_dir`, creating it if needed.
pub fn write_all(rendered: &[RenderedWorkflow], out_dir: &Path) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("failed to create {}", out_dir.display()))?;

    let mut written = Vec::with_capacity(rendered.len());
    for workflow in rendered {
        let path = out_dir.join(&workflow.file_name);
        std::fs::write(&path, &workflow.contents)
            .with_context(|| format!("failed to write {}", path.display()))?;
        info!(path = %path.display(), "generated workflow");
        written.push(path);
    }
    Ok(written)
}
