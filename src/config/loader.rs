use std::path::Path;

use anyhow::{Context, Result};

use super::types::Config;

/// File looked up in the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "startup-api.yml";

/// Load config from a YAML file. A missing file yields the defaults.
pub fn load(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let config: Config = serde_yaml::from_str(&contents)
        .with_context(|| format!("invalid config in {}", path.display()))?;
    Ok(config)
}

/// Expand `${NAME}` and `$NAME` references in `value` through `lookup`. An
/// unset variable expands to the empty string. Substituted text is never
/// rescanned, and an unterminated `${` is kept literally.
pub fn expand_env(value: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    shellexpand::env_with_context_no_errors(value, |name| Some(lookup(name).unwrap_or_default()))
        .into_owned()
}
