use std::path::Path;

use anyhow::{Context, Result};

use super::Config;

pub const DEFAULT_CONFIG_PATH: &str = "./a11y.config.yaml";

/// Load the run config from a YAML (or JSON) file.
pub fn load(path: &Path) -> Result<Config> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    let config: Config = serde_yaml::from_str(&contents)
        .with_context(|| format!("failed to parse config file {}", path.display()))?;
    Ok(config)
}
