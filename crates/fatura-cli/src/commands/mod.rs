//! Subcommand implementations.

pub mod batch;
pub mod config;
pub mod output;
pub mod sanitize;
pub mod validate;

use std::fs;
use std::path::Path;

use serde_json::Value;

use fatura_core::models::config::FaturaConfig;

/// Load configuration from an explicit path, the default location, or defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<FaturaConfig> {
    if let Some(path) = config_path {
        return Ok(FaturaConfig::from_file(Path::new(path))?);
    }

    let default_path = config::default_config_path();
    if default_path.exists() {
        Ok(FaturaConfig::from_file(&default_path)?)
    } else {
        Ok(FaturaConfig::default())
    }
}

/// Read an extraction payload and require a top-level JSON object.
pub fn read_payload(path: &Path) -> anyhow::Result<Value> {
    if !path.exists() {
        anyhow::bail!("Input file not found: {}", path.display());
    }

    let content = fs::read_to_string(path)?;
    let value: Value = serde_json::from_str(&content)
        .map_err(|e| anyhow::anyhow!("Invalid JSON in {}: {}", path.display(), e))?;

    if !value.is_object() {
        anyhow::bail!("Extraction output is not a JSON object: {}", path.display());
    }

    Ok(value)
}
