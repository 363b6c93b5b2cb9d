//! Configuration structures for the normalization pipeline.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{FaturaError, Result};

/// Main configuration for fatura.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FaturaConfig {
    /// Sanitizer configuration.
    pub sanitizer: SanitizerConfig,

    /// Output configuration.
    pub output: OutputConfig,

    /// Post-sanitization checks.
    pub checks: CheckConfig,
}

/// Sanitizer configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SanitizerConfig {
    /// Re-decode strings that were UTF-8 read as Latin-1.
    pub repair_mojibake: bool,
}

impl Default for SanitizerConfig {
    fn default() -> Self {
        Self {
            repair_mojibake: true,
        }
    }
}

/// Output configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Pretty-print JSON output.
    pub pretty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { pretty: true }
    }
}

/// Checks applied after sanitization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckConfig {
    /// Warn when line totals do not add up to the extracted subtotal.
    pub warn_on_subtotal_mismatch: bool,

    /// Assert the exact canonical contract on every sanitized payload.
    pub enforce_contract: bool,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            warn_on_subtotal_mismatch: true,
            enforce_contract: false,
        }
    }
}

impl FaturaConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| FaturaError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
