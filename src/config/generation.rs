//! Generation settings

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

/// Generation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Stop at the first malformed CRD instead of skipping it
    pub fail_fast: bool,

    /// Version recorded in the generated package
    pub package_version: String,

    /// Register the standard `meta/v1:ObjectMeta` type
    pub include_object_meta: bool,

    /// Number of source files parsed concurrently
    pub max_workers: usize,
}

impl GenerationConfig {
    pub fn validate(&self) -> Result<()> {
        if self.package_version.is_empty() {
            return Err(anyhow!("Package version cannot be empty"));
        }
        if self.max_workers == 0 {
            return Err(anyhow!("max_workers must be at least 1"));
        }
        Ok(())
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            fail_fast: false,
            package_version: "0.1.0".to_string(),
            include_object_meta: true,
            max_workers: 8,
        }
    }
}
