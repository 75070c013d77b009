//! Output configuration

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Serialization format of the type package
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
}

impl OutputFormat {
    /// Name of the file written into the output directory
    pub fn file_name(&self) -> &'static str {
        match self {
            OutputFormat::Json => "types.json",
            OutputFormat::Yaml => "types.yaml",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Json => f.write_str("json"),
            OutputFormat::Yaml => f.write_str("yaml"),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory the package is written to
    pub path: PathBuf,

    pub format: OutputFormat,

    /// Replace an existing package file
    pub overwrite: bool,
}

impl OutputConfig {
    pub fn validate(&self) -> Result<()> {
        if self.path.to_string_lossy().is_empty() {
            return Err(anyhow!("Output path cannot be empty"));
        }
        Ok(())
    }

    /// Full path of the package file
    pub fn file_path(&self) -> PathBuf {
        self.path.join(self.format.file_name())
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("./generated"),
            format: OutputFormat::Json,
            overwrite: false,
        }
    }
}
