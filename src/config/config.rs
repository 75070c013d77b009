//! Main configuration structure and implementation

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use super::{GenerationConfig, OutputConfig, Source};

pub const CONFIG_VERSION: &str = "1.0";

/// Files looked up in the working directory when no path is given
pub const DEFAULT_CONFIG_FILES: [&str; 4] = [
    ".crd2types.yaml",
    ".crd2types.yml",
    "crd2types.yaml",
    "crd2types.yml",
];

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Configuration version
    pub version: String,

    /// CRD sources to process, in order
    pub sources: Vec<Source>,

    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,

    /// Generation settings
    #[serde(default)]
    pub generation: GenerationConfig,
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file {path:?}"))?;
        let config: Config = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse configuration file {path:?}"))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a YAML file
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write configuration file {path:?}"))?;
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.version != CONFIG_VERSION {
            return Err(anyhow!(
                "Unsupported configuration version: {}",
                self.version
            ));
        }

        if self.sources.is_empty() {
            return Err(anyhow!("At least one source must be configured"));
        }

        for source in &self.sources {
            source.validate()?;
        }

        self.output.validate()?;
        self.generation.validate()?;

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION.to_string(),
            sources: Vec::new(),
            output: OutputConfig::default(),
            generation: GenerationConfig::default(),
        }
    }
}
