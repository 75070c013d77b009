//! Writers for the resolved type package

use crate::config::OutputFormat;
use crate::utils;
use crate::{Crd2TypesError, Crd2TypesResult};
use anyhow::{Context, Result};
use async_trait::async_trait;
use crd2types_types::TypePackage;
use std::path::{Path, PathBuf};
use tracing::info;

/// Serializes a type package for language generators
#[async_trait]
pub trait TypeEmitter: Send + Sync {
    /// Get emitter name
    fn name(&self) -> &str;

    fn format(&self) -> OutputFormat;

    /// Render the package to text
    fn render(&self, package: &TypePackage) -> Crd2TypesResult<String>;

    /// Write the package into `output_dir`, returning the written file.
    ///
    /// An existing file is only replaced when `overwrite` is set.
    async fn emit(
        &self,
        package: &TypePackage,
        output_dir: &Path,
        overwrite: bool,
    ) -> Result<PathBuf> {
        let path = output_dir.join(self.format().file_name());
        if !overwrite && tokio::fs::try_exists(&path).await.unwrap_or(false) {
            return Err(Crd2TypesError::Output(format!(
                "{} already exists, use --force to overwrite it",
                path.display()
            ))
            .into());
        }

        let content = self.render(package)?;
        utils::ensure_directory(output_dir)?;
        tokio::fs::write(&path, content)
            .await
            .with_context(|| format!("Failed to write {path:?}"))?;

        info!(
            "{} emitter wrote {} types to {:?}",
            self.name(),
            package.types.len(),
            path
        );
        Ok(path)
    }
}

pub struct JsonEmitter;

#[async_trait]
impl TypeEmitter for JsonEmitter {
    fn name(&self) -> &str {
        "json"
    }

    fn format(&self) -> OutputFormat {
        OutputFormat::Json
    }

    fn render(&self, package: &TypePackage) -> Crd2TypesResult<String> {
        let mut content = serde_json::to_string_pretty(package)?;
        content.push('\n');
        Ok(content)
    }
}

pub struct YamlEmitter;

#[async_trait]
impl TypeEmitter for YamlEmitter {
    fn name(&self) -> &str {
        "yaml"
    }

    fn format(&self) -> OutputFormat {
        OutputFormat::Yaml
    }

    /// Enums are written in their JSON shape (`{map: ...}`) rather than as
    /// YAML tags
    fn render(&self, package: &TypePackage) -> Crd2TypesResult<String> {
        let value = serde_json::to_value(package)?;
        Ok(serde_yaml::to_string(&value)?)
    }
}

/// The emitter writing `format`
pub fn emitter_for(format: OutputFormat) -> Box<dyn TypeEmitter> {
    match format {
        OutputFormat::Json => Box::new(JsonEmitter),
        OutputFormat::Yaml => Box::new(YamlEmitter),
    }
}
