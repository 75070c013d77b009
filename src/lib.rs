//! crd2types library
//!
//! Reads Kubernetes CustomResourceDefinitions and resolves their versioned
//! OpenAPI schemas into a flat, named type graph for per-language SDK
//! generators.

pub mod cli;
pub mod config;
pub mod emit;
pub mod loader;
pub mod utils;

pub use config::{Config, GenerationConfig, OutputConfig, OutputFormat, Source};
pub use crd2types_crd::{CrdParser, CustomResource};
pub use crd2types_types::{
    BuilderOptions, ComplexTypeSpec, RegistryBuilder, TypePackage, TypeRef, TypeRegistry,
};
pub use emit::{emitter_for, TypeEmitter};
pub use loader::{LoadedInput, SourceLoader};

use anyhow::Result;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Main application context that coordinates loading, resolution and output
pub struct Crd2Types {
    config: Config,
    loader: SourceLoader,
}

impl Crd2Types {
    /// Create a new instance with the given configuration
    pub fn new(config: Config) -> Result<Self> {
        config
            .validate()
            .map_err(|e| Crd2TypesError::Config(format!("{e:#}")))?;
        let loader = SourceLoader::new(config.generation.max_workers);
        Ok(Self { config, loader })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Load every source and resolve its CRDs without writing anything
    pub async fn resolve(&self) -> Result<GenerationResult> {
        let start_time = Instant::now();
        let fail_fast = self.config.generation.fail_fast;

        let loaded = self.loader.load(&self.config.sources).await?;
        let inputs_processed = loaded.len();

        let mut errors = Vec::new();
        let mut crds = Vec::new();
        for input in loaded {
            if fail_fast {
                if let Some(error) = input.errors.first() {
                    return Err(Crd2TypesError::CrdParsing(error.clone()).into());
                }
            }
            errors.extend(input.errors);
            crds.extend(input.crds);
        }

        let (package, resolution_errors) =
            build_package(&crds, self.builder_options(), fail_fast)?;
        errors.extend(resolution_errors);

        let duration = start_time.elapsed();
        info!(
            "Resolved {} CRDs into {} types in {:?}",
            crds.len(),
            package.types.len(),
            duration
        );

        Ok(GenerationResult {
            package,
            inputs_processed,
            crds_processed: crds.len(),
            errors,
            output_file: None,
            duration,
        })
    }

    /// Resolve all sources and write the package to the configured output
    pub async fn generate(&self) -> Result<GenerationResult> {
        let mut result = self.resolve().await?;

        let output = &self.config.output;
        let emitter = emitter_for(output.format);
        let path = emitter
            .emit(&result.package, &output.path, output.overwrite)
            .await?;

        result.output_file = Some(path);
        Ok(result)
    }

    fn builder_options(&self) -> BuilderOptions {
        BuilderOptions {
            package_version: self.config.generation.package_version.clone(),
            include_object_meta: self.config.generation.include_object_meta,
        }
    }
}

/// Resolve parsed CRDs into a package.
///
/// Resolution is serial and follows the order of `crds`. A CRD that cannot be
/// resolved is skipped and reported, unless `fail_fast` is set.
pub fn build_package(
    crds: &[CustomResource],
    options: BuilderOptions,
    fail_fast: bool,
) -> Result<(TypePackage, Vec<String>)> {
    let mut builder = RegistryBuilder::new(options);
    let mut errors = Vec::new();

    for crd in crds {
        match builder.add_crd(crd) {
            Ok(tokens) => debug!("CRD {} added {} resources", crd.name, tokens.len()),
            Err(e) => {
                let message = format!("{}: {}", crd.name, e);
                if fail_fast {
                    return Err(Crd2TypesError::Resolution(message).into());
                }
                warn!("Skipping CRD {}", message);
                errors.push(message);
            }
        }
    }

    let package = builder
        .build()
        .map_err(|e| Crd2TypesError::Resolution(e.to_string()))?;
    Ok((package, errors))
}

/// Outcome of a generation run
#[derive(Debug, Clone)]
pub struct GenerationResult {
    pub package: TypePackage,
    pub inputs_processed: usize,
    pub crds_processed: usize,

    /// Inputs and CRDs that were skipped
    pub errors: Vec<String>,

    /// File written, if any
    pub output_file: Option<PathBuf>,

    pub duration: Duration,
}

/// Error types for the application
#[derive(Debug, thiserror::Error)]
pub enum Crd2TypesError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("CRD parsing failed: {0}")]
    CrdParsing(String),

    #[error("Type resolution failed: {0}")]
    Resolution(String),

    #[error("Output error: {0}")]
    Output(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_yaml::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for the main application
pub type Crd2TypesResult<T> = Result<T, Crd2TypesError>;
