//! Reading configured sources and parsing their CRDs

use crate::config::Source;
use crate::utils;
use anyhow::{Context, Result};
use crd2types_crd::{CrdParser, CustomResource};
use futures::stream::{self, StreamExt};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// A single document stream
#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    File(PathBuf),
    Url(String),
}

impl Input {
    pub fn origin(&self) -> String {
        match self {
            Input::File(path) => path.display().to_string(),
            Input::Url(url) => url.clone(),
        }
    }

    fn path(&self) -> Option<&Path> {
        match self {
            Input::File(path) => Some(path.as_path()),
            Input::Url(_) => None,
        }
    }

    async fn read(&self) -> Result<String> {
        match self {
            Input::File(path) => tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read {path:?}")),
            Input::Url(url) => fetch(url).await,
        }
    }
}

#[cfg(feature = "http")]
async fn fetch(url: &str) -> Result<String> {
    let response = reqwest::get(url)
        .await
        .with_context(|| format!("Failed to fetch {url}"))?
        .error_for_status()?;
    Ok(response.text().await?)
}

#[cfg(not(feature = "http"))]
async fn fetch(url: &str) -> Result<String> {
    anyhow::bail!("Cannot fetch {url}: built without the `http` feature")
}

/// An input together with the source it came from
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedInput {
    pub source: String,
    pub input: Input,
    pub filters: Vec<String>,
}

/// CRDs parsed from one input
#[derive(Debug, Clone)]
pub struct LoadedInput {
    pub source: String,
    pub origin: String,
    pub crds: Vec<CustomResource>,

    /// Unreadable input, malformed YAML or malformed CRDs
    pub errors: Vec<String>,
}

/// Reads sources concurrently and parses them on blocking worker threads
#[derive(Debug, Clone)]
pub struct SourceLoader {
    max_workers: usize,
}

impl SourceLoader {
    pub fn new(max_workers: usize) -> Self {
        Self {
            max_workers: max_workers.max(1),
        }
    }

    /// Expand sources into the inputs to read, in configuration order
    pub fn plan(&self, sources: &[Source]) -> Result<Vec<PlannedInput>> {
        let mut planned = Vec::new();

        for source in sources {
            let inputs: Vec<Input> = match source {
                Source::File(file) => utils::expand_file_pattern(&file.path)?
                    .into_iter()
                    .map(Input::File)
                    .collect(),
                Source::Directory(directory) => {
                    let path = utils::expand_path(&directory.path)?;
                    utils::find_manifest_files(&path, directory.recursive)
                        .with_context(|| format!("Source {} is unusable", directory.name))?
                        .into_iter()
                        .map(Input::File)
                        .collect()
                }
                Source::Url(url) => vec![Input::Url(url.url.clone())],
            };

            if inputs.is_empty() {
                warn!("Source {} matched no files", source.name());
            }
            debug!("Source {} has {} inputs", source.name(), inputs.len());

            planned.extend(inputs.into_iter().map(|input| PlannedInput {
                source: source.name().to_string(),
                input,
                filters: source.filters().to_vec(),
            }));
        }

        Ok(planned)
    }

    /// Read and parse every input of `sources`.
    ///
    /// Results come back in the order the inputs were planned, whatever order
    /// the parsing finished in.
    pub async fn load(&self, sources: &[Source]) -> Result<Vec<LoadedInput>> {
        let planned = self.plan(sources)?;
        info!(
            "Loading {} inputs from {} sources",
            planned.len(),
            sources.len()
        );

        let tasks = planned
            .into_iter()
            .enumerate()
            .map(|(index, planned)| async move { (index, load_input(planned).await) });

        let mut loaded = stream::iter(tasks)
            .buffer_unordered(self.max_workers)
            .collect::<Vec<_>>()
            .await;
        loaded.sort_by_key(|(index, _)| *index);

        Ok(loaded.into_iter().map(|(_, input)| input).collect())
    }
}

async fn load_input(planned: PlannedInput) -> LoadedInput {
    let origin = planned.input.origin();
    let mut loaded = LoadedInput {
        source: planned.source,
        origin: origin.clone(),
        crds: Vec::new(),
        errors: Vec::new(),
    };

    let content = match planned.input.read().await {
        Ok(content) => content,
        Err(e) => {
            loaded.errors.push(format!("{e:#}"));
            return loaded;
        }
    };

    let path = planned.input.path().map(Path::to_path_buf);
    let filters = planned.filters;
    let parsed = tokio::task::spawn_blocking(move || {
        parse_content(&content, &origin, path.as_deref(), &filters)
    })
    .await;

    match parsed {
        Ok((crds, errors)) => {
            loaded.crds = crds;
            loaded.errors = errors;
        }
        Err(e) => loaded.errors.push(format!("{}: parser task failed: {}", loaded.origin, e)),
    }
    loaded
}

/// Parse every CRD of one document stream.
///
/// A malformed CRD is reported and skipped; the other CRDs of the stream are
/// still returned.
pub fn parse_content(
    content: &str,
    origin: &str,
    path: Option<&Path>,
    filters: &[String],
) -> (Vec<CustomResource>, Vec<String>) {
    let parser = CrdParser::with_filters(filters.to_vec());
    let documents = match parser.parse_documents(content) {
        Ok(documents) => documents,
        Err(e) => return (Vec::new(), vec![format!("{origin}: {e}")]),
    };

    let mut crds = Vec::new();
    let mut errors = Vec::new();
    for document in &documents {
        match parser.extract_crd_from_document(document, path) {
            Ok(Some(crd)) => crds.push(crd),
            Ok(None) => {}
            Err(e) => {
                warn!("Skipping malformed CRD in {}: {}", origin, e);
                errors.push(format!("{origin}: {e}"));
            }
        }
    }

    debug!("Parsed {} CRDs from {}", crds.len(), origin);
    (crds, errors)
}
