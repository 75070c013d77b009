//! Source configuration definitions

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

/// Where CRD documents are read from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Source {
    /// One file, or every file matching a glob pattern
    File(FileSource),

    /// Every YAML or JSON file below a directory
    Directory(DirectorySource),

    /// A document fetched over HTTP(S)
    Url(UrlSource),
}

impl Source {
    /// Get the name of the source
    pub fn name(&self) -> &str {
        match self {
            Source::File(file) => &file.name,
            Source::Directory(directory) => &directory.name,
            Source::Url(url) => &url.name,
        }
    }

    /// Glob patterns over `<group>/<version>` selecting the versions to keep
    pub fn filters(&self) -> &[String] {
        match self {
            Source::File(file) => &file.filters,
            Source::Directory(directory) => &directory.filters,
            Source::Url(url) => &url.filters,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Source::File(_) => "file",
            Source::Directory(_) => "directory",
            Source::Url(_) => "url",
        }
    }

    /// Validate the source configuration
    pub fn validate(&self) -> Result<()> {
        if self.name().is_empty() {
            return Err(anyhow!("Source name cannot be empty"));
        }

        for filter in self.filters() {
            glob::Pattern::new(filter)
                .map_err(|e| anyhow!("Invalid filter {:?} in source {}: {}", filter, self.name(), e))?;
        }

        match self {
            Source::File(file) => file.validate(),
            Source::Directory(directory) => directory.validate(),
            Source::Url(url) => url.validate(),
        }
    }
}

/// File source configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileSource {
    pub name: String,

    /// File path or glob pattern; `~` and `$VARS` are expanded
    pub path: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub filters: Vec<String>,
}

impl FileSource {
    pub fn validate(&self) -> Result<()> {
        if self.path.is_empty() {
            return Err(anyhow!("File source {} has an empty path", self.name));
        }
        Ok(())
    }
}

/// Directory source configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectorySource {
    pub name: String,

    /// Directory path; `~` and `$VARS` are expanded
    pub path: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub filters: Vec<String>,

    /// Descend into subdirectories
    #[serde(default = "default_recursive")]
    pub recursive: bool,
}

impl DirectorySource {
    pub fn validate(&self) -> Result<()> {
        if self.path.is_empty() {
            return Err(anyhow!("Directory source {} has an empty path", self.name));
        }
        Ok(())
    }
}

fn default_recursive() -> bool {
    true
}

/// URL source configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UrlSource {
    pub name: String,

    pub url: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub filters: Vec<String>,
}

impl UrlSource {
    pub fn validate(&self) -> Result<()> {
        if !self.url.starts_with("http://") && !self.url.starts_with("https://") {
            return Err(anyhow!("Invalid URL format: {}", self.url));
        }

        if !cfg!(feature = "http") {
            return Err(anyhow!(
                "URL source {} requires crd2types to be built with the `http` feature",
                self.name
            ));
        }

        Ok(())
    }
}
