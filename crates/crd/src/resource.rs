//! Parsed custom resource and its per-version schemas

use crate::error::CrdError;
use crate::names::resource_token;
use crd2types_schema::{flatten, merge_documents, MergedDocument, OpenApiDocument, Schema};
use glob::Pattern;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;

/// One served version of a custom resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrdVersion {
    pub name: String,
    pub schema: Schema,
}

/// A CustomResourceDefinition reduced to what type generation needs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomResource {
    /// `metadata.name`, or `<plural>.<group>` when absent
    pub name: String,
    /// `apiVersion` of the definition object itself
    pub api_version: String,
    pub group: String,
    pub kind: String,
    pub plural: String,
    pub singular: String,
    pub list_kind: String,
    /// Served versions carrying a schema, in declaration order
    pub versions: Vec<CrdVersion>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_path: Option<PathBuf>,
}

impl CustomResource {
    pub fn has_schemas(&self) -> bool {
        !self.versions.is_empty()
    }

    /// `<group>/<version>` of one version
    pub fn group_version(&self, version: &str) -> String {
        format!("{}/{}", self.group, version)
    }

    pub fn group_versions(&self) -> Vec<String> {
        self.versions
            .iter()
            .map(|version| self.group_version(&version.name))
            .collect()
    }

    /// Token of one version, e.g. `example.com/v1:Widget`
    pub fn resource_token(&self, version: &str) -> String {
        resource_token(&self.group, version, &self.kind)
    }

    pub fn resource_tokens(&self) -> Vec<String> {
        self.versions
            .iter()
            .map(|version| self.resource_token(&version.name))
            .collect()
    }

    /// Keep only the versions whose `<group>/<version>` matches one of the
    /// glob `filters`. No filters keeps everything; invalid patterns match nothing.
    pub fn retain_versions(&mut self, filters: &[String]) {
        if filters.is_empty() {
            return;
        }

        let patterns: Vec<Pattern> = filters
            .iter()
            .filter_map(|filter| Pattern::new(filter).ok())
            .collect();
        let group = self.group.clone();
        self.versions.retain(|version| {
            let group_version = format!("{}/{}", group, version.name);
            let keep = patterns.iter().any(|pattern| pattern.matches(&group_version));
            if !keep {
                debug!("Filtered out {}", group_version);
            }
            keep
        });
    }

    /// One flattened document per version, each holding the version schema
    /// under its resource token plus the definitions lifted out of it.
    pub fn openapi_documents(&self) -> Vec<OpenApiDocument> {
        self.versions
            .iter()
            .map(|version| {
                let mut document = OpenApiDocument::new()
                    .with_definition(self.resource_token(&version.name), version.schema.clone());
                flatten(&mut document);
                document
            })
            .collect()
    }

    /// All versions merged into a single document
    pub fn openapi_document(&self) -> Result<MergedDocument, CrdError> {
        Ok(merge_documents(self.openapi_documents())?)
    }
}
