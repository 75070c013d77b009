//! Merging of the per-version documents of a CRD

use crate::document::OpenApiDocument;
use crate::error::SchemaError;
use tracing::warn;

/// Result of merging several documents
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MergedDocument {
    pub document: OpenApiDocument,

    /// Definitions that differed between documents, in first-seen order
    pub conflicts: Vec<String>,
}

/// Merge documents by definition name.
///
/// A definition keeps the position of its first occurrence. When a later
/// document defines the same name with a different schema, the later schema
/// replaces it and the name is reported in `conflicts`.
pub fn merge_documents<I>(documents: I) -> Result<MergedDocument, SchemaError>
where
    I: IntoIterator<Item = OpenApiDocument>,
{
    let mut documents = documents.into_iter();
    let mut merged = MergedDocument {
        document: documents.next().ok_or(SchemaError::NoDocuments)?,
        conflicts: Vec::new(),
    };

    for document in documents {
        for (name, schema) in document.definitions {
            match merged.document.definitions.get_mut(&name) {
                Some(existing) if *existing == schema => {}
                Some(existing) => {
                    warn!("Definition {} differs between versions, keeping the later one", name);
                    *existing = schema;
                    if !merged.conflicts.contains(&name) {
                        merged.conflicts.push(name);
                    }
                }
                None => {
                    merged.document.definitions.insert(name, schema);
                }
            }
        }
    }

    Ok(merged)
}
