//! Schema error types

/// Errors raised while decoding or merging schemas
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("no OpenAPI documents to merge")]
    NoDocuments,

    #[error("invalid OpenAPI schema: {0}")]
    Invalid(#[from] serde_yaml::Error),
}
