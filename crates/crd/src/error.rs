//! CRD error types

use crd2types_schema::SchemaError;

/// Errors that make a CRD unusable. They abort processing of the CRD that
/// raised them only; other CRDs of the same stream are unaffected.
#[derive(Debug, thiserror::Error)]
pub enum CrdError {
    #[error("could not find `{0}` field in the CRD")]
    MissingField(&'static str),

    #[error("CRD {crd} has an invalid schema for version {version}: {source}")]
    InvalidSchema {
        crd: String,
        version: String,
        #[source]
        source: SchemaError,
    },

    #[error("failed to unmarshal YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("expected a version string with the format <group>/<version>, but got {0:?}")]
    InvalidGroupVersion(String),

    #[error("group cannot be empty")]
    EmptyGroup,

    #[error(transparent)]
    Schema(#[from] SchemaError),
}
