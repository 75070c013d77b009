//! OpenAPI v3 schema handling for CustomResourceDefinitions
//!
//! Holds the schema node model and the document passes that run before type
//! resolution: combinator merging, flattening of nested inline objects into
//! named definitions, and merging of per-version documents.

pub mod combine;
pub mod document;
pub mod error;
pub mod flatten;
pub mod merge;
pub mod naming;
pub mod schema;

pub use combine::combine_schemas;
pub use document::{definition_name, definition_ref, OpenApiDocument, DEFINITION_PREFIX};
pub use error::SchemaError;
pub use flatten::flatten;
pub use merge::{merge_documents, MergedDocument};
pub use naming::{child_type_name, property_type_name};
pub use schema::{AdditionalProperties, Schema};
