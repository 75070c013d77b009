//! CRD (CustomResourceDefinition) parsing and schema extraction

pub mod error;
pub mod names;
pub mod parser;
pub mod resource;

pub use error::CrdError;
pub use names::{group_prefix, module_to_package, resource_token, split_group_version};
pub use parser::{CrdParser, CRD_KIND};
pub use resource::{CrdVersion, CustomResource};
