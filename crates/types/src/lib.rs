//! Type model and resolution of CRD schemas into named types

pub mod builder;
pub mod object_meta;
pub mod package;
pub mod registry;
pub mod resolver;
pub mod spec;
pub mod type_ref;

pub use builder::{BuilderOptions, RegistryBuilder};
pub use object_meta::{object_meta_spec, OBJECT_META_TOKEN};
pub use package::TypePackage;
pub use registry::TypeRegistry;
pub use resolver::{TypeResolver, MAX_RESOLUTION_DEPTH};
pub use spec::{ComplexTypeSpec, ObjectShape, PropertySpec};
pub use type_ref::{PrimitiveType, TypeRef};
