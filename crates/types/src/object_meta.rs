//! The standard Kubernetes object metadata type referenced by every resource

use crate::spec::{ComplexTypeSpec, PropertySpec};
use crate::type_ref::TypeRef;

pub const OBJECT_META_TOKEN: &str = "meta/v1:ObjectMeta";

/// The commonly used subset of `metav1.ObjectMeta`
pub fn object_meta_spec() -> ComplexTypeSpec {
    let string_map = || TypeRef::map_of(TypeRef::string());
    let fields = [
        ("name", TypeRef::string(), "Name must be unique within a namespace."),
        ("generateName", TypeRef::string(), "Optional prefix used by the server to generate a unique name."),
        ("namespace", TypeRef::string(), "Namespace defines the space within which each name must be unique."),
        ("labels", string_map(), "Map of string keys and values used to organize and categorize objects."),
        ("annotations", string_map(), "Unstructured key value map stored with a resource."),
        ("uid", TypeRef::string(), "Unique in time and space value for this object."),
        ("resourceVersion", TypeRef::string(), "Opaque value representing the internal version of this object."),
        ("generation", TypeRef::integer(), "Sequence number representing a specific generation of the desired state."),
        ("creationTimestamp", TypeRef::string(), "Time at which this object was created."),
        ("deletionTimestamp", TypeRef::string(), "Time at which this resource will be deleted."),
        ("finalizers", TypeRef::array_of(TypeRef::string()), "Must be empty before the object is deleted from the registry."),
    ];

    let mut spec = ComplexTypeSpec::object();
    spec.description = Some(
        "Metadata that all persisted resources must have, which includes all objects users must create."
            .to_string(),
    );
    for (name, type_ref, description) in fields {
        spec.properties.insert(
            name.to_string(),
            PropertySpec::new(type_ref).with_description(description),
        );
    }
    spec
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_meta_spec() {
        let spec = object_meta_spec();
        assert_eq!(spec.properties.len(), 11);
        assert_eq!(
            spec.properties["labels"].type_ref,
            TypeRef::map_of(TypeRef::string())
        );
        assert!(spec.required.is_empty());
        assert!(spec.referenced_types().is_empty());
    }
}
