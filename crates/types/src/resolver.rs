//! Resolution of schemas into type references

use crate::registry::TypeRegistry;
use crate::spec::{ComplexTypeSpec, ObjectShape, PropertySpec};
use crate::type_ref::{PrimitiveType, TypeRef};
use crd2types_schema::schema::{ARRAY, OBJECT};
use crd2types_schema::{child_type_name, combine_schemas, OpenApiDocument, Schema};
use indexmap::IndexMap;
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

/// Nesting beyond this depth resolves to [`TypeRef::Any`]
pub const MAX_RESOLUTION_DEPTH: usize = 128;

/// Resolves the schemas of one document, registering every named object type
/// it meets into a shared registry.
///
/// `$ref`s are resolved against the document under the name of the definition
/// they point to. Each definition is resolved once; a reference back into a
/// definition that is still being resolved becomes a [`TypeRef::Reference`].
pub struct TypeResolver<'a> {
    document: &'a OpenApiDocument,
    registry: &'a mut TypeRegistry,
    resolved: HashMap<String, TypeRef>,
    in_progress: HashSet<String>,
    depth: usize,
}

impl<'a> TypeResolver<'a> {
    pub fn new(document: &'a OpenApiDocument, registry: &'a mut TypeRegistry) -> Self {
        Self {
            document,
            registry,
            resolved: HashMap::new(),
            in_progress: HashSet::new(),
            depth: 0,
        }
    }

    /// Resolve `schema` as the type called `name`
    pub fn resolve(&mut self, schema: Option<&Schema>, name: &str) -> TypeRef {
        if self.depth >= MAX_RESOLUTION_DEPTH {
            warn!(
                "Schema {} nests deeper than {} levels, using any",
                name, MAX_RESOLUTION_DEPTH
            );
            return TypeRef::Any;
        }

        self.depth += 1;
        let type_ref = self.resolve_schema(schema, name);
        self.depth -= 1;
        type_ref
    }

    fn resolve_schema(&mut self, schema: Option<&Schema>, name: &str) -> TypeRef {
        let Some(schema) = schema else {
            return TypeRef::Any;
        };

        if schema.is_int_or_string() {
            return TypeRef::int_or_string();
        }

        if let Some(reference) = &schema.reference {
            return self.resolve_reference(reference);
        }

        if let Some(alternatives) = &schema.one_of {
            return self.resolve_one_of(alternatives, name);
        }

        if let Some(members) = &schema.all_of {
            return match combine_schemas(true, members) {
                Some(combined) => self.resolve(Some(&combined), name),
                None => TypeRef::Any,
            };
        }

        if let Some(members) = &schema.any_of {
            return match combine_schemas(false, members) {
                Some(combined) => self.resolve(Some(&combined), name),
                None => TypeRef::Any,
            };
        }

        if schema.preserves_unknown_fields() {
            return TypeRef::map_of(TypeRef::Any);
        }

        match schema.schema_type.as_deref() {
            None => TypeRef::Any,
            Some(ARRAY) => TypeRef::array_of(self.resolve(schema.items.as_deref(), name)),
            Some(OBJECT) => self.resolve_object(schema, name),
            Some(other) => match PrimitiveType::from_schema_type(other) {
                Some(primitive) => TypeRef::Primitive(primitive),
                None => {
                    debug!("Unknown type {:?} in {}, using any", other, name);
                    TypeRef::Any
                }
            },
        }
    }

    fn resolve_reference(&mut self, reference: &str) -> TypeRef {
        let document = self.document;
        let Some((name, definition)) = document.resolve_ref(reference) else {
            debug!("Cannot resolve reference {}, using any", reference);
            return TypeRef::Any;
        };

        if let Some(type_ref) = self.resolved.get(&name) {
            return type_ref.clone();
        }

        if !self.in_progress.insert(name.clone()) {
            debug!("Cyclic reference to {}", name);
            return TypeRef::Reference(name);
        }

        let type_ref = self.resolve(Some(definition), &name);
        self.in_progress.remove(&name);
        self.resolved.insert(name, type_ref.clone());
        type_ref
    }

    /// A union whose members include an unconstrained type is itself unconstrained
    fn resolve_one_of(&mut self, alternatives: &[Schema], name: &str) -> TypeRef {
        let members: Vec<TypeRef> = alternatives
            .iter()
            .enumerate()
            .map(|(index, alternative)| {
                self.resolve(Some(alternative), &format!("{name}OneOf{index}"))
            })
            .collect();

        if members.is_empty() || members.iter().any(TypeRef::is_any) {
            debug!("oneOf of {} admits any value", name);
            return TypeRef::Any;
        }
        TypeRef::Union(members)
    }

    fn resolve_object(&mut self, schema: &Schema, name: &str) -> TypeRef {
        self.add_type(schema, name);

        if let Some(values) = schema.additional_properties_schema() {
            return TypeRef::map_of(self.resolve(Some(values), name));
        }

        // `properties: {}` still declares a struct
        if schema.allows_any_additional_properties() || schema.properties.is_none() {
            return TypeRef::map_of(TypeRef::Any);
        }

        TypeRef::reference(name)
    }

    /// Build the named object type for `schema` without registering it
    pub fn build_type(&mut self, schema: &Schema, name: &str) -> ComplexTypeSpec {
        let mut properties = IndexMap::new();

        for (property, property_schema) in schema.properties.iter().flatten() {
            let Some(child_name) = child_type_name(name, property) else {
                debug!("Dropping unnamed property {:?} of {}", property, name);
                continue;
            };

            let type_ref = self.resolve(Some(property_schema), &child_name);
            let default = if type_ref.is_structured() {
                None
            } else {
                property_schema.default.clone()
            };

            properties.insert(
                property.clone(),
                PropertySpec {
                    type_ref,
                    description: property_schema.description.clone(),
                    default,
                    const_value: None,
                },
            );
        }

        let schema_type = schema
            .schema_type
            .clone()
            .or_else(|| schema.properties.as_ref().map(|_| OBJECT.to_string()));

        ComplexTypeSpec {
            schema_type,
            shape: if schema.is_map() {
                ObjectShape::Map
            } else {
                ObjectShape::Struct
            },
            description: schema.description.clone(),
            properties,
            required: schema.required.clone().unwrap_or_default(),
            required_outputs: None,
        }
    }

    /// Build and register the named object type for `schema`.
    ///
    /// A map without fields shares its name with its value type and never
    /// replaces an entry already registered under that name.
    pub fn add_type(&mut self, schema: &Schema, name: &str) {
        let spec = self.build_type(schema, name);
        if spec.shape == ObjectShape::Map
            && spec.properties.is_empty()
            && self.registry.contains(name)
        {
            debug!("Keeping registered type {} over its map form", name);
            return;
        }
        self.register(name, spec);
    }

    pub fn register(&mut self, name: &str, spec: ComplexTypeSpec) {
        self.registry.insert(name, spec);
    }
}
