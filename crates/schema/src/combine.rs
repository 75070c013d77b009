//! Structural merging of `allOf` / `anyOf` members

use crate::schema::{Schema, OBJECT};
use indexmap::IndexMap;
use tracing::debug;

/// Combine the `properties` of sibling schemas into one object schema.
///
/// Returns `None` for no schemas and the schema itself for a single one. When
/// two members define the same property the last one wins. With
/// `combine_required` the members' `required` lists are concatenated as-is;
/// without it the result has no `required` at all, which is how `anyOf`
/// alternatives become optional fields.
pub fn combine_schemas(combine_required: bool, schemas: &[Schema]) -> Option<Schema> {
    match schemas {
        [] => None,
        [single] => Some(single.clone()),
        _ => {
            let mut properties: IndexMap<String, Schema> = IndexMap::new();
            let mut required = Vec::new();

            for schema in schemas {
                for (name, property) in schema.properties.iter().flatten() {
                    if let Some(previous) = properties.insert(name.clone(), property.clone()) {
                        if previous != *property {
                            debug!("Combined property {} redefined, keeping the last definition", name);
                        }
                    }
                }
                if combine_required {
                    required.extend(schema.required.iter().flatten().cloned());
                }
            }

            Some(Schema {
                schema_type: Some(OBJECT.to_string()),
                properties: Some(properties),
                required: combine_required.then_some(required),
                ..Default::default()
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn schema(yaml: &str) -> Schema {
        Schema::from_yaml_str(yaml).unwrap()
    }

    #[test]
    fn test_combine_nothing() {
        assert_eq!(combine_schemas(true, &[]), None);
        assert_eq!(combine_schemas(false, &[]), None);
    }

    #[test]
    fn test_combine_single_schema_is_unchanged() {
        let person = schema("required: [name]\nproperties:\n  name:\n    type: string");
        assert_eq!(combine_schemas(true, &[person.clone()]), Some(person.clone()));
        assert_eq!(combine_schemas(false, &[person.clone()]), Some(person));
    }

    #[test]
    fn test_combine_with_required() {
        let a = schema("required: [a]\nproperties:\n  a:\n    type: string");
        let b = schema("required: [b]\nproperties:\n  b:\n    type: integer");

        let combined = combine_schemas(true, &[a, b]).unwrap();
        assert_eq!(
            combined,
            schema(
                "type: object\nrequired: [a, b]\nproperties:\n  a:\n    type: string\n  b:\n    type: integer"
            )
        );
    }

    #[test]
    fn test_combine_without_required() {
        let a = schema("required: [a]\nproperties:\n  a:\n    type: string");
        let b = schema("properties:\n  b:\n    type: integer");

        let combined = combine_schemas(false, &[a, b]).unwrap();
        assert_eq!(combined.required, None);
        let names: Vec<&str> = combined.properties.as_ref().unwrap().keys().map(String::as_str).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn test_required_is_not_deduplicated() {
        let a = schema("required: [a]\nproperties:\n  a:\n    type: string");
        let combined = combine_schemas(true, &[a.clone(), a]).unwrap();
        assert_eq!(combined.required, Some(vec!["a".to_string(), "a".to_string()]));
    }

    #[test]
    fn test_last_property_definition_wins() {
        let first = schema("properties:\n  value:\n    type: string");
        let second = schema("properties:\n  value:\n    type: integer");

        let combined = combine_schemas(true, &[first, second]).unwrap();
        assert!(combined.properties.unwrap()["value"].is_type("integer"));
    }
}
