//! Named object types and their properties

use crate::type_ref::TypeRef;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One property of a named object type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertySpec {
    #[serde(rename = "type")]
    pub type_ref: TypeRef,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Only kept for primitive and union types
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,

    /// Fixed value, set on envelope fields
    #[serde(default, rename = "const", skip_serializing_if = "Option::is_none")]
    pub const_value: Option<serde_json::Value>,
}

impl PropertySpec {
    pub fn new(type_ref: TypeRef) -> Self {
        Self {
            type_ref,
            description: None,
            default: None,
            const_value: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_const(mut self, value: impl Into<serde_json::Value>) -> Self {
        self.const_value = Some(value.into());
        self
    }
}

/// Whether an object has a fixed set of fields or arbitrary keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectShape {
    #[default]
    #[serde(rename = "object")]
    Struct,
    Map,
}

/// A named object type
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplexTypeSpec {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<String>,

    #[serde(default)]
    pub shape: ObjectShape,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub properties: IndexMap<String, PropertySpec>,

    #[serde(default)]
    pub required: Vec<String>,

    /// Every property a server returns. Only set on CRD roots, where the
    /// schema cannot say that e.g. `status` is always present in output.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_outputs: Option<Vec<String>>,
}

impl ComplexTypeSpec {
    /// An empty object type
    pub fn object() -> Self {
        Self {
            schema_type: Some(crd2types_schema::schema::OBJECT.to_string()),
            ..Default::default()
        }
    }

    pub fn is_required(&self, property: &str) -> bool {
        self.required.iter().any(|name| name == property)
    }

    /// Append `property` to `required` unless it is already listed
    pub fn require(&mut self, property: &str) {
        if !self.is_required(property) {
            self.required.push(property.to_string());
        }
    }

    pub fn property_names(&self) -> Vec<String> {
        self.properties.keys().cloned().collect()
    }

    /// Named types referenced by the properties
    pub fn referenced_types(&self) -> Vec<&str> {
        self.properties
            .values()
            .flat_map(|property| property.type_ref.referenced_types())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_is_deduplicated() {
        let mut spec = ComplexTypeSpec::object();
        spec.require("spec");
        spec.require("kind");
        spec.require("spec");
        assert_eq!(spec.required, vec!["spec", "kind"]);
        assert!(spec.is_required("kind"));
        assert!(!spec.is_required("status"));
    }

    #[test]
    fn test_serialization() {
        let mut spec = ComplexTypeSpec::object();
        spec.properties.insert(
            "kind".to_string(),
            PropertySpec::new(TypeRef::string()).with_const("Widget"),
        );
        spec.require("kind");

        assert_eq!(
            serde_json::to_value(&spec).unwrap(),
            serde_json::json!({
                "type": "object",
                "shape": "object",
                "properties": {"kind": {"type": {"primitive": "string"}, "const": "Widget"}},
                "required": ["kind"]
            })
        );
    }
}
