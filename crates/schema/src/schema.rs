//! OpenAPI v3 schema node as embedded in a CRD version

use crate::document::{definition_name, definition_ref};
use crate::error::SchemaError;
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

pub const OBJECT: &str = "object";
pub const ARRAY: &str = "array";
pub const STRING: &str = "string";
pub const INTEGER: &str = "integer";
pub const NUMBER: &str = "number";
pub const BOOLEAN: &str = "boolean";

/// A single OpenAPI v3 schema fragment.
///
/// Only the keywords that drive type resolution are modelled; everything else
/// (`format`, `enum`, `pattern`, ...) is kept in `extensions` so a schema
/// serializes back without loss.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Schema {
    /// Local reference to a named definition (`#/definitions/<name>`)
    #[serde(rename = "$ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,

    /// Schema type; a non-string `type` is read as absent
    #[serde(
        rename = "type",
        deserialize_with = "deserialize_type",
        skip_serializing_if = "Option::is_none"
    )]
    pub schema_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<IndexMap<String, Schema>>,

    /// Array item schema; the tuple form keeps its first entry
    #[serde(
        deserialize_with = "deserialize_items",
        skip_serializing_if = "Option::is_none"
    )]
    pub items: Option<Box<Schema>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_properties: Option<AdditionalProperties>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub one_of: Option<Vec<Schema>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub all_of: Option<Vec<Schema>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub any_of: Option<Vec<Schema>>,

    #[serde(
        rename = "x-kubernetes-int-or-string",
        skip_serializing_if = "Option::is_none"
    )]
    pub int_or_string: Option<bool>,

    #[serde(
        rename = "x-kubernetes-preserve-unknown-fields",
        skip_serializing_if = "Option::is_none"
    )]
    pub preserve_unknown_fields: Option<bool>,

    /// Keywords not used for type resolution
    #[serde(flatten)]
    pub extensions: IndexMap<String, serde_json::Value>,
}

/// `additionalProperties` is either a flag or the schema of the map values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AdditionalProperties {
    Bool(bool),
    Schema(Box<Schema>),
}

impl Schema {
    /// Decode a schema from an already parsed YAML (or JSON) value
    pub fn from_value(value: serde_yaml::Value) -> Result<Self, SchemaError> {
        Ok(serde_yaml::from_value(value)?)
    }

    /// Decode a schema from YAML or JSON text
    pub fn from_yaml_str(content: &str) -> Result<Self, SchemaError> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// A schema with only `type` set
    pub fn of_type(schema_type: &str) -> Self {
        Self {
            schema_type: Some(schema_type.to_string()),
            ..Default::default()
        }
    }

    /// A bare reference to the definition `name`
    pub fn reference_to(name: &str) -> Self {
        Self {
            reference: Some(definition_ref(name)),
            ..Default::default()
        }
    }

    pub fn is_reference(&self) -> bool {
        self.reference.is_some()
    }

    /// Name of the local definition this schema points to, if any
    pub fn referenced_definition(&self) -> Option<String> {
        self.reference.as_deref().and_then(definition_name)
    }

    pub fn is_type(&self, schema_type: &str) -> bool {
        self.schema_type.as_deref() == Some(schema_type)
    }

    pub fn has_combinator(&self) -> bool {
        self.one_of.is_some() || self.all_of.is_some() || self.any_of.is_some()
    }

    pub fn is_int_or_string(&self) -> bool {
        self.int_or_string == Some(true)
    }

    pub fn preserves_unknown_fields(&self) -> bool {
        self.preserve_unknown_fields == Some(true)
    }

    /// Schema of the map values when `additionalProperties` is a schema
    pub fn additional_properties_schema(&self) -> Option<&Schema> {
        match &self.additional_properties {
            Some(AdditionalProperties::Schema(schema)) => Some(&**schema),
            _ => None,
        }
    }

    pub fn additional_properties_schema_mut(&mut self) -> Option<&mut Schema> {
        match &mut self.additional_properties {
            Some(AdditionalProperties::Schema(schema)) => Some(&mut **schema),
            _ => None,
        }
    }

    /// `additionalProperties: true`, equivalent to a map of anything
    pub fn allows_any_additional_properties(&self) -> bool {
        matches!(self.additional_properties, Some(AdditionalProperties::Bool(true)))
    }

    /// Whether the schema describes a map rather than a fixed set of fields
    pub fn is_map(&self) -> bool {
        self.additional_properties_schema().is_some() || self.allows_any_additional_properties()
    }
}

fn deserialize_type<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<serde_json::Value>::deserialize(deserializer)? {
        Some(serde_json::Value::String(schema_type)) => Some(schema_type),
        _ => None,
    })
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ItemsRepr {
    Single(Box<Schema>),
    Tuple(Vec<Schema>),
}

fn deserialize_items<'de, D>(deserializer: D) -> Result<Option<Box<Schema>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<ItemsRepr>::deserialize(deserializer)? {
        Some(ItemsRepr::Single(schema)) => Some(schema),
        Some(ItemsRepr::Tuple(schemas)) => schemas.into_iter().next().map(Box::new),
        None => None,
    })
}
