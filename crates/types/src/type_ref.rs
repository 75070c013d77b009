//! Resolved, generator-agnostic type references

use crd2types_schema::schema::{BOOLEAN, INTEGER, NUMBER, STRING};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveType {
    String,
    Integer,
    Number,
    Boolean,
}

impl PrimitiveType {
    /// Primitive named by an OpenAPI `type`, if it is one
    pub fn from_schema_type(schema_type: &str) -> Option<Self> {
        match schema_type {
            STRING => Some(Self::String),
            INTEGER => Some(Self::Integer),
            NUMBER => Some(Self::Number),
            BOOLEAN => Some(Self::Boolean),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => STRING,
            Self::Integer => INTEGER,
            Self::Number => NUMBER,
            Self::Boolean => BOOLEAN,
        }
    }
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The resolved type of one schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TypeRef {
    Primitive(PrimitiveType),
    Array(Box<TypeRef>),
    /// Map from string keys to values of the inner type
    Map(Box<TypeRef>),
    /// Named type in the registry
    Reference(String),
    /// Exactly one of the member types
    Union(Vec<TypeRef>),
    /// Unconstrained value
    Any,
}

impl TypeRef {
    pub fn string() -> Self {
        Self::Primitive(PrimitiveType::String)
    }

    pub fn integer() -> Self {
        Self::Primitive(PrimitiveType::Integer)
    }

    pub fn array_of(item: TypeRef) -> Self {
        Self::Array(Box::new(item))
    }

    pub fn map_of(value: TypeRef) -> Self {
        Self::Map(Box::new(value))
    }

    pub fn reference(name: impl Into<String>) -> Self {
        Self::Reference(name.into())
    }

    /// `x-kubernetes-int-or-string`
    pub fn int_or_string() -> Self {
        Self::Union(vec![Self::integer(), Self::string()])
    }

    pub fn is_any(&self) -> bool {
        matches!(self, Self::Any)
    }

    /// Arrays, maps and named types, whose defaults cannot be carried over
    pub fn is_structured(&self) -> bool {
        matches!(self, Self::Array(_) | Self::Map(_) | Self::Reference(_))
    }

    /// Every named type this reference mentions, at any depth
    pub fn referenced_types(&self) -> Vec<&str> {
        let mut names = Vec::new();
        self.collect_references(&mut names);
        names
    }

    fn collect_references<'a>(&'a self, names: &mut Vec<&'a str>) {
        match self {
            Self::Reference(name) => names.push(name),
            Self::Array(inner) | Self::Map(inner) => inner.collect_references(names),
            Self::Union(members) => members.iter().for_each(|m| m.collect_references(names)),
            Self::Primitive(_) | Self::Any => {}
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primitive(primitive) => write!(f, "{primitive}"),
            Self::Array(item) => write!(f, "[]{item}"),
            Self::Map(value) => write!(f, "map[string]{value}"),
            Self::Reference(name) => write!(f, "#{name}"),
            Self::Union(members) => {
                let members: Vec<String> = members.iter().map(ToString::to_string).collect();
                write!(f, "{}", members.join(" | "))
            }
            Self::Any => f.write_str("any"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primitive_from_schema_type() {
        assert_eq!(PrimitiveType::from_schema_type("number"), Some(PrimitiveType::Number));
        assert_eq!(PrimitiveType::from_schema_type("object"), None);
        assert_eq!(PrimitiveType::from_schema_type("null"), None);
    }

    #[test]
    fn test_serialization() {
        let type_ref = TypeRef::map_of(TypeRef::array_of(TypeRef::reference("a/v1:B")));
        assert_eq!(
            serde_json::to_value(&type_ref).unwrap(),
            serde_json::json!({"map": {"array": {"reference": "a/v1:B"}}})
        );
        assert_eq!(serde_json::to_value(TypeRef::Any).unwrap(), serde_json::json!("any"));
        assert_eq!(
            serde_json::to_value(TypeRef::int_or_string()).unwrap(),
            serde_json::json!({"union": [{"primitive": "integer"}, {"primitive": "string"}]})
        );
    }

    #[test]
    fn test_referenced_types() {
        let type_ref = TypeRef::Union(vec![
            TypeRef::reference("A"),
            TypeRef::array_of(TypeRef::map_of(TypeRef::reference("B"))),
            TypeRef::Any,
        ]);
        assert_eq!(type_ref.referenced_types(), vec!["A", "B"]);
    }

    #[test]
    fn test_display() {
        assert_eq!(TypeRef::map_of(TypeRef::string()).to_string(), "map[string]string");
        assert_eq!(TypeRef::int_or_string().to_string(), "integer | string");
    }
}
