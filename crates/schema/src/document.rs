//! OpenAPI document holding named schema definitions

use crate::schema::Schema;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

pub const DEFINITION_PREFIX: &str = "#/definitions/";

/// A set of named definitions that schemas reference with `$ref`.
///
/// Definitions are only ever added or replaced, never removed.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OpenApiDocument {
    #[serde(default)]
    pub definitions: IndexMap<String, Schema>,
}

impl OpenApiDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insertion, mostly useful in tests
    pub fn with_definition(mut self, name: impl Into<String>, schema: Schema) -> Self {
        self.definitions.insert(name.into(), schema);
        self
    }

    /// Add or replace a definition, returning the replaced one
    pub fn insert(&mut self, name: impl Into<String>, schema: Schema) -> Option<Schema> {
        self.definitions.insert(name.into(), schema)
    }

    pub fn get(&self, name: &str) -> Option<&Schema> {
        self.definitions.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.definitions.contains_key(name)
    }

    /// Look up the definition a `$ref` pointer designates
    pub fn resolve_ref(&self, reference: &str) -> Option<(String, &Schema)> {
        let name = definition_name(reference)?;
        let schema = self.definitions.get(&name)?;
        Some((name, schema))
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

/// JSON pointer to the definition `name`.
///
/// Type names embed `/` (e.g. `example.com/v1:Widget`), so the name is escaped
/// per RFC 6901.
pub fn definition_ref(name: &str) -> String {
    format!(
        "{DEFINITION_PREFIX}{}",
        name.replace('~', "~0").replace('/', "~1")
    )
}

/// Definition name designated by a local pointer; `None` for anything else
pub fn definition_name(reference: &str) -> Option<String> {
    reference
        .strip_prefix(DEFINITION_PREFIX)
        .filter(|name| !name.is_empty())
        .map(|name| name.replace("~1", "/").replace("~0", "~"))
}
