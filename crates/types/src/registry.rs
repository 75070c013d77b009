//! Token to named type mapping

use crate::spec::ComplexTypeSpec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// All named object types of a package, ordered by token
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeRegistry {
    types: BTreeMap<String, ComplexTypeSpec>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `spec` under `token`; an existing entry is replaced
    pub fn insert(
        &mut self,
        token: impl Into<String>,
        spec: ComplexTypeSpec,
    ) -> Option<ComplexTypeSpec> {
        let token = token.into();
        let previous = self.types.insert(token.clone(), spec);
        if let Some(previous) = &previous {
            if Some(previous) != self.types.get(&token) {
                debug!("Type {} registered again with different content", token);
            }
        }
        previous
    }

    pub fn get(&self, token: &str) -> Option<&ComplexTypeSpec> {
        self.types.get(token)
    }

    pub fn contains(&self, token: &str) -> bool {
        self.types.contains_key(token)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ComplexTypeSpec)> {
        self.types.iter()
    }

    pub fn tokens(&self) -> impl Iterator<Item = &String> {
        self.types.keys()
    }

    /// `(type, missing reference)` pairs for references to unregistered types
    pub fn dangling_references(&self) -> Vec<(String, String)> {
        let mut dangling = Vec::new();
        for (token, spec) in &self.types {
            for name in spec.referenced_types() {
                if !self.types.contains_key(name) {
                    dangling.push((token.clone(), name.to_string()));
                }
            }
        }
        dangling
    }
}
