//! The resolved type package handed to language generators

use crate::registry::TypeRegistry;
use crate::spec::ComplexTypeSpec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypePackage {
    pub version: String,

    /// `<group>/<version>:<kind>` of every resource, in input order
    pub resource_tokens: Vec<String>,

    /// Distinct `<group>/<version>` strings, in input order
    pub group_versions: Vec<String>,

    /// `<group>/<version>` to `<group prefix>/<version>`
    pub module_to_package: BTreeMap<String, String>,

    pub types: TypeRegistry,

    /// Conflicts and skipped inputs that did not stop generation
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<String>,
}

impl TypePackage {
    /// Root types of the resources, in resource order
    pub fn resources(&self) -> impl Iterator<Item = (&str, &ComplexTypeSpec)> {
        self.resource_tokens
            .iter()
            .filter_map(|token| self.types.get(token).map(|spec| (token.as_str(), spec)))
    }

    pub fn has_resources(&self) -> bool {
        !self.resource_tokens.is_empty()
    }
}
