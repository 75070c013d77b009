//! CRD parser implementation

use crate::error::CrdError;
use crate::resource::{CrdVersion, CustomResource};
use crd2types_schema::Schema;
use serde::Deserialize;
use serde_yaml::Value;
use std::path::Path;
use tracing::debug;

pub const CRD_KIND: &str = "CustomResourceDefinition";

/// Parses CustomResourceDefinitions out of YAML or JSON streams
#[derive(Debug, Clone, Default)]
pub struct CrdParser {
    filters: Vec<String>,
}

impl CrdParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep only versions whose `<group>/<version>` matches one of the globs
    pub fn with_filters(filters: Vec<String>) -> Self {
        Self { filters }
    }

    /// Split a stream into its documents.
    ///
    /// Lists (`kind: List` or `CustomResourceDefinitionList`) are expanded into
    /// their items. Empty documents are dropped.
    pub fn parse_documents(&self, content: &str) -> Result<Vec<Value>, CrdError> {
        let mut documents = Vec::new();
        for document in serde_yaml::Deserializer::from_str(content) {
            let value = Value::deserialize(document)?;
            if value.is_null() {
                continue;
            }
            match value.get("items").and_then(Value::as_sequence) {
                Some(items) if is_list(&value) => documents.extend(items.iter().cloned()),
                _ => documents.push(value),
            }
        }
        Ok(documents)
    }

    /// Parse every CRD of a stream, failing on the first malformed one
    pub fn parse_str(
        &self,
        content: &str,
        source_path: Option<&Path>,
    ) -> Result<Vec<CustomResource>, CrdError> {
        let mut resources = Vec::new();
        for document in self.parse_documents(content)? {
            if let Some(crd) = self.extract_crd_from_document(&document, source_path)? {
                resources.push(crd);
            }
        }
        Ok(resources)
    }

    /// Extract a CRD from one document. Documents of any other kind yield `None`.
    pub fn extract_crd_from_document(
        &self,
        doc: &Value,
        source_path: Option<&Path>,
    ) -> Result<Option<CustomResource>, CrdError> {
        if doc.get("kind").and_then(Value::as_str) != Some(CRD_KIND) {
            return Ok(None);
        }

        let spec = doc.get("spec").ok_or(CrdError::MissingField("spec"))?;
        let names = spec.get("names");
        let kind = string_at(names, "kind").ok_or(CrdError::MissingField("spec.names.kind"))?;
        let plural =
            string_at(names, "plural").ok_or(CrdError::MissingField("spec.names.plural"))?;
        let group = spec
            .get("group")
            .and_then(Value::as_str)
            .ok_or(CrdError::MissingField("spec.group"))?;

        let name = doc
            .get("metadata")
            .and_then(|m| m.get("name"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| format!("{plural}.{group}"));

        let mut crd = CustomResource {
            versions: self.extract_versions(spec, &name)?,
            name,
            api_version: doc
                .get("apiVersion")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            group: group.to_string(),
            kind: kind.to_string(),
            plural: plural.to_string(),
            singular: string_at(names, "singular")
                .map(str::to_string)
                .unwrap_or_else(|| kind.to_lowercase()),
            list_kind: string_at(names, "listKind")
                .map(str::to_string)
                .unwrap_or_else(|| format!("{kind}List")),
            source_path: source_path.map(Path::to_path_buf),
        };
        crd.retain_versions(&self.filters);

        debug!(
            "Parsed CRD {} with {} versions",
            crd.name,
            crd.versions.len()
        );
        Ok(Some(crd))
    }

    /// Served versions with their schema.
    ///
    /// A top-level `spec.validation.openAPIV3Schema` (apiextensions v1beta1)
    /// applies to `spec.version` or to every listed version. Versions without
    /// any schema are skipped.
    fn extract_versions(&self, spec: &Value, crd_name: &str) -> Result<Vec<CrdVersion>, CrdError> {
        let shared = spec
            .get("validation")
            .and_then(|v| v.get("openAPIV3Schema"))
            .map(|schema| decode_schema(schema, crd_name, "*"))
            .transpose()?;

        let listed = spec.get("versions").and_then(Value::as_sequence);
        let mut versions = Vec::new();

        match (listed, spec.get("version").and_then(Value::as_str)) {
            (Some(listed), _) => {
                for version in listed {
                    let name = version
                        .get("name")
                        .and_then(Value::as_str)
                        .ok_or(CrdError::MissingField("spec.versions[].name"))?;

                    if !version.get("served").and_then(Value::as_bool).unwrap_or(true) {
                        debug!("Skipping version {} of {}: not served", name, crd_name);
                        continue;
                    }

                    let schema = match version.get("schema").and_then(|s| s.get("openAPIV3Schema")) {
                        Some(schema) => decode_schema(schema, crd_name, name)?,
                        None => match &shared {
                            Some(schema) => schema.clone(),
                            None => {
                                debug!("Skipping version {} of {}: no schema", name, crd_name);
                                continue;
                            }
                        },
                    };

                    versions.push(CrdVersion {
                        name: name.to_string(),
                        schema,
                    });
                }
            }
            (None, Some(name)) => {
                if let Some(schema) = shared {
                    versions.push(CrdVersion {
                        name: name.to_string(),
                        schema,
                    });
                }
            }
            (None, None) => return Err(CrdError::MissingField("spec.versions")),
        }

        Ok(versions)
    }
}

fn decode_schema(value: &Value, crd_name: &str, version: &str) -> Result<Schema, CrdError> {
    Schema::from_value(value.clone()).map_err(|source| CrdError::InvalidSchema {
        crd: crd_name.to_string(),
        version: version.to_string(),
        source,
    })
}

fn string_at<'a>(parent: Option<&'a Value>, key: &str) -> Option<&'a str> {
    parent.and_then(|p| p.get(key)).and_then(Value::as_str)
}

fn is_list(doc: &Value) -> bool {
    matches!(
        doc.get("kind").and_then(Value::as_str),
        Some("List") | Some("CustomResourceDefinitionList")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const WIDGET_CRD: &str = r#"
apiVersion: apiextensions.k8s.io/v1
kind: CustomResourceDefinition
metadata:
  name: widgets.example.com
spec:
  group: example.com
  names:
    kind: Widget
    plural: widgets
  scope: Namespaced
  versions:
    - name: v1alpha1
      served: false
      storage: false
      schema:
        openAPIV3Schema:
          type: object
    - name: v1
      served: true
      storage: true
      schema:
        openAPIV3Schema:
          type: object
          properties:
            spec:
              type: object
              properties:
                size:
                  type: integer
"#;

    #[test]
    fn test_parse_crd() {
        let crds = CrdParser::new().parse_str(WIDGET_CRD, None).unwrap();
        assert_eq!(crds.len(), 1);

        let crd = &crds[0];
        assert_eq!(crd.name, "widgets.example.com");
        assert_eq!(crd.group, "example.com");
        assert_eq!(crd.kind, "Widget");
        assert_eq!(crd.singular, "widget");
        assert_eq!(crd.list_kind, "WidgetList");
        assert_eq!(crd.resource_tokens(), vec!["example.com/v1:Widget"]);
    }

    #[test]
    fn test_multi_document_stream() {
        let content = format!(
            "apiVersion: v1\nkind: ConfigMap\nmetadata:\n  name: other\n---\n{}\n---\n",
            WIDGET_CRD
        );
        let crds = CrdParser::new().parse_str(&content, None).unwrap();
        assert_eq!(crds.len(), 1);
        assert_eq!(crds[0].kind, "Widget");
    }

    #[test]
    fn test_list_documents_are_expanded() {
        let content = r#"
apiVersion: v1
kind: List
items:
  - apiVersion: apiextensions.k8s.io/v1
    kind: CustomResourceDefinition
    spec:
      group: example.com
      names: {kind: Gadget, plural: gadgets}
      versions:
        - name: v1
          schema:
            openAPIV3Schema: {type: object}
"#;
        let crds = CrdParser::new().parse_str(content, None).unwrap();
        assert_eq!(crds.len(), 1);
        assert_eq!(crds[0].name, "gadgets.example.com");
        assert_eq!(crds[0].versions[0].name, "v1");
    }

    #[test]
    fn test_legacy_validation_applies_to_versions() {
        let content = r#"
apiVersion: apiextensions.k8s.io/v1beta1
kind: CustomResourceDefinition
metadata:
  name: gizmos.example.com
spec:
  group: example.com
  names:
    kind: Gizmo
    plural: gizmos
    listKind: GizmoCollection
  versions:
    - name: v1beta1
    - name: v1
  validation:
    openAPIV3Schema:
      type: object
      properties:
        spec:
          type: object
"#;
        let crd = CrdParser::new().parse_str(content, None).unwrap().remove(0);
        assert_eq!(crd.list_kind, "GizmoCollection");
        assert_eq!(
            crd.resource_tokens(),
            vec!["example.com/v1beta1:Gizmo", "example.com/v1:Gizmo"]
        );
        assert_eq!(crd.versions[0].schema, crd.versions[1].schema);
    }

    #[test]
    fn test_legacy_single_version() {
        let content = r#"
kind: CustomResourceDefinition
spec:
  group: example.com
  version: v1beta1
  names: {kind: Gizmo, plural: gizmos}
  validation:
    openAPIV3Schema: {type: object}
"#;
        let crd = CrdParser::new().parse_str(content, None).unwrap().remove(0);
        assert_eq!(crd.group_versions(), vec!["example.com/v1beta1"]);
    }

    #[test]
    fn test_missing_fields_are_errors() {
        let no_group = "kind: CustomResourceDefinition\nspec:\n  names: {kind: A, plural: as}\n  versions: []\n";
        assert!(matches!(
            CrdParser::new().parse_str(no_group, None),
            Err(CrdError::MissingField("spec.group"))
        ));

        let no_plural = "kind: CustomResourceDefinition\nspec:\n  group: g.io\n  names: {kind: A}\n  versions: []\n";
        assert!(matches!(
            CrdParser::new().parse_str(no_plural, None),
            Err(CrdError::MissingField("spec.names.plural"))
        ));

        let no_kind = "kind: CustomResourceDefinition\nspec:\n  group: g.io\n  names: {plural: as}\n  versions: []\n";
        assert!(matches!(
            CrdParser::new().parse_str(no_kind, None),
            Err(CrdError::MissingField("spec.names.kind"))
        ));
    }

    #[test]
    fn test_invalid_schema_names_the_version() {
        let content = r#"
kind: CustomResourceDefinition
spec:
  group: example.com
  names: {kind: Bad, plural: bads}
  versions:
    - name: v1
      schema:
        openAPIV3Schema:
          properties: [not, a, map]
"#;
        match CrdParser::new().parse_str(content, None) {
            Err(CrdError::InvalidSchema { crd, version, .. }) => {
                assert_eq!(crd, "bads.example.com");
                assert_eq!(version, "v1");
            }
            other => panic!("expected an invalid schema error, got {other:?}"),
        }
    }

    #[test]
    fn test_version_filters() {
        let parser = CrdParser::with_filters(vec!["example.com/v2*".to_string()]);
        let crd = parser.parse_str(WIDGET_CRD, None).unwrap().remove(0);
        assert!(!crd.has_schemas());
    }

    #[test]
    fn test_json_documents() {
        let content = r#"{"kind": "CustomResourceDefinition", "spec": {"group": "example.com",
            "names": {"kind": "Gadget", "plural": "gadgets"},
            "versions": [{"name": "v1", "schema": {"openAPIV3Schema": {"type": "object"}}}]}}"#;

        let crds = CrdParser::new()
            .parse_str(content, Some(Path::new("crds/gadget.json")))
            .unwrap();
        assert_eq!(crds.len(), 1);
        assert_eq!(crds[0].kind, "Gadget");
        assert_eq!(crds[0].name, "gadgets.example.com");
        assert_eq!(
            crds[0].source_path.as_deref(),
            Some(Path::new("crds/gadget.json"))
        );
    }
}
