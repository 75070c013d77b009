//! Registry construction across CRDs and their versions

use crate::object_meta::{object_meta_spec, OBJECT_META_TOKEN};
use crate::package::TypePackage;
use crate::registry::TypeRegistry;
use crate::resolver::TypeResolver;
use crate::spec::{ComplexTypeSpec, PropertySpec};
use crate::type_ref::TypeRef;
use crd2types_crd::{module_to_package, CrdError, CustomResource};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// Fields every Kubernetes object carries
pub const ENVELOPE_FIELDS: [&str; 3] = ["apiVersion", "kind", "metadata"];

#[derive(Debug, Clone)]
pub struct BuilderOptions {
    /// Version recorded in the package
    pub package_version: String,

    /// Register `meta/v1:ObjectMeta` so `metadata` references resolve locally
    pub include_object_meta: bool,
}

impl Default for BuilderOptions {
    fn default() -> Self {
        Self {
            package_version: "0.1.0".to_string(),
            include_object_meta: true,
        }
    }
}

/// Resolves CRDs one at a time into a single registry
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    options: BuilderOptions,
    registry: TypeRegistry,
    resource_tokens: Vec<String>,
    group_versions: Vec<String>,
    diagnostics: Vec<String>,
}

impl RegistryBuilder {
    pub fn new(options: BuilderOptions) -> Self {
        Self {
            options,
            ..Default::default()
        }
    }

    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    pub fn diagnostics(&self) -> &[String] {
        &self.diagnostics
    }

    /// Resolve every version of `crd` and register its types.
    ///
    /// Returns the resource tokens added. A CRD without any schema adds
    /// nothing. Errors leave the registry untouched.
    pub fn add_crd(&mut self, crd: &CustomResource) -> Result<Vec<String>, CrdError> {
        if !crd.has_schemas() {
            warn!("Skipping CRD {}: no served version has a schema", crd.name);
            self.diagnostics
                .push(format!("{}: skipped, no served version has a schema", crd.name));
            return Ok(Vec::new());
        }

        let merged = crd.openapi_document()?;
        for conflict in &merged.conflicts {
            self.diagnostics.push(format!(
                "{}: definition {} differs between versions, the later version wins",
                crd.name, conflict
            ));
        }

        let document = merged.document;
        let mut resolver = TypeResolver::new(&document, &mut self.registry);
        let mut added = Vec::new();

        for version in &crd.versions {
            let token = crd.resource_token(&version.name);
            let Some(root) = document.get(&token) else {
                continue;
            };

            // Nested types of a root that preserves unknown fields stay
            // registered; the root itself is reduced to the envelope.
            let body = root
                .properties
                .as_ref()
                .map(|_| resolver.build_type(root, &token));
            let mut spec = if root.preserves_unknown_fields() {
                ComplexTypeSpec::object()
            } else if let Some(body) = body {
                body
            } else {
                warn!("Resource {} has no properties, no type registered", token);
                self.diagnostics
                    .push(format!("{token}: skipped, the schema declares no properties"));
                continue;
            };

            add_envelope(&mut spec, &crd.group_version(&version.name), &crd.kind);
            resolver.register(&token, spec);

            if self.resource_tokens.contains(&token) {
                self.diagnostics.push(format!(
                    "{token}: defined by more than one CRD, the last definition wins"
                ));
            } else {
                self.resource_tokens.push(token.clone());
            }

            let group_version = crd.group_version(&version.name);
            if !self.group_versions.contains(&group_version) {
                self.group_versions.push(group_version);
            }

            debug!("Registered resource {}", token);
            added.push(token);
        }

        Ok(added)
    }

    /// Finish the registry into a package
    pub fn build(mut self) -> Result<TypePackage, CrdError> {
        if self.options.include_object_meta {
            self.registry.insert(OBJECT_META_TOKEN, object_meta_spec());
        }

        let mut packages = BTreeMap::new();
        for group_version in &self.group_versions {
            packages.insert(group_version.clone(), module_to_package(group_version)?);
        }

        for (token, missing) in self.registry.dangling_references() {
            if missing == OBJECT_META_TOKEN {
                continue;
            }
            warn!("Type {} references unknown type {}", token, missing);
            self.diagnostics
                .push(format!("{token}: references unknown type {missing}"));
        }

        info!(
            "Resolved {} types for {} resources",
            self.registry.len(),
            self.resource_tokens.len()
        );

        Ok(TypePackage {
            version: self.options.package_version,
            resource_tokens: self.resource_tokens,
            group_versions: self.group_versions,
            module_to_package: packages,
            types: self.registry,
            diagnostics: self.diagnostics,
        })
    }
}

/// Force the `apiVersion`, `kind` and `metadata` fields onto a resource root
fn add_envelope(spec: &mut ComplexTypeSpec, api_version: &str, kind: &str) {
    spec.properties.insert(
        "apiVersion".to_string(),
        PropertySpec::new(TypeRef::string()).with_const(api_version),
    );
    spec.properties.insert(
        "kind".to_string(),
        PropertySpec::new(TypeRef::string()).with_const(kind),
    );
    spec.properties.insert(
        "metadata".to_string(),
        PropertySpec::new(TypeRef::reference(OBJECT_META_TOKEN)),
    );

    for field in ENVELOPE_FIELDS {
        spec.require(field);
    }
    spec.required_outputs = Some(spec.property_names());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::ObjectShape;
    use crd2types_crd::CrdParser;
    use pretty_assertions::assert_eq;

    fn crd(yaml: &str) -> CustomResource {
        CrdParser::new().parse_str(yaml, None).unwrap().remove(0)
    }

    fn build(crds: &[CustomResource]) -> TypePackage {
        let mut builder = RegistryBuilder::new(BuilderOptions::default());
        for crd in crds {
            builder.add_crd(crd).unwrap();
        }
        builder.build().unwrap()
    }

    const WIDGET: &str = r#"
apiVersion: apiextensions.k8s.io/v1
kind: CustomResourceDefinition
metadata:
  name: widgets.example.com
spec:
  group: example.com
  names: {kind: Widget, plural: widgets}
  versions:
    - name: v1
      served: true
      schema:
        openAPIV3Schema:
          type: object
          required: [spec]
          properties:
            spec:
              type: object
              description: Desired state
              properties:
                size:
                  type: integer
                  default: 3
                selector:
                  type: object
                  additionalProperties:
                    type: string
                ports:
                  type: array
                  items:
                    type: object
                    properties:
                      port:
                        x-kubernetes-int-or-string: true
"#;

    #[test]
    fn test_envelope_injection() {
        let package = build(&[crd(WIDGET)]);
        let widget = package.types.get("example.com/v1:Widget").unwrap();

        let mut required = widget.required.clone();
        required.sort();
        assert_eq!(required, vec!["apiVersion", "kind", "metadata", "spec"]);

        assert_eq!(
            widget.properties["apiVersion"].const_value,
            Some(serde_json::json!("example.com/v1"))
        );
        assert_eq!(
            widget.properties["kind"].const_value,
            Some(serde_json::json!("Widget"))
        );
        assert_eq!(
            widget.properties["metadata"].type_ref,
            TypeRef::reference(OBJECT_META_TOKEN)
        );
        assert_eq!(
            widget.required_outputs,
            Some(vec![
                "spec".to_string(),
                "apiVersion".to_string(),
                "kind".to_string(),
                "metadata".to_string()
            ])
        );
    }

    #[test]
    fn test_nested_types_are_named_and_resolvable() {
        let package = build(&[crd(WIDGET)]);

        let tokens: Vec<&String> = package.types.tokens().collect();
        assert_eq!(
            tokens,
            vec![
                "example.com/v1:Widget",
                "example.com/v1:WidgetSpec",
                "example.com/v1:WidgetSpecPorts",
                "example.com/v1:WidgetSpecSelector",
                OBJECT_META_TOKEN,
            ]
        );

        let spec = package.types.get("example.com/v1:WidgetSpec").unwrap();
        assert_eq!(spec.description.as_deref(), Some("Desired state"));
        assert_eq!(spec.properties["size"].default, Some(serde_json::json!(3)));
        assert_eq!(
            spec.properties["selector"].type_ref,
            TypeRef::map_of(TypeRef::string())
        );
        assert_eq!(
            spec.properties["ports"].type_ref,
            TypeRef::array_of(TypeRef::reference("example.com/v1:WidgetSpecPorts"))
        );
        assert_eq!(
            package.types.get("example.com/v1:WidgetSpecSelector").unwrap().shape,
            ObjectShape::Map
        );
        assert_eq!(
            package.types.get("example.com/v1:WidgetSpecPorts").unwrap().properties["port"].type_ref,
            TypeRef::int_or_string()
        );

        assert!(package.types.dangling_references().is_empty());
        assert!(package.diagnostics.is_empty());
    }

    #[test]
    fn test_package_metadata() {
        let package = build(&[crd(WIDGET)]);
        assert_eq!(package.version, "0.1.0");
        assert_eq!(package.resource_tokens, vec!["example.com/v1:Widget"]);
        assert_eq!(package.group_versions, vec!["example.com/v1"]);
        assert_eq!(
            package.module_to_package.get("example.com/v1").map(String::as_str),
            Some("example/v1")
        );
        assert_eq!(package.resources().count(), 1);
    }

    #[test]
    fn test_envelope_fields_are_not_duplicated() {
        let package = build(&[crd(r#"
kind: CustomResourceDefinition
spec:
  group: example.com
  names: {kind: Gadget, plural: gadgets}
  versions:
    - name: v1
      schema:
        openAPIV3Schema:
          type: object
          required: [kind, spec]
          properties:
            kind: {type: string, description: Kind of object}
            spec: {type: object}
"#)]);
        let gadget = package.types.get("example.com/v1:Gadget").unwrap();
        assert_eq!(gadget.required, vec!["kind", "spec", "apiVersion", "metadata"]);
        assert_eq!(
            gadget.property_names(),
            vec!["kind", "spec", "apiVersion", "metadata"]
        );
    }

    #[test]
    fn test_preserve_unknown_fields_root() {
        let package = build(&[crd(r#"
kind: CustomResourceDefinition
spec:
  group: example.com
  names: {kind: Blob, plural: blobs}
  versions:
    - name: v1
      schema:
        openAPIV3Schema:
          type: object
          x-kubernetes-preserve-unknown-fields: true
"#)]);
        let blob = package.types.get("example.com/v1:Blob").unwrap();
        assert_eq!(blob.property_names(), vec!["apiVersion", "kind", "metadata"]);
        assert_eq!(blob.required, vec!["apiVersion", "kind", "metadata"]);
    }

    #[test]
    fn test_preserve_unknown_fields_overrides_root_properties() {
        let package = build(&[crd(r#"
kind: CustomResourceDefinition
spec:
  group: example.com
  names: {kind: Bag, plural: bags}
  versions:
    - name: v1
      schema:
        openAPIV3Schema:
          type: object
          x-kubernetes-preserve-unknown-fields: true
          required: [spec]
          properties:
            spec:
              type: object
              properties:
                size: {type: integer}
"#)]);
        let bag = package.types.get("example.com/v1:Bag").unwrap();
        assert_eq!(bag.property_names(), vec!["apiVersion", "kind", "metadata"]);
        assert_eq!(bag.required, vec!["apiVersion", "kind", "metadata"]);
        assert_eq!(package.resource_tokens, vec!["example.com/v1:Bag"]);
        assert!(package.types.contains("example.com/v1:BagSpec"));
    }

    #[test]
    fn test_root_without_properties_is_skipped() {
        let package = build(&[crd(r#"
kind: CustomResourceDefinition
spec:
  group: example.com
  names: {kind: Empty, plural: empties}
  versions:
    - name: v1
      schema:
        openAPIV3Schema:
          type: object
"#)]);
        assert!(!package.has_resources());
        assert_eq!(package.diagnostics.len(), 1);
    }

    #[test]
    fn test_versions_share_the_registry() {
        let package = build(&[crd(r#"
kind: CustomResourceDefinition
metadata:
  name: gizmos.example.com
spec:
  group: example.com
  names: {kind: Gizmo, plural: gizmos}
  versions:
    - name: v1alpha1
      schema:
        openAPIV3Schema:
          type: object
          properties:
            spec:
              type: object
              properties:
                legacy: {type: boolean}
    - name: v1
      schema:
        openAPIV3Schema:
          type: object
          properties:
            spec:
              type: object
              properties:
                size: {type: integer}
"#)]);
        assert_eq!(
            package.resource_tokens,
            vec!["example.com/v1alpha1:Gizmo", "example.com/v1:Gizmo"]
        );
        assert_eq!(
            package.group_versions,
            vec!["example.com/v1alpha1", "example.com/v1"]
        );
        assert!(package.types.contains("example.com/v1alpha1:GizmoSpec"));
        assert!(package.types.contains("example.com/v1:GizmoSpec"));
    }

    #[test]
    fn test_duplicate_resources_are_reported() {
        let package = build(&[crd(WIDGET), crd(WIDGET)]);
        assert_eq!(package.resource_tokens.len(), 1);
        assert_eq!(package.diagnostics.len(), 1);
        assert!(package.diagnostics[0].contains("more than one CRD"));
    }

    #[test]
    fn test_crd_without_schemas_is_skipped() {
        let mut widget = crd(WIDGET);
        widget.versions.clear();

        let mut builder = RegistryBuilder::new(BuilderOptions::default());
        assert!(builder.add_crd(&widget).unwrap().is_empty());
        assert_eq!(builder.diagnostics().len(), 1);
        assert!(builder.registry().is_empty());
    }

    #[test]
    fn test_object_meta_can_be_left_out() {
        let mut builder = RegistryBuilder::new(BuilderOptions {
            include_object_meta: false,
            ..Default::default()
        });
        builder.add_crd(&crd(WIDGET)).unwrap();
        let package = builder.build().unwrap();

        assert!(!package.types.contains(OBJECT_META_TOKEN));
        assert!(package.diagnostics.is_empty());
    }

    #[test]
    fn test_build_is_deterministic() {
        assert_eq!(build(&[crd(WIDGET)]), build(&[crd(WIDGET)]));
    }
}
