//! Lifting of nested inline object schemas into named definitions

use crate::document::{definition_ref, OpenApiDocument};
use crate::naming::{child_type_name, property_type_name};
use crate::schema::Schema;
use tracing::{debug, warn};

/// Rewrite every nested object schema of `document` into its own definition.
///
/// A property named `parent.prop` that carries `properties` becomes the
/// definition `parent + PascalCase(prop)` and is replaced by a `$ref`. Arrays
/// and maps do not add a naming level: their item or value schema is lifted
/// under the name of the slot that holds them. Definitions are processed from
/// an explicit worklist, so stack depth does not grow with schema nesting.
///
/// Returns the names of the extracted definitions. Flattening a document that
/// is already flat extracts nothing and leaves it unchanged.
pub fn flatten(document: &mut OpenApiDocument) -> Vec<String> {
    let mut worklist: Vec<String> = document.definitions.keys().rev().cloned().collect();
    let mut extracted_names = Vec::new();

    while let Some(name) = worklist.pop() {
        let mut extracted = Vec::new();
        match document.definitions.get_mut(&name) {
            Some(definition) => flatten_node(definition, &name, true, &mut extracted),
            None => continue,
        }

        for (child_name, child) in extracted {
            if document.insert(child_name.clone(), child).is_some() {
                warn!("Nested schema {} replaces an existing definition", child_name);
            }
            worklist.push(child_name.clone());
            extracted_names.push(child_name);
        }
    }

    debug!("Flattening extracted {} definitions", extracted_names.len());
    extracted_names
}

/// Walk the inline structure of `node`, lifting nested objects out.
///
/// `name_taken` is set when `node` is itself a definition named `name`, in
/// which case its item and value schemas cannot claim that name and are
/// walked in place.
fn flatten_node(
    node: &mut Schema,
    name: &str,
    name_taken: bool,
    extracted: &mut Vec<(String, Schema)>,
) {
    if node.is_reference() || node.has_combinator() {
        return;
    }

    if let Some(properties) = node.properties.as_mut() {
        properties.retain(|property, _| !property_type_name(property).is_empty());
        for (property, child) in properties.iter_mut() {
            if let Some(child_name) = child_type_name(name, property) {
                lift(child, &child_name, extracted);
            }
        }
    }

    if let Some(items) = node.items.as_deref_mut() {
        descend(items, name, name_taken, extracted);
    }

    if let Some(values) = node.additional_properties_schema_mut() {
        descend(values, name, name_taken, extracted);
    }
}

fn descend(
    node: &mut Schema,
    name: &str,
    name_taken: bool,
    extracted: &mut Vec<(String, Schema)>,
) {
    if name_taken {
        flatten_node(node, name, true, extracted);
    } else {
        lift(node, name, extracted);
    }
}

/// Extract `slot` as the definition `name` if it is an object with fields,
/// otherwise keep looking through its items and map values.
fn lift(slot: &mut Schema, name: &str, extracted: &mut Vec<(String, Schema)>) {
    if slot.is_reference() || slot.has_combinator() {
        return;
    }

    if slot.properties.is_none() {
        flatten_node(slot, name, false, extracted);
        return;
    }

    let reference = Schema {
        reference: Some(definition_ref(name)),
        description: slot.description.clone(),
        default: slot.default.clone(),
        ..Default::default()
    };
    let nested = std::mem::replace(slot, reference);
    debug!("Extracting nested schema as {}", name);
    extracted.push((name.to_string(), nested));
}
