//! Derivation of type names for nested schemas

use heck::ToUpperCamelCase;

/// Suffix contributed by a property to the name of its nested type.
///
/// `arg` and `args` map to `Arguments` since generated SDKs reserve them.
pub fn property_type_name(property: &str) -> String {
    match property {
        "arg" | "args" => "Arguments".to_string(),
        _ => capitalize_after_digits(&property.to_upper_camel_case()),
    }
}

/// Start a new word at every letter that follows a digit, e.g. `V1beta1` -> `V1Beta1`
fn capitalize_after_digits(name: &str) -> String {
    let mut after_digit = false;
    name.chars()
        .map(|c| {
            let c = if after_digit { c.to_ascii_uppercase() } else { c };
            after_digit = c.is_ascii_digit();
            c
        })
        .collect()
}

/// Name of the type nested under `parent` through `property`.
///
/// Returns `None` for properties without a usable name (e.g. `"-"`), which
/// callers drop.
pub fn child_type_name(parent: &str, property: &str) -> Option<String> {
    let suffix = property_type_name(property);
    if suffix.is_empty() {
        None
    } else {
        Some(format!("{parent}{suffix}"))
    }
}
