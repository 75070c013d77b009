//! Group, version and token naming helpers

use crate::error::CrdError;

/// Token of one versioned custom resource: `<group>/<version>:<kind>`
pub fn resource_token(group: &str, version: &str, kind: &str) -> String {
    format!("{group}/{version}:{kind}")
}

/// Split `<group>/<version>` into its parts
pub fn split_group_version(group_version: &str) -> Result<(&str, &str), CrdError> {
    match group_version.split('/').collect::<Vec<_>>().as_slice() {
        [group, version] => Ok((group, version)),
        _ => Err(CrdError::InvalidGroupVersion(group_version.to_string())),
    }
}

/// First label of a dotted group with every non-alphanumeric character removed
pub fn group_prefix(group: &str) -> Result<String, CrdError> {
    if group.is_empty() {
        return Err(CrdError::EmptyGroup);
    }
    Ok(group
        .split('.')
        .next()
        .unwrap_or_default()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect())
}

/// Package path of a group version: `<group prefix>/<version>`
pub fn module_to_package(group_version: &str) -> Result<String, CrdError> {
    let (group, version) = split_group_version(group_version)?;
    Ok(format!("{}/{}", group_prefix(group)?, version))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_token() {
        assert_eq!(resource_token("example.com", "v1", "Widget"), "example.com/v1:Widget");
    }

    #[test]
    fn test_split_group_version() {
        assert_eq!(split_group_version("example.com/v1").unwrap(), ("example.com", "v1"));
        assert!(matches!(
            split_group_version("example.com"),
            Err(CrdError::InvalidGroupVersion(_))
        ));
        assert!(split_group_version("a/b/c").is_err());
    }

    #[test]
    fn test_group_prefix() {
        assert_eq!(group_prefix("cert-manager.io").unwrap(), "certmanager");
        assert_eq!(group_prefix("argoproj.io").unwrap(), "argoproj");
        assert!(matches!(group_prefix(""), Err(CrdError::EmptyGroup)));
    }

    #[test]
    fn test_module_to_package() {
        assert_eq!(module_to_package("cert-manager.io/v1").unwrap(), "certmanager/v1");
        assert!(matches!(module_to_package("/v1"), Err(CrdError::EmptyGroup)));
        assert!(module_to_package("v1").is_err());
    }
}
