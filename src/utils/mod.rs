//! Utility functions for crd2types

use anyhow::{anyhow, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Ensure a directory exists, creating it if necessary
pub fn ensure_directory(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    } else if !path.is_dir() {
        return Err(anyhow!("Path exists but is not a directory: {:?}", path));
    }
    Ok(())
}

/// Whether a file looks like a YAML or JSON manifest
pub fn is_manifest_file(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("yaml") | Some("yml") | Some("json")
    )
}

/// Find all YAML and JSON files in a directory, sorted by path
pub fn find_manifest_files(dir: &Path, recursive: bool) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(anyhow!("Not a directory: {:?}", dir));
    }

    let mut walker = WalkDir::new(dir).sort_by_file_name();
    if !recursive {
        walker = walker.max_depth(1);
    }

    let files = walker
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file() && is_manifest_file(e.path()))
        .map(|e| e.path().to_path_buf())
        .collect();

    Ok(files)
}

/// Expand `~` and environment variables in a configured path
pub fn expand_path(path: &str) -> Result<PathBuf> {
    let expanded = shellexpand::full(path)
        .map_err(|e| anyhow!("Failed to expand {:?}: {}", path, e))?;
    Ok(PathBuf::from(expanded.as_ref()))
}

/// Files matched by a path that may contain glob characters, sorted
pub fn expand_file_pattern(pattern: &str) -> Result<Vec<PathBuf>> {
    let expanded = expand_path(pattern)?;
    let expanded = expanded.to_string_lossy();

    if !expanded.contains(|c: char| matches!(c, '*' | '?' | '[')) {
        return Ok(vec![PathBuf::from(expanded.as_ref())]);
    }

    let mut files = Vec::new();
    for entry in glob::glob(&expanded).with_context(|| format!("Invalid pattern {expanded:?}"))? {
        let path = entry?;
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Format duration as human readable string
pub fn format_duration(duration: std::time::Duration) -> String {
    let secs = duration.as_secs();
    let millis = duration.subsec_millis();

    if secs > 0 {
        format!("{secs}.{millis:03}s")
    } else {
        format!("{millis}ms")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_find_manifest_files() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("nested");
        fs::create_dir(&nested).unwrap();
        fs::write(temp_dir.path().join("b.yaml"), "").unwrap();
        fs::write(temp_dir.path().join("a.json"), "").unwrap();
        fs::write(temp_dir.path().join("notes.md"), "").unwrap();
        fs::write(nested.join("c.yml"), "").unwrap();

        let names = |files: Vec<PathBuf>| -> Vec<String> {
            files
                .iter()
                .map(|f| f.file_name().unwrap().to_string_lossy().into_owned())
                .collect()
        };

        let all = find_manifest_files(temp_dir.path(), true).unwrap();
        assert_eq!(names(all), vec!["a.json", "b.yaml", "c.yml"]);

        let top = find_manifest_files(temp_dir.path(), false).unwrap();
        assert_eq!(names(top), vec!["a.json", "b.yaml"]);

        assert!(find_manifest_files(&temp_dir.path().join("missing"), true).is_err());
    }

    #[test]
    fn test_expand_file_pattern() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("one.yaml"), "").unwrap();
        fs::write(temp_dir.path().join("two.yaml"), "").unwrap();
        fs::write(temp_dir.path().join("three.json"), "").unwrap();

        let pattern = format!("{}/*.yaml", temp_dir.path().display());
        let files = expand_file_pattern(&pattern).unwrap();
        assert_eq!(
            files,
            vec![temp_dir.path().join("one.yaml"), temp_dir.path().join("two.yaml")]
        );

        let plain = temp_dir.path().join("three.json");
        assert_eq!(
            expand_file_pattern(&plain.to_string_lossy()).unwrap(),
            vec![plain]
        );
    }

    #[test]
    fn test_expand_path() {
        std::env::set_var("CRD2TYPES_TEST_DIR", "/tmp/crds");
        assert_eq!(
            expand_path("$CRD2TYPES_TEST_DIR/widget.yaml").unwrap(),
            PathBuf::from("/tmp/crds/widget.yaml")
        );
        assert!(expand_path("$CRD2TYPES_UNSET_VARIABLE_XYZ/a").is_err());
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(std::time::Duration::from_millis(250)), "250ms");
        assert_eq!(format_duration(std::time::Duration::from_millis(1500)), "1.500s");
    }
}
