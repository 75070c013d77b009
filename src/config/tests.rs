//! Configuration tests

use super::*;
use pretty_assertions::assert_eq;
use std::path::PathBuf;
use tempfile::NamedTempFile;

fn file_source(name: &str, path: &str) -> Source {
    Source::File(FileSource {
        name: name.to_string(),
        path: path.to_string(),
        filters: vec!["example.com/v1".to_string()],
    })
}

#[test]
fn test_config_serialization() {
    let mut config = Config::default();
    config.sources.push(file_source("widgets", "crds/widget.yaml"));

    let yaml = serde_yaml::to_string(&config).unwrap();
    let parsed: Config = serde_yaml::from_str(&yaml).unwrap();
    assert_eq!(config, parsed);
}

#[test]
fn test_config_from_file() {
    let mut config = Config::default();
    config.sources.push(file_source("widgets", "crds/widget.yaml"));
    config.output.format = OutputFormat::Yaml;
    config.generation.fail_fast = true;

    let temp_file = NamedTempFile::new().unwrap();
    config.save_to_file(temp_file.path()).unwrap();

    let loaded = Config::from_file(temp_file.path()).unwrap();
    assert_eq!(config, loaded);
}

#[test]
fn test_minimal_config_uses_defaults() {
    let config: Config = serde_yaml::from_str(
        r#"
version: "1.0"
sources:
  - type: directory
    name: upstream
    path: ./crds
"#,
    )
    .unwrap();

    assert!(config.validate().is_ok());
    assert_eq!(config.output, OutputConfig::default());
    assert_eq!(config.generation, GenerationConfig::default());
    match &config.sources[0] {
        Source::Directory(directory) => {
            assert!(directory.recursive);
            assert!(directory.filters.is_empty());
        }
        other => panic!("expected a directory source, got {other:?}"),
    }
}

#[test]
fn test_config_validation() {
    let mut config = Config::default();
    assert!(config.validate().is_err());

    config.sources.push(file_source("widgets", "crds/widget.yaml"));
    assert!(config.validate().is_ok());

    config.version = "2.0".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn test_source_validation() {
    assert!(file_source("", "crds/widget.yaml").validate().is_err());
    assert!(file_source("widgets", "").validate().is_err());

    let bad_filter = Source::File(FileSource {
        name: "widgets".to_string(),
        path: "crds/widget.yaml".to_string(),
        filters: vec!["example.com/[v1".to_string()],
    });
    assert!(bad_filter.validate().is_err());

    let url = Source::Url(UrlSource {
        name: "remote".to_string(),
        url: "ftp://example.com/crds.yaml".to_string(),
        filters: Vec::new(),
    });
    assert!(url.validate().is_err());
}

#[test]
fn test_generation_validation() {
    let generation = GenerationConfig {
        max_workers: 0,
        ..Default::default()
    };
    assert!(generation.validate().is_err());
}

#[test]
fn test_output_file_path() {
    let output = OutputConfig {
        path: PathBuf::from("out"),
        format: OutputFormat::Yaml,
        overwrite: false,
    };
    assert_eq!(output.file_path(), PathBuf::from("out/types.yaml"));
    assert_eq!(OutputConfig::default().file_path(), PathBuf::from("./generated/types.json"));
}
