//! Init command implementation

use crate::config::{Config, DirectorySource, FileSource, Source, DEFAULT_CONFIG_FILES};
use anyhow::{anyhow, Result};
use clap::{ArgMatches, Command};
use std::path::PathBuf;
use tracing::info;

pub fn command() -> Command {
    Command::new("init")
        .about("Initialize a new configuration file")
        .arg(
            clap::Arg::new("output")
                .short('o')
                .long("output")
                .help("Output file path")
                .value_name("FILE")
                .default_value(DEFAULT_CONFIG_FILES[0]),
        )
        .arg(
            clap::Arg::new("example")
                .short('e')
                .long("example")
                .help("Create example configuration")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            clap::Arg::new("force")
                .short('f')
                .long("force")
                .help("Replace an existing configuration file")
                .action(clap::ArgAction::SetTrue),
        )
}

pub async fn run(matches: &ArgMatches) -> Result<()> {
    let output_path = matches
        .get_one::<String>("output")
        .map(PathBuf::from)
        .ok_or_else(|| anyhow!("Missing output path"))?;
    let example = matches.get_flag("example");

    if output_path.exists() && !matches.get_flag("force") {
        return Err(anyhow!(
            "{} already exists, use --force to replace it",
            output_path.display()
        ));
    }

    info!("Initializing configuration file: {:?}", output_path);

    let config = if example {
        create_example_config()
    } else {
        Config::default()
    };

    config.save_to_file(&output_path)?;

    info!("Configuration file created: {:?}", output_path);

    if example {
        println!("Example configuration created with sample CRD sources.");
        println!("Edit the file to customize your sources and settings.");
    } else {
        println!("Empty configuration file created.");
        println!("Add sources and settings to get started.");
    }

    Ok(())
}

pub fn create_example_config() -> Config {
    let mut config = Config::default();

    config.sources.push(Source::Directory(DirectorySource {
        name: "local-crds".to_string(),
        path: "./crds".to_string(),
        filters: Vec::new(),
        recursive: true,
    }));
    config.sources.push(Source::File(FileSource {
        name: "widgets".to_string(),
        path: "./manifests/*.yaml".to_string(),
        filters: vec!["example.com/v1*".to_string()],
    }));

    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_example_config_is_valid() {
        assert!(create_example_config().validate().is_ok());
    }
}
