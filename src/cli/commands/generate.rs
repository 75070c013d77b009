//! Generate command implementation

use crate::cli::utils;
use crate::config::OutputFormat;
use anyhow::{anyhow, Result};
use clap::{ArgMatches, Command};
use std::path::PathBuf;
use tracing::info;

pub fn command() -> Command {
    Command::new("generate")
        .about("Resolve configured CRD sources into a type package")
        .arg(
            clap::Arg::new("config")
                .short('c')
                .long("config")
                .help("Configuration file path")
                .value_name("FILE"),
        )
        .arg(
            clap::Arg::new("output")
                .short('o')
                .long("output")
                .help("Output directory")
                .value_name("DIR"),
        )
        .arg(
            clap::Arg::new("format")
                .long("format")
                .help("Output format")
                .value_parser(["json", "yaml"]),
        )
        .arg(
            clap::Arg::new("force")
                .short('f')
                .long("force")
                .help("Overwrite an existing package file")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            clap::Arg::new("dry-run")
                .long("dry-run")
                .help("Don't write files")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            clap::Arg::new("fail-fast")
                .long("fail-fast")
                .help("Stop on the first malformed CRD")
                .action(clap::ArgAction::SetTrue),
        )
}

pub async fn run(matches: &ArgMatches) -> Result<()> {
    info!("Starting type generation");

    let mut config = utils::load_config(matches)?;

    // Override output path if specified
    if let Some(output_path) = matches.get_one::<String>("output") {
        config.output.path = PathBuf::from(output_path);
    }

    if let Some(format) = matches.get_one::<String>("format") {
        config.output.format = match format.as_str() {
            "json" => OutputFormat::Json,
            "yaml" => OutputFormat::Yaml,
            other => return Err(anyhow!("Unsupported output format: {other}")),
        };
    }

    if matches.get_flag("force") {
        config.output.overwrite = true;
    }

    if matches.get_flag("fail-fast") {
        config.generation.fail_fast = true;
    }

    let app = utils::create_app(config)?;

    if matches.get_flag("dry-run") {
        info!("Dry run mode - no files will be written");
        println!("Dry run mode - no files will be written");

        let result = app.resolve().await?;

        println!("Dry run completed successfully!");
        println!("Inputs read: {}", result.inputs_processed);
        println!("CRDs resolved: {}", result.crds_processed);
        println!("Resources: {}", result.package.resource_tokens.len());
        println!("Types that would be written: {}", result.package.types.len());
        println!(
            "Package file: {}",
            app.config().output.file_path().display()
        );
        utils::print_problems(&result);

        return Ok(());
    }

    let result = app.generate().await?;

    println!("Generation completed successfully!");
    println!("Inputs read: {}", result.inputs_processed);
    println!("CRDs resolved: {}", result.crds_processed);
    println!("Resources: {}", result.package.resource_tokens.len());
    println!("Types written: {}", result.package.types.len());
    println!(
        "Processing time: {}",
        crate::utils::format_duration(result.duration)
    );
    if let Some(path) = &result.output_file {
        println!("Package file: {}", path.display());
    }
    utils::print_problems(&result);

    Ok(())
}
