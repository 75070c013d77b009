//! Inspect command implementation

use crate::config::{Config, FileSource, Source};
use crate::Crd2Types;
use anyhow::Result;
use clap::{ArgMatches, Command};
use tracing::info;

pub fn command() -> Command {
    Command::new("inspect")
        .about("Resolve CRD files and print their resources and types")
        .arg(
            clap::Arg::new("files")
                .help("CRD files or glob patterns")
                .value_name("FILE")
                .num_args(1..)
                .required(true),
        )
        .arg(
            clap::Arg::new("filter")
                .long("filter")
                .help("Only keep versions whose <group>/<version> matches this glob")
                .value_name("PATTERN")
                .action(clap::ArgAction::Append),
        )
        .arg(
            clap::Arg::new("json")
                .long("json")
                .help("Print the whole package as JSON")
                .action(clap::ArgAction::SetTrue),
        )
}

pub async fn run(matches: &ArgMatches) -> Result<()> {
    let filters: Vec<String> = matches
        .get_many::<String>("filter")
        .map(|values| values.cloned().collect())
        .unwrap_or_default();

    let mut config = Config::default();
    for (index, file) in matches
        .get_many::<String>("files")
        .into_iter()
        .flatten()
        .enumerate()
    {
        config.sources.push(Source::File(FileSource {
            name: format!("input-{index}"),
            path: file.clone(),
            filters: filters.clone(),
        }));
    }

    info!("Inspecting {} inputs", config.sources.len());
    let result = Crd2Types::new(config)?.resolve().await?;
    let package = &result.package;

    if matches.get_flag("json") {
        println!("{}", serde_json::to_string_pretty(package)?);
        return Ok(());
    }

    println!("Resources: {}", package.resource_tokens.len());
    for (token, spec) in package.resources() {
        println!(
            "  {} ({} properties, {} required)",
            token,
            spec.properties.len(),
            spec.required.len()
        );
    }

    println!("Types: {}", package.types.len());
    for (token, spec) in package.types.iter() {
        if !package.resource_tokens.contains(token) {
            println!("  {} ({} properties)", token, spec.properties.len());
        }
    }

    crate::cli::utils::print_problems(&result);
    Ok(())
}
