//! Validate command implementation

use crate::cli::utils;
use crate::config::Source;
use anyhow::Result;
use clap::{ArgMatches, Command};
use tracing::info;

pub fn command() -> Command {
    Command::new("validate")
        .about("Validate configuration file")
        .arg(
            clap::Arg::new("config")
                .short('c')
                .long("config")
                .help("Configuration file path")
                .value_name("FILE"),
        )
}

pub async fn run(matches: &ArgMatches) -> Result<()> {
    info!("Validating configuration file");

    let config = utils::load_config(matches)?;

    println!("Configuration file is valid!");
    println!("Version: {}", config.version);
    println!("Sources: {}", config.sources.len());
    println!(
        "Output: {} ({})",
        config.output.file_path().display(),
        config.output.format
    );

    for source in &config.sources {
        let location = match source {
            Source::File(file) => &file.path,
            Source::Directory(directory) => &directory.path,
            Source::Url(url) => &url.url,
        };
        println!("  - {} ({}): {}", source.name(), source.kind(), location);
        for filter in source.filters() {
            println!("      filter: {filter}");
        }
    }

    Ok(())
}
