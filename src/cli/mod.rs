//! CLI command implementations

use anyhow::Result;
use clap::{ArgMatches, Command};

pub mod commands;

/// Main CLI application
pub struct CliApp;

impl CliApp {
    /// Create the CLI application
    pub fn app() -> Command {
        Command::new("crd2types")
            .version(env!("CARGO_PKG_VERSION"))
            .about("Resolve Kubernetes CRD schemas into a flat, named type graph")
            .subcommand_negates_reqs(true)
            .subcommand(commands::init::command())
            .subcommand(commands::generate::command())
            .subcommand(commands::validate::command())
            .subcommand(commands::inspect::command())
            .subcommand(commands::info::command())
    }

    /// Run the CLI application
    pub async fn run(matches: &ArgMatches) -> Result<()> {
        match matches.subcommand() {
            Some(("init", sub_matches)) => commands::init::run(sub_matches).await,
            Some(("generate", sub_matches)) => commands::generate::run(sub_matches).await,
            Some(("validate", sub_matches)) => commands::validate::run(sub_matches).await,
            Some(("inspect", sub_matches)) => commands::inspect::run(sub_matches).await,
            Some(("info", sub_matches)) => commands::info::run(sub_matches).await,
            _ => {
                // No subcommand provided, show help
                let _ = Self::app().print_help();
                Ok(())
            }
        }
    }
}

/// Common CLI utilities
pub mod utils {
    use crate::config::DEFAULT_CONFIG_FILES;
    use anyhow::{anyhow, Result};
    use std::path::PathBuf;

    /// Get configuration file path from arguments or use default
    pub fn get_config_path(matches: &clap::ArgMatches) -> Result<PathBuf> {
        if let Some(config_path) = matches.get_one::<String>("config") {
            return Ok(PathBuf::from(config_path));
        }

        DEFAULT_CONFIG_FILES
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
            .ok_or_else(|| {
                anyhow!("No configuration file found. Use --config to specify a file or create one with 'crd2types init'")
            })
    }

    /// Load configuration from file
    pub fn load_config(matches: &clap::ArgMatches) -> Result<crate::Config> {
        let config_path = get_config_path(matches)?;
        crate::Config::from_file(&config_path)
    }

    /// Create the application
    pub fn create_app(config: crate::Config) -> Result<crate::Crd2Types> {
        crate::Crd2Types::new(config)
    }

    /// Print skipped inputs and package diagnostics
    pub fn print_problems(result: &crate::GenerationResult) {
        for error in &result.errors {
            eprintln!("  Error: {error}");
        }
        for diagnostic in &result.package.diagnostics {
            println!("  Warning: {diagnostic}");
        }
    }
}
