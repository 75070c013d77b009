//! Info command implementation

use anyhow::Result;
use clap::{ArgMatches, Command};

pub fn command() -> Command {
    Command::new("info").about("Show tool information").arg(
        clap::Arg::new("detailed")
            .short('d')
            .long("detailed")
            .help("Show detailed information")
            .action(clap::ArgAction::SetTrue),
    )
}

pub async fn run(matches: &ArgMatches) -> Result<()> {
    let detailed = matches.get_flag("detailed");

    println!("crd2types - CRD schema to type graph resolver");
    println!("Version: {}", env!("CARGO_PKG_VERSION"));
    println!(
        "HTTP sources: {}",
        if cfg!(feature = "http") { "enabled" } else { "disabled" }
    );

    if detailed {
        println!("\nDetailed Information:");
        println!("  - Multi-document YAML and JSON CRD input");
        println!("  - apiextensions v1 and legacy v1beta1 validation schemas");
        println!("  - Nested object schemas lifted into named definitions");
        println!("  - Versions of a CRD merged into one definition table");
        println!("  - oneOf unions, allOf and anyOf property merging");
        println!("  - int-or-string and preserve-unknown-fields handling");
        println!("  - apiVersion, kind and metadata injected into resource roots");
        println!("  - JSON and YAML package output");
    }

    Ok(())
}
