//! crd2types CLI binary

use anyhow::Result;

use crd2types::cli::CliApp;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "crd2types=info".into()),
        )
        .init();

    let matches = CliApp::app().get_matches();

    CliApp::run(&matches).await
}
