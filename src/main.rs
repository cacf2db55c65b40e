// Entry point for the Drive integration client.
//
// **Architecture Overview:**
// - `core/` = Client logic (configuration, models, the service and its traits)
// - `infra/` = Implementations of core traits (HTTP transport, token sources)
// - `cli/` = Command-line adapter (argument parsing, output)
//
// This file's job is to:
// 1. Load configuration
// 2. Wire the service together (dependency injection)
// 3. Run the requested command and print the result

// These attrs point each module declaration at a more descriptive root file
// so we don't end up with several mod.rs files that all look the same.
#[path = "cli/cli_layer.rs"]
mod cli;
#[path = "core/core_layer.rs"]
mod core;
#[path = "infra/infra_layer.rs"]
mod infra;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use crate::core::config::{ApiConfig, ProcessEnv};
use crate::core::drive_integration::{DriveIntegrationError, DriveIntegrationService};
use crate::infra::drive_integration::reqwest_transport::ReqwestTransport;
use crate::infra::drive_integration::token_provider;

#[tokio::main]
async fn main() {
    // Logs go to stderr so command output on stdout stays clean
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    // Load environment variables from .env file (if it exists)
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        if let Some(DriveIntegrationError::Api { status, .. }) = e.downcast_ref::<DriveIntegrationError>() {
            tracing::debug!(status, "Backend rejected the request");
        }
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    // ========================================================================
    // DEPENDENCY INJECTION
    // ========================================================================
    // The base URL is resolved exactly once here and handed to the service.

    let config = ApiConfig::resolve(&ProcessEnv, cfg!(debug_assertions))
        .with_override(cli.base_url.as_deref());
    let tokens = token_provider::from_config(&ProcessEnv);
    let service = DriveIntegrationService::new(config, ReqwestTransport::new(), tokens);

    let output = cli::commands::run(&cli.command, &service).await?;
    println!("{output}");

    Ok(())
}
