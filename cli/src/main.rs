//! CLI entrypoint for Blueprint
//!
//! Wires together all layers using dependency injection: config ->
//! HTTP oracle -> session router -> chat REPL.

use anyhow::Result;
use blueprint_application::SessionRouter;
use blueprint_infrastructure::{ConfigLoader, HttpOracle};
use blueprint_presentation::{ChatRepl, Cli};
use clap::Parser;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    if cli.show_config {
        ConfigLoader::print_config_sources();
        return Ok(());
    }

    let mut config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref()).map_err(|e| anyhow::anyhow!(e))?
    };

    if let Some(model) = &cli.model {
        config.oracle.model = model.clone();
    }

    info!(model = %config.oracle.model, "starting blueprint interview");

    // === Dependency Injection ===
    let oracle = Arc::new(HttpOracle::from_config(&config.oracle)?);
    let router = Arc::new(SessionRouter::new(oracle));

    let repl = ChatRepl::new(router).with_progress(config.repl.show_progress && !cli.quiet);
    repl.run(cli.opening).await?;

    Ok(())
}
