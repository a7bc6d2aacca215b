//! services/app/src/bin/storyteller.rs

use app_lib::{
    cli::{self, state::AppState, Cli},
    config::Config,
    error::AppError,
};
use clap::Parser;
use std::sync::Arc;
use tracing::{debug, error};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let cli = Cli::parse();

    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
    debug!("Configuration loaded: {:?}", config);

    // --- 2. Wire the Adapters ---
    let state = AppState::from_config(config, cli.ephemeral)?;

    // --- 3. Run the Command ---
    if let Err(e) = cli::run(cli.command, &state).await {
        error!("Command failed: {}", e);
        return Err(e);
    }
    Ok(())
}
