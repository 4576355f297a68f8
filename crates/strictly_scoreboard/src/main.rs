//! Strictly Scoreboard - server binary

#![warn(missing_docs)]

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command};
use strictly_scoreboard::{MatchRepository, MatchService, ServerConfig, router};
use tracing::{info, instrument, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,strictly_scoreboard=debug")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve {
            config,
            host,
            port,
            database,
        } => {
            let config = match config {
                Some(path) => ServerConfig::from_file(&path)?,
                None => ServerConfig::default(),
            }
            .with_overrides(host, port, database);
            run_server(config).await
        }
        Command::Migrate { database } => run_migrations(database).await,
    }
}

/// Run the HTTP and WebSocket server
#[instrument(skip(config), fields(bind = %config.bind_address()))]
async fn run_server(config: ServerConfig) -> Result<()> {
    info!("Starting Strictly Scoreboard");

    let service = MatchService::from_config(&config)
        .await
        .context("Failed to start match service")?;
    let app = router(service);

    let listener = tokio::net::TcpListener::bind(config.bind_address())
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_address()))?;
    info!(address = %config.bind_address(), "Server ready");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Apply database migrations and exit
#[instrument]
async fn run_migrations(database: String) -> Result<()> {
    tokio::task::spawn_blocking(move || MatchRepository::open(database)).await??;
    info!("Database is up to date");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown requested"),
        Err(e) => {
            warn!(error = %e, "Cannot listen for Ctrl-C, running until killed");
            std::future::pending::<()>().await;
        }
    }
}
