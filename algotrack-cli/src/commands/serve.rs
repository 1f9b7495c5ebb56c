//! HTTP server command
//!
//! Opens the store, applies the schema, then serves `/api/problems` until
//! Ctrl+C or SIGTERM.

use std::net::SocketAddr;
use std::path::Path;

use algotrack_server::{connect, run_server};
use anyhow::{Context, Result};
use clap::Parser;

use crate::config::{AlgotrackConfig, Overrides, Settings};

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to (default: 127.0.0.1:8080)
    #[arg(long, short = 'b', env = "ALGOTRACK_BIND")]
    pub bind: Option<SocketAddr>,

    /// Database URL: postgres://... or sqlite://path (default: ~/.algotrack/problems.db)
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Browser origin allowed by CORS (default: http://localhost:5173)
    #[arg(long, env = "ALGOTRACK_CORS_ORIGIN")]
    pub cors_origin: Option<String>,

    /// Maximum pooled database connections (default: 5)
    #[arg(long, env = "ALGOTRACK_MAX_CONNECTIONS")]
    pub max_connections: Option<u32>,
}

impl From<ServeArgs> for Overrides {
    fn from(args: ServeArgs) -> Self {
        Self {
            bind: args.bind,
            database_url: args.database_url,
            cors_origin: args.cors_origin,
            max_connections: args.max_connections,
        }
    }
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs, config_path: Option<&Path>) -> Result<()> {
    let file = AlgotrackConfig::load(config_path)?;
    let settings = Settings::resolve(file, args.into());

    tracing::info!("Starting algotrack server on {}", settings.server.bind_addr);

    let store = connect(&settings.database_url, settings.max_connections)
        .await
        .context("Failed to open database")?;

    store
        .migrate()
        .await
        .context("Failed to run migrations")?;

    // Run server (blocks until shutdown)
    run_server(store, settings.server)
        .await
        .context("Server error")?;

    Ok(())
}
