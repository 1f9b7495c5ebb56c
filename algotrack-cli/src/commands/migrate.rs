//! Schema setup without starting the server

use std::path::Path;

use algotrack_server::connect;
use anyhow::{Context, Result};
use clap::Parser;

use crate::config::{AlgotrackConfig, Overrides, Settings};

/// Arguments for the migrate command
#[derive(Parser, Debug)]
pub struct MigrateArgs {
    /// Database URL: postgres://... or sqlite://path (default: ~/.algotrack/problems.db)
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,
}

pub async fn run_migrate(args: MigrateArgs, config_path: Option<&Path>) -> Result<()> {
    let file = AlgotrackConfig::load(config_path)?;
    let settings = Settings::resolve(
        file,
        Overrides {
            database_url: args.database_url,
            max_connections: Some(1),
            ..Overrides::default()
        },
    );

    let store = connect(&settings.database_url, settings.max_connections)
        .await
        .context("Failed to open database")?;

    let result = store.migrate().await.context("Failed to run migrations");
    store.close().await;
    result?;

    tracing::info!("Schema is up to date");
    Ok(())
}
