//! algotrack CLI - practice problem tracker backend
//!
//! - `serve`: run the HTTP API (`/api/problems`)
//! - `migrate`: create the database schema and exit

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod config;
mod tracing_setup;

#[derive(Parser, Debug)]
#[command(
    name = "algotrack",
    author,
    version,
    about = "Track practice problems (title, difficulty, platform, review dates) over HTTP"
)]
struct Cli {
    /// Enable debug logging (unless RUST_LOG is set)
    #[arg(long, global = true)]
    debug: bool,

    /// Config file (default: ~/.algotrack/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API server
    Serve(commands::serve::ServeArgs),
    /// Create the problems table and exit
    Migrate(commands::migrate::MigrateArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env values must be in the environment before clap reads `env = ...`
    let dotenv_files = config::load_dotenv();

    let cli = Cli::parse();

    tracing_setup::init(&tracing_setup::TracingConfig { debug: cli.debug })?;

    if dotenv_files.is_empty() {
        tracing::debug!("No .env files found (current dir or ~/.algotrack)");
    }
    for path in &dotenv_files {
        tracing::info!("Loaded environment from {}", path.display());
    }

    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::Serve(args) => commands::serve::run_serve(args, config_path).await,
        Commands::Migrate(args) => commands::migrate::run_migrate(args, config_path).await,
    }
}
