//! Configuration loading
//!
//! Precedence (highest to lowest):
//! 1. Command line flags
//! 2. Environment variables (read by clap, after `.env` files are loaded)
//! 3. `~/.algotrack/config.toml` (or `--config <PATH>`)
//! 4. Built-in defaults

use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use algotrack_server::db::DEFAULT_MAX_CONNECTIONS;
use algotrack_server::ServerConfig;
use anyhow::{Context, Result};
use serde::Deserialize;

/// Contents of `config.toml`. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AlgotrackConfig {
    pub server: ServerSection,
    pub database: DatabaseSection,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerSection {
    pub bind: Option<SocketAddr>,
    pub cors_origin: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatabaseSection {
    pub url: Option<String>,
    pub max_connections: Option<u32>,
}

impl AlgotrackConfig {
    /// Load the config file.
    ///
    /// An explicit path must exist. The default path is optional: if it is
    /// missing, defaults are used.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_path(path);
        }

        match default_config_path() {
            Some(path) if path.exists() => Self::from_path(&path),
            _ => {
                tracing::debug!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Parse a config file at `path`.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file (invalid TOML): {}", path.display()))?;

        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }
}

/// Values given on the command line or through the environment.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub bind: Option<SocketAddr>,
    pub database_url: Option<String>,
    pub cors_origin: Option<String>,
    pub max_connections: Option<u32>,
}

/// Fully resolved settings for a run.
#[derive(Debug, Clone)]
pub struct Settings {
    pub server: ServerConfig,
    pub database_url: String,
    pub max_connections: u32,
}

impl Settings {
    pub fn resolve(file: AlgotrackConfig, overrides: Overrides) -> Self {
        let defaults = ServerConfig::default();

        let server = ServerConfig {
            bind_addr: overrides
                .bind
                .or(file.server.bind)
                .unwrap_or(defaults.bind_addr),
            cors_origin: overrides
                .cors_origin
                .or(file.server.cors_origin)
                .unwrap_or(defaults.cors_origin),
        };

        let database_url = overrides
            .database_url
            .or(file.database.url)
            .unwrap_or_else(default_database_url);

        let max_connections = overrides
            .max_connections
            .or(file.database.max_connections)
            .unwrap_or(DEFAULT_MAX_CONNECTIONS);

        Self {
            server,
            database_url,
            max_connections,
        }
    }
}

/// Get the algotrack config directory path (~/.algotrack)
pub fn config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".algotrack"))
}

/// Get the default config file path (~/.algotrack/config.toml)
pub fn default_config_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.toml"))
}

/// SQLite file under the config directory (or the current directory when
/// there is no home directory).
pub fn default_database_url() -> String {
    let path = config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("problems.db");
    format!("sqlite://{}", path.display())
}

/// Load environment variables from .env files
///
/// Priority order (highest to lowest):
/// 1. Environment variables already set
/// 2. Current directory .env
/// 3. ~/.algotrack/.env
///
/// Runs before tracing is initialized, so the loaded paths are returned for
/// the caller to log.
pub fn load_dotenv() -> Vec<PathBuf> {
    let mut loaded_from = Vec::new();

    if let Ok(path) = dotenvy::dotenv() {
        loaded_from.push(path);
    }

    if let Some(env_file) = config_dir().map(|dir| dir.join(".env")) {
        // dotenvy doesn't overwrite existing vars
        if env_file.exists() && dotenvy::from_path(&env_file).is_ok() {
            loaded_from.push(env_file);
        }
    }

    loaded_from
}
