//! Axum server setup
//!
//! Server skeleton with:
//! - Single-origin CORS (the web client)
//! - Tracing middleware
//! - Graceful shutdown on SIGTERM/Ctrl+C, then the store is closed

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::HeaderValue;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::routes;
use crate::db::ProblemStore;

/// Origin of the bundled web client's dev server.
pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:5173";

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to (default: 127.0.0.1:8080)
    pub bind_addr: SocketAddr,

    /// The one browser origin allowed to call the API
    pub cors_origin: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            cors_origin: DEFAULT_CORS_ORIGIN.to_string(),
        }
    }
}

/// Shared application state
pub struct AppState {
    pub store: Arc<dyn ProblemStore>,
}

/// Build the router: route table, CORS and tracing layers.
pub fn build_router(store: Arc<dyn ProblemStore>, cors_origin: &str) -> Result<Router, ServerError> {
    let origin = HeaderValue::from_str(cors_origin).map_err(|_| ServerError::InvalidOrigin {
        origin: cors_origin.to_owned(),
    })?;

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list([origin]))
        .allow_methods(Any)
        .allow_headers(Any);

    let api = Router::new()
        .merge(routes::problems::router())
        .merge(routes::health::hello_router());

    let app = Router::new()
        .nest("/api", api)
        .merge(routes::health::router())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(AppState { store }));

    Ok(app)
}

/// Run the HTTP server until a shutdown signal arrives, then close the store.
///
/// # Example
///
/// ```ignore
/// let store = connect(&database_url, DEFAULT_MAX_CONNECTIONS).await?;
/// store.migrate().await?;
/// run_server(store, ServerConfig::default()).await?;
/// ```
pub async fn run_server(store: Arc<dyn ProblemStore>, config: ServerConfig) -> Result<(), ServerError> {
    tracing::info!(origin = %config.cors_origin, "CORS origin configured");
    let app = build_router(store.clone(), &config.cors_origin)?;

    // Bind listener
    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    // Run with graceful shutdown
    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    store.close().await;
    served?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting shutdown");
        }
    }
}

/// Server error type
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid CORS origin '{origin}'")]
    InvalidOrigin { origin: String },
}
