use std::sync::Arc;

use axum::Router;
use configuration::{Configuration, ConfigurationError};
use database::{Database, InitializationError};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

mod configuration;
mod database;
mod preferred_language;
mod questionnaire;
mod routes;
mod translation;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) database: Arc<Database>,
    pub(crate) configuration: Arc<Configuration>,
}

#[derive(thiserror::Error, Debug)]
enum StartupError {
    #[error("Error loading configuration: {0}")]
    ConfigurationError(#[from] ConfigurationError),
    #[error("Error initializing database: {0}")]
    DatabaseError(#[from] InitializationError),
    #[error("Error binding to {address}: {source}")]
    BindError {
        address: std::net::SocketAddr,
        #[source]
        source: std::io::Error,
    },
    #[error("Error serving requests: {0}")]
    ServeError(std::io::Error),
}

pub(crate) fn create_app(state: AppState) -> Router {
    routes::create_router()
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("aupair=debug,tower_http=info")),
        )
        .init();

    if let Err(error) = run().await {
        tracing::error!("{error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), StartupError> {
    let configuration = Configuration::from_env()?;
    tracing::debug!(
        listen_address = %configuration.listen_address,
        server_url = %configuration.server_url,
        "Loaded configuration"
    );

    let database = Database::initialize(&configuration.database).await?;

    let address = configuration.listen_address;
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|source| StartupError::BindError { address, source })?;

    tracing::info!("Au Pair questionnaire server listening on http://{address}");

    let state = AppState {
        database: Arc::new(database),
        configuration: Arc::new(configuration),
    };

    axum::serve(listener, create_app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(StartupError::ServeError)?;

    tracing::info!("Server stopped");

    Ok(())
}

/// Resolves on Ctrl-C, or SIGTERM on Unix
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(error) = tokio::signal::ctrl_c().await {
            tracing::error!("Error listening for Ctrl-C: {error}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => {
                tracing::error!("Error listening for SIGTERM: {error}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("Received Ctrl-C, shutting down"),
        () = terminate => tracing::info!("Received SIGTERM, shutting down"),
    }
}
