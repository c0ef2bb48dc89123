//! Main server implementation for the Coffee Shop drinks API

use crate::{
    api::{
        self,
        auth::{KeySource, RemoteKeySource, TokenExpectations},
    },
    config::Config,
    error::{ApiError, Result},
    storage::{DrinkRepository, SqliteDrinkRepository},
};
use axum::Router;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};

/// Main server structure
pub struct Server {
    config: Arc<Config>,
    app: Router,
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<Config>,

    /// Drink storage
    pub drinks: Arc<dyn DrinkRepository>,

    /// Token signing keys of the Auth0 tenant
    pub keys: Arc<dyn KeySource>,
}

impl AppState {
    pub fn new(
        config: Arc<Config>,
        drinks: Arc<dyn DrinkRepository>,
        keys: Arc<dyn KeySource>,
    ) -> Self {
        Self {
            config,
            drinks,
            keys,
        }
    }

    /// Audience, issuer and clock skew access tokens are checked against
    pub fn token_expectations(&self) -> TokenExpectations {
        TokenExpectations {
            audience: self.config.auth.audience.clone(),
            issuer: self.config.auth.issuer(),
            clock_skew: self.config.auth.allowed_clock_skew(),
        }
    }
}

impl Server {
    /// Create a new server instance
    pub async fn new(config: Config) -> Result<Self> {
        info!("Initializing Coffee Shop API server");

        let config = Arc::new(config);

        let repository = SqliteDrinkRepository::connect(&config.database).await?;
        if config.database.reset_on_startup {
            warn!("Resetting drink table, all drinks will be dropped");
            repository.reset().await?;
        }

        let keys = RemoteKeySource::new(config.auth.jwks_url(), config.auth.jwks_cache_ttl())
            .map_err(|e| ApiError::Internal {
                message: e.to_string(),
            })?;
        info!(
            "Accepting tokens for audience {} from {}, signing keys at {}",
            config.auth.audience,
            config.auth.issuer(),
            keys.url()
        );

        let state = AppState::new(config.clone(), Arc::new(repository), Arc::new(keys));
        let app = build_router(state);

        Ok(Self { config, app })
    }

    /// Run the server until shutdown signal
    pub async fn run(self) -> Result<()> {
        let addr = self.config.server.bind_address;

        info!("Starting HTTP server on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| ApiError::Internal {
                message: format!("Failed to bind to address {addr}: {e}"),
            })?;

        info!("Coffee Shop API listening on {}", addr);

        axum::serve(listener, self.app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| ApiError::Internal {
                message: format!("Server error: {e}"),
            })?;

        Ok(())
    }
}

/// Build the application router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    let router = api::routes();
    api::middleware::apply_middleware(router, &state.config.server).with_state(state)
}

/// Shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            warn!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            warn!("Received terminate signal, shutting down");
        },
    }
}
