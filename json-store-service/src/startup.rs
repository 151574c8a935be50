use crate::config::{JsonStoreConfig, StoreBackend, StoreConfig};
use crate::services::{DocumentStore, MemoryStore, PostgresStore, RedisStore};
use crate::{build_router, AppState};
use secrecy::ExposeSecret;
use service_core::error::AppError;
use std::future::{Future, IntoFuture};
use std::pin::Pin;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;

type ServerFuture = Pin<Box<dyn Future<Output = std::io::Result<()>> + Send>>;

pub struct Application {
    port: u16,
    server: ServerFuture,
    state: AppState,
}

impl Application {
    pub async fn build(config: JsonStoreConfig) -> Result<Self, AppError> {
        let store = connect_store(&config.store).await?;
        Self::build_with_store(config, store).await
    }

    /// Bind the listener around a store built elsewhere. Port 0 picks a free port.
    pub async fn build_with_store(
        config: JsonStoreConfig,
        store: Arc<dyn DocumentStore>,
    ) -> Result<Self, AppError> {
        let state = AppState::new(config, store);
        let app = build_router(state.clone());

        let addr = state.config.common.socket_addr();
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!(
            port,
            profile = ?state.config.profile,
            backend = state.documents.backend(),
            path = %state.config.document_path,
            "Listening"
        );

        let server = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .into_future();

        Ok(Self {
            port,
            server: Box::pin(server),
            state,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        self.server.await
    }
}

/// Build the store once for the lifetime of the process.
pub async fn connect_store(config: &StoreConfig) -> Result<Arc<dyn DocumentStore>, AppError> {
    match config.backend {
        StoreBackend::Postgres => {
            let url = config.database.url.as_ref().ok_or_else(|| {
                AppError::ConfigError(anyhow::anyhow!(
                    "DATABASE_URL is required for the postgres backend"
                ))
            })?;

            let store = PostgresStore::connect(
                url.expose_secret(),
                config.database.max_connections,
                config.database.min_connections,
            )
            .await
            .map_err(|e| {
                tracing::error!("Failed to connect to PostgreSQL: {}", e);
                AppError::from(e)
            })?;

            if config.database.run_migrations {
                store.run_migrations().await.map_err(|e| {
                    tracing::error!("Failed to run database migrations: {}", e);
                    AppError::from(e)
                })?;
            }

            Ok(Arc::new(store))
        }
        StoreBackend::Redis => {
            let url = config.redis.url.as_ref().ok_or_else(|| {
                AppError::ConfigError(anyhow::anyhow!(
                    "REDIS_URL is required for the redis backend"
                ))
            })?;

            let store = RedisStore::connect(url.expose_secret(), config.redis.key.clone())
                .await
                .map_err(|e| {
                    tracing::error!("Failed to connect to Redis: {}", e);
                    AppError::from(e)
                })?;

            Ok(Arc::new(store))
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store; the document is lost on restart");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
