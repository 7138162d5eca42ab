use std::future::IntoFuture;
use std::net::SocketAddr;
use std::pin::Pin;
use std::sync::Arc;

use service_core::error::AppError;
use tokio::net::TcpListener;
use tokio::signal;

use crate::config::MarketplaceConfig;
use crate::db;
use crate::services::{
    Database, JwtService, LocalStorage, OnboardingService, OrderService, Storage,
};
use crate::{build_router, AppState};

pub struct Application {
    port: u16,
    server: Pin<Box<dyn std::future::Future<Output = std::io::Result<()>> + Send>>,
    state: AppState,
}

impl Application {
    pub async fn build(config: MarketplaceConfig) -> Result<Self, AppError> {
        let pool = db::create_pool(&config.database).await.map_err(|e| {
            tracing::error!("Failed to connect to PostgreSQL: {}", e);
            e
        })?;
        db::run_migrations(&pool).await.map_err(|e| {
            tracing::error!("Failed to run database migrations: {}", e);
            e
        })?;

        let storage: Arc<dyn Storage> = Arc::new(
            LocalStorage::new(&config.storage.local_path)
                .await
                .map_err(|e| {
                    tracing::error!(
                        "Failed to initialize local storage at {}: {}",
                        config.storage.local_path,
                        e
                    );
                    e
                })?,
        );

        let database = Database::new(pool);
        let jwt = JwtService::new(&config.jwt);
        let orders = OrderService::new(database.clone());
        let onboarding = OnboardingService::new(
            database.clone(),
            storage.clone(),
            config.storage.public_base_url.clone(),
        );

        let state = AppState {
            config: config.clone(),
            db: database,
            jwt,
            storage,
            orders,
            onboarding,
        };

        let app = build_router(state.clone());

        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
            AppError::InternalError(anyhow::anyhow!("Failed to bind {}: {}", addr, e))
        })?;
        let port = listener
            .local_addr()
            .map_err(|e| AppError::InternalError(anyhow::anyhow!(e)))?
            .port();

        tracing::info!("Listening on {}", port);

        let server = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .into_future();

        Ok(Self {
            port,
            server: Box::pin(server),
            state,
        })
    }

    pub fn db(&self) -> &Database {
        &self.state.db
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        self.server.await
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
