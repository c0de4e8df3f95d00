//! Application startup and lifecycle management.

use std::net::SocketAddr;

use service_core::error::AppError;
use service_core::observability::logging::shutdown_tracing;
use tokio::net::TcpListener;
use tokio::signal;

use crate::config::BookingConfig;
use crate::db::{create_pool, run_migrations};
use crate::{build_router, AppState};

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    state: AppState,
}

impl Application {
    /// Connects to Postgres, applies migrations and binds the listener.
    pub async fn build(config: BookingConfig) -> Result<Self, AppError> {
        let pool = create_pool(&config.database).await.map_err(|e| {
            tracing::error!(error = %e, "Failed to connect to Postgres");
            AppError::DatabaseError(e.into())
        })?;

        run_migrations(&pool).await.map_err(|e| {
            tracing::error!(error = %e, "Failed to run migrations");
            AppError::DatabaseError(e.into())
        })?;
        tracing::info!("Database initialized successfully");

        let address = config.common.bind_address();
        let state = AppState::new(config, pool)?;

        // Port 0 picks a random port for tests
        let listener = TcpListener::bind(&address).await.map_err(|e| {
            tracing::error!(address = %address, error = %e, "Failed to bind listener");
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!(
            service = %state.config.service_name,
            environment = ?state.config.environment,
            port,
            "Booking service listening"
        );

        Ok(Self {
            port,
            listener,
            state,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn state(&self) -> AppState {
        self.state.clone()
    }

    /// Serves until SIGINT or SIGTERM, then drops cached catalog data and
    /// flushes traces.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        let cache = self.state.catalog_cache.clone();
        let app = build_router(self.state);

        let result = axum::serve(
            self.listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal())
        .await;

        cache.clear().await;
        shutdown_tracing();
        tracing::info!("Service shutdown complete");

        result
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received SIGINT, starting graceful shutdown");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        },
    }
}
