//! Server module for logsink.
//!
//! This module runs the HTTP service: it builds the shared state and router,
//! binds the listener and serves until a shutdown signal arrives, then closes
//! the connection pool.
//!
//! # Server Configuration
//!
//! The server binds to `0.0.0.0:5000` by default (see `env`) and includes:
//! - A Postgres connection pool shared by every request
//! - Permissive CORS (configurable) and HTTP tracing middleware
//!
//! # Usage
//!
//! ```rust
//! // Blocking server startup, returns after Ctrl+C / SIGTERM
//! start_server(pool, config).await?;
//!
//! // Tests only: serve on an already bound listener, stop through the sender
//! let (addr, shutdown_tx) = spawn_server(pool, config, listener)?;
//! ```

pub mod shutdown;

use self::shutdown::ShutdownCoordinator;
use crate::AppState;
use crate::env::AppConfig;
use crate::routing::router::create_router;
use sqlx::PgPool;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};

///////////////////////////////////////////////////////////////////////////////
//****                       Public Functions                            ****//
///////////////////////////////////////////////////////////////////////////////

/// Start the HTTP service with graceful shutdown support
pub async fn start_server(pool: PgPool, config: AppConfig) -> std::io::Result<()> {
    let shutdown_coordinator = Arc::new(ShutdownCoordinator::new());

    let app_state = AppState {
        db: pool.clone(),
        config: config.clone(),
    };
    let app = create_router(app_state);

    let listener = TcpListener::bind(config.bind_address).await?;
    let addr = listener.local_addr()?;
    info!("logsink listening on http://{}", addr);
    info!("Database: {}", config.redacted_database_url());

    let shutdown_for_server = shutdown_coordinator.clone();
    let server = axum::serve(listener, app).with_graceful_shutdown(async move {
        shutdown_for_server.wait_for_shutdown_signal().await;
    });

    if let Err(err) = server.await {
        error!("logsink server error: {}", err);
    }

    pool.close().await;
    info!("logsink shutdown complete");
    Ok(())
}

/// Serve on a pre-bound listener in a background task.
///
/// Returns the bound address and a sender that stops the server.
#[cfg(test)]
pub fn spawn_server(
    pool: PgPool,
    config: AppConfig,
    listener: TcpListener,
) -> std::io::Result<(std::net::SocketAddr, tokio::sync::oneshot::Sender<()>)> {
    let addr = listener.local_addr()?;
    let app = create_router(AppState { db: pool, config });
    let (tx, rx) = tokio::sync::oneshot::channel::<()>();

    tokio::spawn(async move {
        let server = axum::serve(listener, app).with_graceful_shutdown(async {
            rx.await.ok();
        });
        if let Err(err) = server.await {
            error!("logsink server error: {}", err);
        }
    });

    Ok((addr, tx))
}
