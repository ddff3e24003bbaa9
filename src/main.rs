use std::sync::Arc;

use anyhow::{anyhow, Result};
use tokio::net::TcpListener;
use tokio::signal;
use tokio::sync::{mpsc, oneshot};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use pg_facade::config::Settings;
use pg_facade::database::{self, Service};
use pg_facade::server::{create_app, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    init_tracing();

    // Load configuration
    let settings = Settings::new()?;
    tracing::info!("Configuration loaded");

    // Open the database facade; failure here is fatal
    let db_service = match database::connect(&settings.db).await {
        Ok(service) => Arc::new(service),
        Err(e) => {
            tracing::error!(error = %e, "Failed to open database");
            return Err(e.into());
        }
    };

    // Create application state
    let (state, fatal_rx) = AppState::new(db_service.clone());
    tracing::info!("Application state initialized");

    // Create Axum app
    let app = create_app(state);

    // Start server
    let addr = settings.server_addr();
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    // Run server with graceful shutdown
    let (fatal_reason_tx, fatal_reason_rx) = oneshot::channel();
    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal_handler(fatal_rx, fatal_reason_tx))
        .await;

    // Always release the pool, even if serving failed
    db_service.close().await?;
    served?;

    if let Ok(reason) = fatal_reason_rx.await {
        tracing::error!(reason = %reason, "Terminating after fatal database failure");
        return Err(anyhow!(reason));
    }

    tracing::info!("Server shutdown complete");
    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

async fn shutdown_signal_handler(
    mut fatal_rx: mpsc::UnboundedReceiver<String>,
    fatal_reason_tx: oneshot::Sender<String>,
) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received terminate signal, initiating graceful shutdown");
        }
        Some(reason) = fatal_rx.recv() => {
            tracing::error!(reason = %reason, "Database health check failed, shutting down");
            let _ = fatal_reason_tx.send(reason);
        }
    }
}
