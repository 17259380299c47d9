use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use socialklub_backend::api;
use socialklub_backend::config::Config;
use socialklub_backend::mail::resend::ResendMailer;
use socialklub_backend::state::AppState;
use socialklub_backend::storage::SupabaseStorage;
use socialklub_backend::store::{create_store, VenueRepository};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    tracing::info!("Starting AI Social Klub backend...");

    // Load configuration
    let config = Config::from_env()?;
    tracing::info!(
        host = %config.server_host,
        port = %config.server_port,
        store = ?config.store_backend,
        "Configuration loaded"
    );

    if config.uses_default_admin_key() {
        tracing::warn!("ADMIN_ACCESS_KEY not set, using the insecure development default");
    }

    // Create data store and check it is reachable
    let store = create_store(&config);
    match VenueRepository::new(store.clone()).health_check().await {
        Ok(true) => tracing::info!("Data store reachable"),
        Ok(false) => tracing::warn!("Data store health check returned false"),
        Err(e) => {
            tracing::error!(error = %e, "Failed to reach data store");
            // Continue anyway, might recover later
        }
    }

    let storage = Arc::new(SupabaseStorage::new(&config));
    let sender = Arc::new(ResendMailer::new(&config));

    // Create application state
    let state = AppState::new(config.clone(), store, storage, sender);

    // Build router
    let app = api::create_router(state).layer(TraceLayer::new_for_http());

    // Start server
    let addr: SocketAddr = config.server_addr().parse()?;
    let listener = TcpListener::bind(addr).await?;

    tracing::info!(address = %addr, "Server listening");

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}

/// Handle shutdown signals
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
                tracing::error!(error = %e, "Failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, shutting down...");
        },
        _ = terminate => {
            tracing::info!("Received terminate signal, shutting down...");
        },
    }
}
