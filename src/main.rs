//! Campus Server: authentication core for the training-management API.
//!
//! Main entry point that wires all crates together and starts the server.

use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing_subscriber::{EnvFilter, fmt};

use campus_api::AppState;
use campus_core::config::AppConfig;
use campus_core::AppResult;
use campus_core::error::AppError;
use campus_database::{DatabasePool, PgStore};

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Load configuration for the environment named by `CAMPUS_ENV`.
fn load_configuration() -> AppResult<AppConfig> {
    let env = std::env::var("CAMPUS_ENV").unwrap_or_else(|_| "development".to_string());
    AppConfig::load(&env)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    if config.logging.is_json() {
        fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .with_thread_ids(true)
            .init();
    } else {
        fmt()
            .pretty()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    }
}

/// Main server run function
async fn run(config: AppConfig) -> AppResult<()> {
    tracing::info!("Starting Campus v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Database connection + migrations ─────────────────
    let db = DatabasePool::connect(&config.database).await?;

    campus_database::migration::run_migrations(db.pool()).await?;

    // ── Step 2: Services ─────────────────────────────────────────
    let store = Arc::new(PgStore::new(db.pool().clone()));
    let grace = Duration::from_secs(config.server.shutdown_grace_seconds);
    let addr = config.server.bind_address();

    let state = AppState::new(config, store).with_database(db.clone());
    if state.bootstrap_service.is_initialized().await? {
        tracing::info!("Administrator already bootstrapped");
    } else {
        tracing::warn!("No administrator yet: POST /api/bootstrap/init to create one");
    }

    let app = campus_api::build_app(state);

    // ── Step 3: Serve ────────────────────────────────────────────
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!("Campus server listening on {}", addr);

    // ── Step 4: Graceful shutdown ────────────────────────────────
    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
    let server = axum::serve(listener, app).with_graceful_shutdown(async move {
        shutdown_signal().await;
        tracing::info!("Shutdown signal received, starting graceful shutdown...");
        let _ = shutdown_tx.send(true);
    });

    // In-flight requests get `shutdown_grace_seconds` once the signal arrives.
    let deadline = async move {
        let _ = shutdown_rx.wait_for(|stopping| *stopping).await;
        tokio::time::sleep(grace).await;
    };

    tokio::select! {
        result = server.into_future() => {
            result.map_err(|e| AppError::internal(format!("Server error: {e}")))?;
        }
        _ = deadline => {
            tracing::warn!("Graceful shutdown timed out after {}s", grace.as_secs());
        }
    }

    db.close().await;
    tracing::info!("Campus server shut down gracefully");
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
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
}
