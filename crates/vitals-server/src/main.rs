use anyhow::{Context, Result};
use vitals_db::{create_pool, run_migrations};
use vitals_server::access::seed_initial_admin;
use vitals_server::config::load_config;
use vitals_server::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!("Starting vitals server");

    let config_path = std::env::var("VITALS_CONFIG").unwrap_or_else(|_| "vitals.yaml".to_string());
    tracing::info!("Loading config from: {}", config_path);
    let config = load_config(&config_path)?;

    tracing::info!("Connecting to database...");
    let pool = create_pool(&config.db.url)
        .await
        .context("Failed to create database pool")?;

    tracing::info!("Running database migrations...");
    run_migrations(&pool)
        .await
        .context("Failed to run migrations")?;

    seed_initial_admin(&pool, &config.auth)
        .await
        .context("Failed to seed initial admin")?;

    let listen = config.listen.clone();
    let state = AppState::new(pool, config).context("Failed to build application state")?;
    let app = vitals_server::web::build_router(state);

    let listener = tokio::net::TcpListener::bind(&listen)
        .await
        .with_context(|| format!("Failed to bind to {}", listen))?;

    tracing::info!("Server listening on {}", listen);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
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

    tracing::info!("Shutdown signal received, stopping...");
}
