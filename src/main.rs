use anyhow::Context;
use dotenvy::dotenv;
use tokio::net::TcpListener;

use classroom::router::init_router;
use classroom::state::init_app_state;
use classroom_config::DatabaseConfig;
use classroom_db::run_migrations;
use classroom_observability::{init_tracing, shutdown_tracer};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    init_tracing();

    let database_config = DatabaseConfig::from_env()?;
    let state = init_app_state(&database_config)
        .await
        .context("Failed to connect to database")?;

    if database_config.run_migrations {
        run_migrations(&state.db)
            .await
            .context("Failed to run database migrations")?;
    }

    let address = state.server_config.bind_address();
    let app = init_router(state);

    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {address}"))?;

    tracing::info!(%address, "Server running");
    tracing::info!("Swagger UI available at http://{address}/swagger-ui");
    tracing::info!("Scalar UI available at http://{address}/scalar");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Server stopped");
    shutdown_tracer().await;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
