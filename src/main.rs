use std::net::SocketAddr;

use anyhow::{Context, Result};
use dotenvy::dotenv;
use tokio::signal;
use tracing::{error, info, warn};

use fleet_maintenance::config::{DatabaseConfig, EnvironmentConfig};
use fleet_maintenance::middleware::cors_middleware;
use fleet_maintenance::{create_router, database, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    let config = EnvironmentConfig::from_env()?;

    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .init();

    info!("🚚 Fleet Maintenance API");
    info!("Environment: {}", config.environment);

    let state = match &config.database_url {
        Some(url) => {
            let db_config = DatabaseConfig::from_env(url.clone())?;
            let pool = database::connect(&db_config).await.map_err(|e| {
                error!("❌ Could not connect to the database: {}", e);
                anyhow::anyhow!("Database error: {}", e)
            })?;
            info!("✅ Postgres store ready");
            AppState::postgres(pool)
        }
        None => {
            warn!("DATABASE_URL not set, using the in-memory store (data is lost on restart)");
            AppState::in_memory()
        }
    };

    let app = create_router(state).layer(cors_middleware(&config));

    let addr: SocketAddr = config
        .server_url()
        .parse()
        .with_context(|| format!("Invalid bind address {}", config.server_url()))?;

    info!("🌐 Listening on http://{}", addr);
    info!("   GET    /vehicles/        list vehicles");
    info!("   POST   /vehicles/        create vehicle");
    info!("   GET    /vehicles/:id/    retrieve vehicle");
    info!("   PATCH  /vehicles/:id/    update vehicle");
    info!("   DELETE /vehicles/:id/    delete vehicle");
    info!("   GET    /tasks/           list maintenance tasks");
    info!("   POST   /tasks/           create maintenance task");
    info!("   GET    /tasks/:id/       retrieve maintenance task");
    info!("   PATCH  /tasks/:id/       update maintenance task");
    info!("   DELETE /tasks/:id/       delete maintenance task");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| {
            error!("❌ Server error: {}", e);
            e
        })?;

    info!("👋 Server stopped");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM.
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
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Ctrl+C received, shutting down...");
        },
        _ = terminate => {
            info!("🛑 Termination signal received, shutting down...");
        },
    }
}
