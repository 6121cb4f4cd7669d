mod seed;

use anyhow::Context;
use std::sync::Arc;
use std::time::Duration;
use stockroom_core::{run_migrations, AppConfig, Database};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let (config, overrides) = AppConfig::load_with_env().context("failed to load configuration")?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=info".into()),
        )
        .init();

    for key in &overrides {
        tracing::debug!(key = %key, "config value taken from environment");
    }

    if config.auth.bypass {
        tracing::warn!("authentication bypass is ON: every request runs as SuperAdmin");
    }

    let db = Database::connect(&config.database)
        .await
        .context("failed to connect to database")?;
    let applied = run_migrations(&db).await.context("failed to run migrations")?;
    tracing::info!(applied, url = %config.database.url, "database ready");

    let state = Arc::new(api::AppState::new(db.clone(), &config.auth)?);
    seed::seed_database(&state.auth_service, &config.seed)
        .await
        .context("failed to seed database")?;

    let app = api::app(state, Duration::from_secs(config.server.request_timeout_seconds));

    let listener = tokio::net::TcpListener::bind(config.listen_addr())
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr()))?;
    tracing::info!(addr = %listener.local_addr()?, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.close().await;
    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl+C");
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
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::warn!("received Ctrl+C, shutting down"),
        _ = terminate => tracing::warn!("received SIGTERM, shutting down"),
    }
}
