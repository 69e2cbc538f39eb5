use prediction_server::api::{create_router, AppState};
use prediction_server::models::ModelLifecycleManager;
use prediction_server::Config;
use std::sync::Arc;
use tokio::signal;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    let config = Config::load()?;

    // RUST_LOG wins when set; otherwise the configured LOG_LEVEL applies.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.server.log_level.clone()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(true)
        .with_line_number(true)
        .init();

    tracing::info!("🚀 Starting {}", config.model.service_name);

    // FAIL CLOSED: the service never comes up without a model.
    let manager = match ModelLifecycleManager::initialize(&config.model.model_path).await {
        Ok(manager) => Arc::new(manager),
        Err(e) => {
            tracing::error!("❌ Initial model load failed: {}", e);
            return Err(e.into());
        }
    };

    if let Some(artifact) = manager.current_artifact() {
        tracing::info!(
            "✅ Serving {} version {} ({} features)",
            artifact.model_type(),
            artifact.version(),
            artifact.schema().n_features()
        );
    }

    let state = Arc::new(AppState::new(manager, config.model.service_name.clone()));
    let app = create_router(state);

    let addr = config.bind_address();
    tracing::info!("🌐 Server starting on http://{}", addr);
    tracing::info!("📡 Available endpoints:");
    tracing::info!("  • GET  /              - Service identity");
    tracing::info!("  • GET  /health        - Health check");
    tracing::info!("  • POST /predict       - Single prediction");
    tracing::info!("  • POST /predict/batch - Batch prediction");
    tracing::info!("  • GET  /model/info    - Model metadata");
    tracing::info!("  • POST /model/reload  - Reload model from disk");

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("👋 Server shutdown complete");
    Ok(())
}

// Ctrl+C for interactive runs, SIGTERM for container shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
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

    tracing::info!("🛑 Shutdown signal received");
}
