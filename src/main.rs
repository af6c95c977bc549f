//! FurnaceAI Digital Twin - Main Entry Point
//!
//! Loads the model and scaler (downloading them on first run), then serves
//! the operator dashboard until Ctrl-C.

use anyhow::{Context, Result};
use furnace_twin::{
    config::{AppConfig, LoggingConfig, DEFAULT_CONFIG_PATH},
    dashboard::{self, Dashboard},
    types::FEATURE_COUNT,
    ArtifactProvider, PredictionEngine,
};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn init_logging(logging: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(format!("furnace_twin={},tower_http=info", logging.level)))
        .context("Invalid log level")?;

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if logging.format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let loaded = match std::env::args().nth(1) {
        Some(path) => Some(
            AppConfig::load_from_path(&path)
                .with_context(|| format!("Failed to load configuration from {path}"))?,
        ),
        None => AppConfig::load()?,
    };
    let using_defaults = loaded.is_none();
    let config = loaded.unwrap_or_default();

    init_logging(&config.logging)?;
    info!("Starting FurnaceAI Digital Twin");
    if using_defaults {
        info!(path = DEFAULT_CONFIG_PATH, "No configuration file, using defaults");
    }
    info!(
        model = %config.artifacts.model_path.display(),
        scaler = %config.artifacts.scaler_path.display(),
        "Configuration loaded successfully"
    );

    // Artifacts are required before anything is served
    let provider = ArtifactProvider::from_config(&config.artifacts, &config.fetch)
        .context("Failed to initialize artifact provider")?;
    let artifacts = provider
        .get_artifacts()
        .await
        .context("Model Loading Error")?;
    info!("Model Loaded Successfully");

    let engine = PredictionEngine::new(artifacts);
    info!(features = FEATURE_COUNT, "Prediction engine initialized");
    match engine.importances() {
        Ok(ranking) => info!(
            top_feature = ?ranking.first().map(|f| f.feature),
            "Feature importances available"
        ),
        Err(e) => info!("{e}"),
    }

    let dashboard = Arc::new(Dashboard::new(engine));
    let app = dashboard::router(dashboard.clone());

    let addr = config.server.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Dashboard listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    // Print final summary
    info!("Dashboard shutting down...");
    dashboard.metrics().print_summary();

    Ok(())
}
