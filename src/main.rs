use std::process::ExitCode;

use barista_pay::api::{AppState, create_router};
use barista_pay::config::ConfigLoader;
use tracing_subscriber::EnvFilter;

const CONFIG_DIR_VAR: &str = "BARISTA_PAY_CONFIG";
const DEFAULT_CONFIG_DIR: &str = "./config/barista-pay";
const LISTEN_ADDR_VAR: &str = "LISTEN_ADDR";
const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:5000";

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config_dir =
        std::env::var(CONFIG_DIR_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_DIR.to_string());
    let loader = match ConfigLoader::load(&config_dir).and_then(ConfigLoader::with_env_overrides) {
        Ok(loader) => loader,
        Err(err) => {
            tracing::error!(config_dir = %config_dir, error = %err, "Invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    let boundaries = loader.config().boundaries();
    tracing::info!(
        shop = %loader.config().name(),
        timezone = %loader.config().timezone(),
        open = %boundaries.open(),
        switch = %boundaries.switch(),
        close = %boundaries.close(),
        employees = loader.config().roster().employees().len(),
        "Configuration loaded"
    );

    let addr = std::env::var(LISTEN_ADDR_VAR).unwrap_or_else(|_| DEFAULT_LISTEN_ADDR.to_string());
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!(addr = %addr, error = %err, "Failed to bind");
            return ExitCode::FAILURE;
        }
    };
    tracing::info!(addr = %addr, "Listening");

    let router = create_router(AppState::new(loader));
    let shutdown = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %err, "Failed to listen for shutdown signal");
        }
        tracing::info!("shutting down");
    };

    if let Err(err) = axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await
    {
        tracing::error!(error = %err, "Server error");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
