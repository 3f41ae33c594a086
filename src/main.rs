use anyhow::Context;
use reqwest::Client;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use skycast::cache::{create_geo_cache, start_cache_cleanup_task};
use skycast::config::AppConfig;
use skycast::routes::build_router;
use skycast::AppState;

/// Shared HTTP client configuration
const HTTP_TIMEOUT_SECS: u64 = 30;
const HTTP_CONNECT_TIMEOUT_SECS: u64 = 5;
const HTTP_POOL_IDLE_TIMEOUT_SECS: u64 = 90;

/// Create shared HTTP client with connection pooling
fn create_http_client() -> anyhow::Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
        .connect_timeout(Duration::from_secs(HTTP_CONNECT_TIMEOUT_SECS))
        .pool_idle_timeout(Duration::from_secs(HTTP_POOL_IDLE_TIMEOUT_SECS))
        .pool_max_idle_per_host(10)
        .build()
        .context("Failed to create HTTP client")
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for ctrl+c");
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
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
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

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "skycast=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load()?;
    tracing::info!(
        default_city = %config.default_city,
        units = %config.units,
        max_days = config.forecast.max_days,
        "Configuration loaded successfully"
    );

    let http_client = create_http_client()?;
    tracing::debug!("Shared HTTP client created");

    let geo_cache = create_geo_cache();
    let _cleanup_task = start_cache_cleanup_task(geo_cache.clone());

    let addr = format!("{}:{}", config.host, config.port);
    let state = AppState::new(config, http_client, geo_cache)?;

    match state.config.forecast.timezone.as_deref() {
        Some(tz) => tracing::info!(timezone = %tz, "Forecast dates use configured time zone"),
        None => tracing::info!("Forecast dates use each location's UTC offset"),
    }

    if state.precautions_service.is_configured() {
        tracing::info!(
            model = %state.config.assistant.model,
            daily_limit = state.config.assistant.daily_limit,
            "Weather assistant configured"
        );
    } else {
        tracing::info!("Weather assistant not configured, precautions disabled");
    }

    if state.config.api_key.is_some() {
        tracing::info!("API key authentication enabled for precautions");
    }

    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}
