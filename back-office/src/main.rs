//! back-office: HTTP + WebSocket server entry point

use std::net::SocketAddr;

use back_office::{AppState, Config, api, kds, logger};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    // Load .env file
    let _ = dotenvy::dotenv();

    let config = Config::from_env()?;
    let _log_guard = logger::init_logger(config.log_dir.as_deref());

    tracing::info!("Starting back-office (env: {})", config.environment);
    if config.is_development() {
        tracing::warn!("Development mode: demo seeding enabled, secrets may be defaults");
    }

    let state = AppState::new(&config).await?;

    // Periodic rate limiter cleanup (every 5 minutes)
    let rate_limiter = state.rate_limiter.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(std::time::Duration::from_secs(300));
        loop {
            interval.tick().await;
            rate_limiter.cleanup().await;
        }
    });

    // Relay ticket rows written by the POS or seeding to connected screens
    kds::feed::spawn_listener(state.pool.clone(), state.kds.clone());

    let app = api::create_router(state);

    let http_addr = format!("0.0.0.0:{}", config.http_port);
    let listener = tokio::net::TcpListener::bind(&http_addr).await?;
    tracing::info!("back-office HTTP listening on {http_addr}");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("back-office stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
    }
    tracing::info!("Shutdown signal received");
}
