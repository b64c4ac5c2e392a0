use anyhow::{Context, Result};
use herald::api::{create_router, AppState};
use herald::broker::{BrokerHandle, BrokerOptions};
use herald::config::{load_config, HeraldConfig};
use herald::ticker::run_ticker;
use herald::world::World;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "herald=info".into()),
        )
        .init();

    info!("Herald starting...");

    let mut config = match std::env::var("HERALD_CONFIG") {
        Ok(path) => {
            info!(path = %path, "Loading configuration file");
            load_config(&path)?
        }
        Err(_) => HeraldConfig::default(),
    };
    config.apply_env();
    config.validate().context("Invalid configuration")?;

    info!(
        listen = %config.listen_address(),
        tick_interval_ms = config.ticker.interval_ms,
        patience_ms = config.broker.patience_ms,
        world_width = config.world.width,
        world_height = config.world.height,
        "Configuration loaded"
    );

    let world = Arc::new(World::new(config.world.width, config.world.height));
    let broker = BrokerHandle::spawn(BrokerOptions::from(&config), world);

    let ticker_handle = if config.ticker.enabled {
        Some(tokio::spawn(run_ticker(
            broker.clone(),
            Duration::from_millis(config.ticker.interval_ms),
        )))
    } else {
        info!("Ticker disabled");
        None
    };

    let router = create_router(AppState {
        broker,
        keep_alive: Duration::from_secs(config.server.keep_alive_seconds),
    });
    let listener = tokio::net::TcpListener::bind(config.listen_address())
        .await
        .context("Failed to bind HTTP listener")?;
    info!(address = %config.listen_address(), "Herald listening");

    let server_handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, router).await {
            tracing::error!(error = %e, "HTTP server error");
        }
    });

    // Wait for shutdown signal
    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for ctrl_c signal")?;
    info!("Shutdown signal received");

    server_handle.abort();
    if let Some(handle) = ticker_handle {
        handle.abort();
    }
    info!("Herald stopped");

    Ok(())
}
