// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Serves the HTTP API of an in-memory power network, and delivers energy
//! through its connections at a fixed interval.
//!
//! Usage: `power-grid-server [CONFIG.toml]`.  The config path can also be
//! given through the `POWER_GRID_CONFIG` environment variable.

use std::sync::Arc;
use std::time::Duration;

use power_connection_graph::api::{self, AppState};
use power_connection_graph::{PowerGrid, ServerConfig, Stores, SystemClock};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const CONFIG_ENV_VAR: &str = "POWER_GRID_CONFIG";

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn load_config() -> Result<ServerConfig, Box<dyn std::error::Error>> {
    let path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var(CONFIG_ENV_VAR).ok());
    let Some(path) = path else {
        tracing::info!("No config file given, using defaults.");
        return Ok(ServerConfig::default());
    };
    let contents = std::fs::read_to_string(&path)
        .map_err(|e| format!("Can't read config file {path}: {e}"))?;
    tracing::info!("Loaded config from {path}.");
    Ok(ServerConfig::from_toml_str(&contents)?)
}

/// Runs a delivery sweep every `interval`, starting one interval from now.
async fn run_sweeps(grid: PowerGrid, interval: Duration) {
    let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + interval, interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    loop {
        ticker.tick().await;
        let delivery = grid.delivery();
        match tokio::task::spawn_blocking(move || delivery.deliver_all()).await {
            Ok(Ok(_)) => {}
            Ok(Err(err)) => tracing::error!("Delivery sweep failed: {err}"),
            Err(err) => tracing::error!("Delivery sweep panicked: {err}"),
        }
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("Can't listen for shutdown signal: {err}");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down.");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let config = load_config()?;
    let addr = config.socket_addr()?;
    let grid = PowerGrid::new(Stores::in_memory(), Arc::new(SystemClock), config.grid);

    let sweeps = tokio::spawn(run_sweeps(
        grid.clone(),
        Duration::from_secs(config.sweep_interval_seconds),
    ));
    let result = api::serve(Arc::new(AppState { grid }), addr, shutdown_signal()).await;
    sweeps.abort();

    Ok(result?)
}
