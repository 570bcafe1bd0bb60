// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! HTTP API for a [`PowerGrid`].
//!
//! Every operation of the controllers is exposed as its own route, taking
//! its parameters from the query string:
//!
//! - `POST /newBattery`, `GET /getBattery`, `POST /chargeBattery`,
//!   `POST /dischargeBattery`
//! - `POST /newSolarArray`, `GET /getSolarArray`, `POST /setActiveSolarPower`
//! - `POST /newLoad`, `GET /getLoad`, `POST /setActiveLoadPower`
//! - `POST /newConnection`, `POST /takePower`, `POST /deliverPower`,
//!   `GET /exportConnectionGraph`
//!
//! Errors are replied with a JSON body of the form `{"error": "..."}`.

mod handlers;
mod types;

pub use types::{ApiError, ErrorResponse, LoadPowerResponse, SolarPowerResponse};

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;

use crate::PowerGrid;

/// Application state shared across all request handlers.
pub struct AppState {
    pub grid: PowerGrid,
}

/// Builds the axum router with all API routes.
pub fn router(state: Arc<AppState>) -> Router {
    use handlers::*;

    Router::new()
        .route("/newBattery", post(new_battery).fallback(method_not_allowed))
        .route("/getBattery", get(get_battery).fallback(method_not_allowed))
        .route(
            "/chargeBattery",
            post(charge_battery).fallback(method_not_allowed),
        )
        .route(
            "/dischargeBattery",
            post(discharge_battery).fallback(method_not_allowed),
        )
        .route(
            "/newSolarArray",
            post(new_solar_array).fallback(method_not_allowed),
        )
        .route(
            "/getSolarArray",
            get(get_solar_array).fallback(method_not_allowed),
        )
        .route(
            "/setActiveSolarPower",
            post(set_active_solar_power).fallback(method_not_allowed),
        )
        .route("/newLoad", post(new_load).fallback(method_not_allowed))
        .route("/getLoad", get(get_load).fallback(method_not_allowed))
        .route(
            "/setActiveLoadPower",
            post(set_active_load_power).fallback(method_not_allowed),
        )
        .route(
            "/newConnection",
            post(new_connection).fallback(method_not_allowed),
        )
        .route("/takePower", post(take_power).fallback(method_not_allowed))
        .route(
            "/deliverPower",
            post(deliver_power).fallback(method_not_allowed),
        )
        .route(
            "/exportConnectionGraph",
            get(export_connection_graph).fallback(method_not_allowed),
        )
        .with_state(state)
}

/// Binds to `addr` and serves the API until `shutdown` completes.
pub async fn serve(
    state: Arc<AppState>,
    addr: SocketAddr,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("API server listening on http://{addr}");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
}
