// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Request handlers for the API endpoints.
//!
//! All parameters are passed in the query string.  Handlers validate them,
//! call into the controllers of the shared [`PowerGrid`][crate::PowerGrid],
//! and reply with the resulting record as JSON.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;

use crate::{
    Battery, ChargeResult, Connection, ExportedNode, Load, NodeType, PowerStats, SolarArray,
    TakePowerResult,
};

use super::types::{ApiError, LoadPowerResponse, SolarPowerResponse};
use super::AppState;

type Params = HashMap<String, String>;
type ApiResult<T> = Result<Json<T>, ApiError>;

/// Returns the value of a parameter that must be present and non-empty.
fn required<'a>(params: &'a Params, name: &str) -> Result<&'a str, ApiError> {
    params
        .get(name)
        .map(String::as_str)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::bad_parameter(format!("Missing parameter '{name}'")))
}

/// Returns the value of a required numeric parameter.
fn number(params: &Params, name: &str) -> Result<f64, ApiError> {
    required(params, name)?
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ApiError::bad_parameter(format!("'{name}' must be a number")))
}

fn node_type(params: &Params, name: &str) -> Result<NodeType, ApiError> {
    Ok(required(params, name)?.parse()?)
}

/// `POST /newBattery?WhCapacity=`
pub async fn new_battery(
    State(state): State<Arc<AppState>>,
    Query(params): Query<Params>,
) -> ApiResult<Battery> {
    let capacity_wh = number(&params, "WhCapacity")?;
    Ok(Json(state.grid.batteries().new_battery(capacity_wh)?))
}

/// `GET /getBattery?id=`
pub async fn get_battery(
    State(state): State<Arc<AppState>>,
    Query(params): Query<Params>,
) -> ApiResult<Battery> {
    let id = required(&params, "id")?;
    Ok(Json(state.grid.batteries().battery(id)?))
}

/// `POST /chargeBattery?id=&addWh=`
pub async fn charge_battery(
    State(state): State<Arc<AppState>>,
    Query(params): Query<Params>,
) -> ApiResult<ChargeResult> {
    let id = required(&params, "id")?;
    let add_wh = number(&params, "addWh")?;
    Ok(Json(state.grid.batteries().charge(id, add_wh)?))
}

/// `POST /dischargeBattery?id=&consumeWh=`
pub async fn discharge_battery(
    State(state): State<Arc<AppState>>,
    Query(params): Query<Params>,
) -> ApiResult<ChargeResult> {
    let id = required(&params, "id")?;
    let consume_wh = number(&params, "consumeWh")?;
    Ok(Json(state.grid.batteries().discharge(id, consume_wh)?))
}

/// `POST /newSolarArray?maxW=`
pub async fn new_solar_array(
    State(state): State<Arc<AppState>>,
    Query(params): Query<Params>,
) -> ApiResult<SolarArray> {
    let max_w = number(&params, "maxW")?;
    Ok(Json(state.grid.solar_arrays().new_solar_array(max_w)?))
}

/// `GET /getSolarArray?id=`
pub async fn get_solar_array(
    State(state): State<Arc<AppState>>,
    Query(params): Query<Params>,
) -> ApiResult<SolarArray> {
    let id = required(&params, "id")?;
    Ok(Json(state.grid.solar_arrays().solar_array(id)?))
}

/// `POST /setActiveSolarPower?id=&activeW=`
pub async fn set_active_solar_power(
    State(state): State<Arc<AppState>>,
    Query(params): Query<Params>,
) -> ApiResult<SolarPowerResponse> {
    let id = required(&params, "id")?;
    let active_w = number(&params, "activeW")?;
    let result = state.grid.solar_arrays().set_active_power(id, active_w)?;
    Ok(Json(result.into()))
}

/// `POST /newLoad?maxW=`
pub async fn new_load(
    State(state): State<Arc<AppState>>,
    Query(params): Query<Params>,
) -> ApiResult<Load> {
    let max_w = number(&params, "maxW")?;
    Ok(Json(state.grid.loads().new_load(max_w)?))
}

/// `GET /getLoad?id=`
pub async fn get_load(
    State(state): State<Arc<AppState>>,
    Query(params): Query<Params>,
) -> ApiResult<Load> {
    let id = required(&params, "id")?;
    Ok(Json(state.grid.loads().load(id)?))
}

/// `POST /setActiveLoadPower?id=&activeW=`
pub async fn set_active_load_power(
    State(state): State<Arc<AppState>>,
    Query(params): Query<Params>,
) -> ApiResult<LoadPowerResponse> {
    let id = required(&params, "id")?;
    let active_w = number(&params, "activeW")?;
    let result = state.grid.loads().set_active_power(id, active_w)?;
    Ok(Json(result.into()))
}

/// `POST /newConnection?sourceType=&sourceId=&sinkType=&sinkId=`
pub async fn new_connection(
    State(state): State<Arc<AppState>>,
    Query(params): Query<Params>,
) -> ApiResult<Connection> {
    let source_type = node_type(&params, "sourceType")?;
    let source_id = required(&params, "sourceId")?;
    let sink_type = node_type(&params, "sinkType")?;
    let sink_id = required(&params, "sinkId")?;
    let connections = state.grid.connections();
    Ok(Json(connections.new_connection(
        source_type,
        source_id,
        sink_type,
        sink_id,
    )?))
}

/// `POST /takePower?connectionId=&powerToken=`
///
/// `powerToken` may be left out on the first call.
pub async fn take_power(
    State(state): State<Arc<AppState>>,
    Query(params): Query<Params>,
) -> ApiResult<TakePowerResult> {
    let connection_id = required(&params, "connectionId")?;
    let power_token = params.get("powerToken").map(String::as_str).unwrap_or("");
    Ok(Json(
        state.grid.delivery().take_power(connection_id, power_token)?,
    ))
}

/// `POST /deliverPower`
pub async fn deliver_power(State(state): State<Arc<AppState>>) -> ApiResult<PowerStats> {
    Ok(Json(state.grid.delivery().deliver_all()?))
}

/// `GET /exportConnectionGraph`
pub async fn export_connection_graph(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Vec<ExportedNode>> {
    Ok(Json(state.grid.connections().export_graph()?))
}

/// Fallback for every route, when called with the wrong method.
pub async fn method_not_allowed() -> ApiError {
    ApiError::method_not_allowed()
}
