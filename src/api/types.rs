// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! API response types, and the mapping of library errors to responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::{Error, ErrorKind, Load, SetActivePowerResult, SolarArray};

/// Body of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// An error response with its status code.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    /// A request that can't be served because a parameter is missing or
    /// malformed.
    pub fn bad_parameter(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }

    pub fn method_not_allowed() -> Self {
        Self {
            status: StatusCode::METHOD_NOT_ALLOWED,
            message: "HTTP method not allowed".to_string(),
        }
    }
}

/// Client errors are reported as `404 Not Found`, which is what existing
/// clients of the API expect.
impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        let status = match err.kind() {
            ErrorKind::ConnectionNotFound
            | ErrorKind::EntityNotFound
            | ErrorKind::InvalidConnection
            | ErrorKind::InvalidParameter => StatusCode::NOT_FOUND,
            ErrorKind::InvalidGraph | ErrorKind::Internal | ErrorKind::Store => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self {
            status,
            message: err.description().to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorResponse {
                error: self.message,
            }),
        )
            .into_response()
    }
}

/// Response of `setActiveSolarPower`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SolarPowerResponse {
    pub active_w: f64,
    pub solar_array: SolarArray,
}

impl From<SetActivePowerResult<SolarArray>> for SolarPowerResponse {
    fn from(result: SetActivePowerResult<SolarArray>) -> Self {
        Self {
            active_w: result.active_w,
            solar_array: result.entity,
        }
    }
}

/// Response of `setActiveLoadPower`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadPowerResponse {
    pub active_w: f64,
    pub load: Load,
}

impl From<SetActivePowerResult<Load>> for LoadPowerResponse {
    fn from(result: SetActivePowerResult<Load>) -> Self {
        Self {
            active_w: result.active_w,
            load: result.entity,
        }
    }
}
