// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Persisted records for the entities of the power network and the
//! connections between them.

use serde::{Deserialize, Serialize};

use crate::{Edge, NodeType};

/// A battery that can be charged from a solar array and discharged into a
/// load.
///
/// `charge_wh` always stays within `0..=capacity_wh`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Battery {
    pub id: String,
    #[serde(rename = "WhCapacity")]
    pub capacity_wh: f64,
    #[serde(rename = "WhCharge")]
    pub charge_wh: f64,
    /// Last token issued to this battery as the sink of a connection.
    ///
    /// This is a cache of the token held by the connection's
    /// [`TransferSession`], which remains the source of truth.  It is never
    /// serialized, so replies about the battery don't hand it out.
    #[serde(rename = "powerToken", default, skip_serializing)]
    pub power_token: Option<String>,
}

/// A solar array producing up to `max_w`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolarArray {
    pub id: String,
    pub max_w: f64,
    /// Currently produced power, always within `0..=max_w`.
    pub active_w: f64,
}

/// A load consuming up to `max_w`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Load {
    pub id: String,
    pub max_w: f64,
    /// Currently requested power, always within `0..=max_w`.
    pub active_w: f64,
    /// Last token issued to this load as the sink of a connection.  See
    /// [`Battery::power_token`].
    #[serde(default, skip_serializing)]
    pub power_token: Option<String>,
}

/// Bookkeeping of the token-gated transfer protocol for one connection.
///
/// A connection without a session has never been used.  Once a session
/// exists, presenting its `token` before `expire_time_utc_seconds`
/// authorizes one energy transfer covering the time since
/// `connection_time_utc_seconds`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferSession {
    pub token: String,
    pub connection_time_utc_seconds: i64,
    pub expire_time_utc_seconds: i64,
}

/// A directed connection through which `source` delivers energy to `sink`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    pub id: String,
    pub source_id: String,
    pub source_type: Option<NodeType>,
    pub sink_id: String,
    pub sink_type: Option<NodeType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transfer_session: Option<TransferSession>,
}

impl Edge for Connection {
    fn connection_id(&self) -> &str {
        &self.id
    }

    fn source_id(&self) -> &str {
        &self.source_id
    }

    fn source_type(&self) -> Option<NodeType> {
        self.source_type
    }

    fn sink_id(&self) -> &str {
        &self.sink_id
    }

    fn sink_type(&self) -> Option<NodeType> {
        self.sink_type
    }
}
