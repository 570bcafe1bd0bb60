// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Delivery of energy over connections.
//!
//! A sweep builds the graph of all connections and visits it sinks-first.
//! Batteries fed by a solar array are charged from it, and loads fed by a
//! battery are supplied from it.  How much energy moves in each step is
//! decided by [`calculate_transfer`], so a step only moves energy when it
//! presents the token issued by the previous step on the same connection.
//!
//! The connection's [`TransferSession`] holds the authoritative token.  The
//! sink entity keeps a copy of the last token it was issued, which is the
//! token a sweep presents on its behalf.

use std::sync::Arc;

use serde::Serialize;

use crate::transfer::{calculate_transfer, EnergyTransfer, TransferCapacity, TransferNote};
use crate::{Clock, Connection, Error, GridConfig, NodeType, PowerNode, TransferSession};

use super::{
    log_event, BatteryController, ConnectionController, LoadController, SolarArrayController,
    Stores,
};

/// Counts of the steps completed by a sweep.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PowerStats {
    pub battery_charged_with_solar_count: usize,
    pub battery_discharged_with_load_count: usize,
    /// Steps that were skipped because a record was missing or couldn't be
    /// updated.
    pub failed_count: usize,
}

/// The outcome of a single transfer over a connection.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TakePowerResult {
    pub connection_id: String,
    pub source_id: String,
    pub sink_id: String,
    pub energy_wh: f64,
    pub duration_hours: f64,
    /// Effective rate of the transfer.
    pub rate_w: f64,
    /// The token to present for the next transfer.  Empty when the
    /// presented token was rejected.
    pub power_token: String,
    pub expire_time_utc_seconds: i64,
    pub note: String,
    #[serde(skip)]
    pub outcome: TransferNote,
}

impl TakePowerResult {
    fn new(connection: &Connection, transfer: &EnergyTransfer) -> Self {
        // A rejected caller must not learn the token of the current holder.
        let (power_token, expire_time_utc_seconds) = match transfer.note {
            TransferNote::WrongToken => (String::new(), 0),
            _ => (
                transfer.session.token.clone(),
                transfer.session.expire_time_utc_seconds,
            ),
        };
        Self {
            connection_id: connection.id.clone(),
            source_id: connection.source_id.clone(),
            sink_id: connection.sink_id.clone(),
            energy_wh: transfer.energy_wh,
            duration_hours: transfer.duration_hours,
            rate_w: transfer.rate_w,
            power_token,
            expire_time_utc_seconds,
            note: transfer.note.to_string(),
            outcome: transfer.note,
        }
    }
}

/// The two kinds of steps a sweep can take.
#[derive(Clone, Copy, Debug, PartialEq)]
enum Step {
    /// A solar array charges a battery.
    Charge,
    /// A battery supplies a load.
    Discharge,
}

impl Step {
    fn of(source_type: Option<NodeType>, sink_type: Option<NodeType>) -> Option<Step> {
        match (source_type?, sink_type?) {
            (NodeType::Solar, NodeType::Battery) => Some(Step::Charge),
            (NodeType::Battery, NodeType::Load) => Some(Step::Discharge),
            _ => None,
        }
    }
}

/// Moves energy over connections.
#[derive(Clone)]
pub struct DeliveryController {
    stores: Stores,
    clock: Arc<dyn Clock>,
    config: GridConfig,
}

impl DeliveryController {
    pub(crate) fn new(stores: Stores, clock: Arc<dyn Clock>, config: GridConfig) -> Self {
        Self {
            stores,
            clock,
            config,
        }
    }

    fn batteries(&self) -> BatteryController {
        BatteryController::new(self.stores.clone())
    }

    fn solar_arrays(&self) -> SolarArrayController {
        SolarArrayController::new(self.stores.clone())
    }

    fn loads(&self) -> LoadController {
        LoadController::new(self.stores.clone())
    }

    fn connections(&self) -> ConnectionController {
        ConnectionController::new(self.stores.clone())
    }

    /// Runs one sweep over all connections.
    ///
    /// Returns an error without moving any energy if the connections form a
    /// cycle.  A step that fails is logged and counted, and doesn't stop the
    /// sweep.
    pub fn deliver_all(&self) -> Result<PowerStats, Error> {
        let graph = self.connections().graph()?;
        if let Err(err) = graph.validate_acyclicity() {
            tracing::error!("Not delivering power. {err}");
            return Err(err);
        }

        let mut stats = PowerStats::default();
        let all_success = graph.visit_sinks_first(|node| {
            let Ok(Some(source)) = graph.source(node.id()) else {
                return true;
            };
            let Some(step) = Step::of(Some(source.node_type()), Some(node.node_type())) else {
                return true;
            };
            match self.sweep_step(node, graph.source_connection(node.id()).ok().flatten()) {
                Ok(_) => {
                    match step {
                        Step::Charge => stats.battery_charged_with_solar_count += 1,
                        Step::Discharge => stats.battery_discharged_with_load_count += 1,
                    }
                    true
                }
                Err(err) => {
                    tracing::error!("Skipping delivery to {}. {err}", node.id());
                    stats.failed_count += 1;
                    false
                }
            }
        });

        tracing::info!(
            charged = stats.battery_charged_with_solar_count,
            discharged = stats.battery_discharged_with_load_count,
            failed = stats.failed_count,
            all_success,
            "Delivered power through connections."
        );
        Ok(stats)
    }

    /// Runs one step for the sink `node`, presenting the token remembered
    /// by the sink.
    fn sweep_step(
        &self,
        node: &PowerNode,
        connection: Option<&Connection>,
    ) -> Result<TakePowerResult, Error> {
        let connection = connection.ok_or_else(|| {
            Error::internal(format!("Node {} has a source but no connection.", node.id()))
        })?;
        // The graph was built from a snapshot, so the session has to be
        // re-read before it is used.
        let connection = self.connections().connection(&connection.id)?;
        self.transfer(&connection, None)
    }

    /// Moves energy over the connection with the given `id`, on behalf of a
    /// caller presenting `power_token`.
    ///
    /// The first call on a connection, and any call presenting a token other
    /// than the last one issued, moves no energy.  The returned result
    /// carries the token to present next.
    pub fn take_power(
        &self,
        connection_id: &str,
        power_token: &str,
    ) -> Result<TakePowerResult, Error> {
        let connection = self.connections().connection(connection_id)?;
        self.transfer(&connection, Some(power_token))
    }

    /// Runs the transfer calculation for `connection` and applies its
    /// outcome.  Without a `presented_token`, the token remembered by the
    /// sink entity is used.
    fn transfer(
        &self,
        connection: &Connection,
        presented_token: Option<&str>,
    ) -> Result<TakePowerResult, Error> {
        let Some(step) = Step::of(connection.source_type, connection.sink_type) else {
            return Err(Error::invalid_connection(format!(
                "Connection {} doesn't deliver energy from SOLAR to BATTERY or from BATTERY \
                 to LOAD.",
                connection.id
            )));
        };

        let (capacity, remembered_token, source_kind, sink_kind) = match step {
            Step::Charge => {
                let solar = self.solar_arrays().solar_array(&connection.source_id)?;
                let battery = self.batteries().battery(&connection.sink_id)?;
                let capacity = TransferCapacity {
                    rate_w: solar.active_w,
                    energy_wh: battery.capacity_wh - battery.charge_wh,
                };
                (capacity, battery.power_token, "solar", "battery")
            }
            Step::Discharge => {
                let battery = self.batteries().battery(&connection.source_id)?;
                let load = self.loads().load(&connection.sink_id)?;
                let capacity = TransferCapacity {
                    rate_w: load.active_w,
                    energy_wh: battery.charge_wh,
                };
                (capacity, load.power_token, "battery", "load")
            }
        };
        let used_token = match presented_token {
            Some(token) => token.to_string(),
            None => remembered_token.unwrap_or_default(),
        };

        let transfer = calculate_transfer(
            connection.transfer_session.as_ref(),
            self.clock.now_utc_seconds(),
            &used_token,
            capacity,
            &self.config,
        );

        if transfer.energy_wh > 0.0 {
            let batteries = self.batteries();
            match step {
                Step::Charge => {
                    batteries.charge(&connection.sink_id, transfer.energy_wh)?;
                }
                Step::Discharge => {
                    batteries.discharge(&connection.source_id, transfer.energy_wh)?;
                }
            }
        }
        // A sweep acts for the sink, so its echo is resynchronized even when
        // it was stale.  A rejected outside caller leaves it untouched.
        let rejected_caller =
            presented_token.is_some() && transfer.note == TransferNote::WrongToken;
        if !rejected_caller {
            match step {
                Step::Charge => self
                    .batteries()
                    .set_power_token(&connection.sink_id, &transfer.session.token)?,
                Step::Discharge => self
                    .loads()
                    .set_power_token(&connection.sink_id, &transfer.session.token)?,
            }
        }
        if !transfer.kept_session() {
            self.connections()
                .update_session(&connection.id, &transfer.session)?;
        }

        let result = TakePowerResult::new(connection, &transfer);
        self.log_transfer(connection, source_kind, sink_kind, &used_token, &transfer, &result);
        Ok(result)
    }

    fn log_transfer(
        &self,
        connection: &Connection,
        source_kind: &str,
        sink_kind: &str,
        used_token: &str,
        transfer: &EnergyTransfer,
        result: &TakePowerResult,
    ) {
        let TransferSession {
            connection_time_utc_seconds,
            expire_time_utc_seconds,
            ..
        } = &transfer.session;
        log_event(
            &*self.stores.event_log,
            format!(
                "TRANSFER energy with connection {}, from {source_kind} {}, to {sink_kind} {}, \
                 transferred {} Wh, power {} W, duration {} h, used token {used_token}, \
                 connection UTC time {connection_time_utc_seconds}, \
                 expire UTC time {expire_time_utc_seconds}, new token {}, note {}",
                connection.id,
                connection.source_id,
                connection.sink_id,
                transfer.energy_wh,
                transfer.rate_w,
                transfer.duration_hours,
                result.power_token,
                transfer.note,
            ),
        );
    }
}
