// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Controllers for the entities of the power network, the connections
//! between them, and the delivery of energy over those connections.

mod battery;
mod connection;
mod delivery;
mod load;
mod solar_array;

pub use battery::{BatteryController, ChargeResult};
pub use connection::ConnectionController;
pub use delivery::{DeliveryController, PowerStats, TakePowerResult};
pub use load::LoadController;
pub use solar_array::{SetActivePowerResult, SolarArrayController};

use std::sync::Arc;

use crate::store::{EventLog, InMemoryEventLog, InMemoryStore, Store};
use crate::{Battery, Clock, Connection, Error, GridConfig, Load, SolarArray};

/// The stores and the event log shared by all controllers.
#[derive(Clone)]
pub struct Stores {
    pub batteries: Arc<dyn Store<Battery>>,
    pub solar_arrays: Arc<dyn Store<SolarArray>>,
    pub loads: Arc<dyn Store<Load>>,
    pub connections: Arc<dyn Store<Connection>>,
    pub event_log: Arc<dyn EventLog>,
}

impl Stores {
    /// Creates a set of empty in-memory stores and an in-memory event log.
    pub fn in_memory() -> Self {
        Self {
            batteries: Arc::new(InMemoryStore::<Battery>::new()),
            solar_arrays: Arc::new(InMemoryStore::<SolarArray>::new()),
            loads: Arc::new(InMemoryStore::<Load>::new()),
            connections: Arc::new(InMemoryStore::<Connection>::new()),
            event_log: Arc::new(InMemoryEventLog::new()),
        }
    }
}

/// Entry point to all controllers of one power network.
#[derive(Clone)]
pub struct PowerGrid {
    stores: Stores,
    clock: Arc<dyn Clock>,
    config: GridConfig,
}

impl PowerGrid {
    pub fn new(stores: Stores, clock: Arc<dyn Clock>, config: GridConfig) -> Self {
        Self {
            stores,
            clock,
            config,
        }
    }

    pub fn batteries(&self) -> BatteryController {
        BatteryController::new(self.stores.clone())
    }

    pub fn solar_arrays(&self) -> SolarArrayController {
        SolarArrayController::new(self.stores.clone())
    }

    pub fn loads(&self) -> LoadController {
        LoadController::new(self.stores.clone())
    }

    pub fn connections(&self) -> ConnectionController {
        ConnectionController::new(self.stores.clone())
    }

    pub fn delivery(&self) -> DeliveryController {
        DeliveryController::new(self.stores.clone(), self.clock.clone(), self.config.clone())
    }
}

/// Checks that a quantity passed in by a caller is a non-negative number.
pub(crate) fn ensure_non_negative(name: &str, value: f64) -> Result<(), Error> {
    if !value.is_finite() {
        return Err(Error::invalid_parameter(format!(
            "'{name}' must be a number"
        )));
    }
    if value < 0.0 {
        return Err(Error::invalid_parameter(format!(
            "'{name}' must not be negative"
        )));
    }
    Ok(())
}

/// Appends an entry to the event log.
///
/// A failure to log doesn't undo the change being logged, so it is reported
/// and otherwise ignored.
pub(crate) fn log_event(event_log: &dyn EventLog, description: String) {
    if let Err(err) = event_log.append(&description) {
        tracing::error!("Failed to append to event log: {err}. Entry: {description}");
    }
}
