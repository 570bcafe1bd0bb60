// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Creation, retrieval and power setting of loads.

use crate::{Error, Load};

use super::{ensure_non_negative, log_event, SetActivePowerResult, Stores};

/// Load controller.
#[derive(Clone)]
pub struct LoadController {
    stores: Stores,
}

impl LoadController {
    pub(crate) fn new(stores: Stores) -> Self {
        Self { stores }
    }

    /// Creates a new load that can consume up to `max_w`.
    pub fn new_load(&self, max_w: f64) -> Result<Load, Error> {
        ensure_non_negative("maxW", max_w)?;

        let loads = &self.stores.loads;
        let id = loads.create()?;
        loads.update(&id, &|l| {
            l.id = id.clone();
            l.max_w = max_w;
        })?;
        log_event(
            &*self.stores.event_log,
            format!("CREATED new load with ID {id} and max power {max_w} W"),
        );
        self.load(&id)
    }

    /// Returns the load with the given `id`.
    pub fn load(&self, id: &str) -> Result<Load, Error> {
        self.stores
            .loads
            .read(id)?
            .ok_or_else(|| Error::entity_not_found(format!("Load with id {id} not found.")))
    }

    /// Sets the power currently requested by the load, clamped to `max_w`.
    /// Negative power is rejected.
    pub fn set_active_power(
        &self,
        id: &str,
        active_w: f64,
    ) -> Result<SetActivePowerResult<Load>, Error> {
        ensure_non_negative("activeW", active_w)?;
        let load = self.load(id)?;
        let new_power = load.max_w.min(active_w);

        log_event(
            &*self.stores.event_log,
            format!("SET load {id}, power {new_power} W"),
        );
        self.stores.loads.update(id, &|l| l.active_w = new_power)?;

        Ok(SetActivePowerResult {
            active_w: new_power,
            entity: self.load(id)?,
        })
    }

    /// Remembers the last token issued to the load as a sink.
    pub(crate) fn set_power_token(&self, id: &str, token: &str) -> Result<(), Error> {
        self.stores
            .loads
            .update(id, &|l| l.power_token = Some(token.to_string()))
    }
}
