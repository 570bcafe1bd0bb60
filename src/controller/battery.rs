// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Creation, retrieval, charging and discharging of batteries.

use serde::Serialize;

use crate::{Battery, Error};

use super::{ensure_non_negative, log_event, Stores};

/// The result of charging or discharging a battery.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ChargeResult {
    /// The change in charge actually applied.  Negative when discharging.
    #[serde(rename = "WhChange")]
    pub change_wh: f64,
    pub battery: Battery,
}

/// Battery controller.
#[derive(Clone)]
pub struct BatteryController {
    stores: Stores,
}

impl BatteryController {
    pub(crate) fn new(stores: Stores) -> Self {
        Self { stores }
    }

    /// Creates a new empty battery that can hold `capacity_wh`.
    pub fn new_battery(&self, capacity_wh: f64) -> Result<Battery, Error> {
        ensure_non_negative("WhCapacity", capacity_wh)?;

        let batteries = &self.stores.batteries;
        let id = batteries.create()?;
        batteries.update(&id, &|b| {
            b.id = id.clone();
            b.capacity_wh = capacity_wh;
        })?;
        log_event(
            &*self.stores.event_log,
            format!("CREATED new battery with ID {id} and capacity {capacity_wh} Wh"),
        );
        self.battery(&id)
    }

    /// Returns the battery with the given `id`.
    pub fn battery(&self, id: &str) -> Result<Battery, Error> {
        self.stores
            .batteries
            .read(id)?
            .ok_or_else(|| Error::entity_not_found(format!("Battery with id {id} not found.")))
    }

    /// Adds up to `add_wh` to the battery, without going over its capacity.
    pub fn charge(&self, id: &str, add_wh: f64) -> Result<ChargeResult, Error> {
        ensure_non_negative("addWh", add_wh)?;

        let battery = self.battery(id)?;
        let new_charge = battery.capacity_wh.min(battery.charge_wh + add_wh);
        let change_wh = new_charge - battery.charge_wh;

        log_event(
            &*self.stores.event_log,
            format!("CHARGE battery {id}, {change_wh} Wh, new charge {new_charge} Wh"),
        );
        self.stores
            .batteries
            .update(id, &|b| b.charge_wh = new_charge)?;

        Ok(ChargeResult {
            change_wh,
            battery: self.battery(id)?,
        })
    }

    /// Removes up to `consume_wh` from the battery, without going below
    /// zero.
    pub fn discharge(&self, id: &str, consume_wh: f64) -> Result<ChargeResult, Error> {
        ensure_non_negative("consumeWh", consume_wh)?;

        let battery = self.battery(id)?;
        let new_charge = (battery.charge_wh - consume_wh).max(0.0);
        let change_wh = new_charge - battery.charge_wh;

        log_event(
            &*self.stores.event_log,
            format!("DISCHARGE battery {id}, {change_wh} Wh, new charge {new_charge} Wh"),
        );
        self.stores
            .batteries
            .update(id, &|b| b.charge_wh = new_charge)?;

        Ok(ChargeResult {
            change_wh,
            battery: self.battery(id)?,
        })
    }

    /// Remembers the last token issued to the battery as a sink.
    pub(crate) fn set_power_token(&self, id: &str, token: &str) -> Result<(), Error> {
        self.stores
            .batteries
            .update(id, &|b| b.power_token = Some(token.to_string()))
    }
}
