// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Creation, retrieval and power setting of solar arrays.

use serde::Serialize;

use crate::{Error, SolarArray};

use super::{ensure_non_negative, log_event, Stores};

/// The result of setting the active power of a solar array or a load.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SetActivePowerResult<T> {
    /// The power that was set, after clamping to the maximum.
    pub active_w: f64,
    pub entity: T,
}

/// Solar array controller.
#[derive(Clone)]
pub struct SolarArrayController {
    stores: Stores,
}

impl SolarArrayController {
    pub(crate) fn new(stores: Stores) -> Self {
        Self { stores }
    }

    /// Creates a new solar array that can produce up to `max_w`.
    pub fn new_solar_array(&self, max_w: f64) -> Result<SolarArray, Error> {
        ensure_non_negative("maxW", max_w)?;

        let solar_arrays = &self.stores.solar_arrays;
        let id = solar_arrays.create()?;
        solar_arrays.update(&id, &|s| {
            s.id = id.clone();
            s.max_w = max_w;
        })?;
        log_event(
            &*self.stores.event_log,
            format!("CREATED new solar array with ID {id} and max power {max_w} W"),
        );
        self.solar_array(&id)
    }

    /// Returns the solar array with the given `id`.
    pub fn solar_array(&self, id: &str) -> Result<SolarArray, Error> {
        self.stores.solar_arrays.read(id)?.ok_or_else(|| {
            Error::entity_not_found(format!("Solar array with id {id} not found."))
        })
    }

    /// Sets the power currently produced by the solar array, clamped to
    /// `max_w`.  Negative power is rejected.
    pub fn set_active_power(
        &self,
        id: &str,
        active_w: f64,
    ) -> Result<SetActivePowerResult<SolarArray>, Error> {
        ensure_non_negative("activeW", active_w)?;
        let solar_array = self.solar_array(id)?;
        let new_power = solar_array.max_w.min(active_w);

        log_event(
            &*self.stores.event_log,
            format!("SET solar array {id}, power {new_power} W"),
        );
        self.stores
            .solar_arrays
            .update(id, &|s| s.active_w = new_power)?;

        Ok(SetActivePowerResult {
            active_w: new_power,
            entity: self.solar_array(id)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::controller::test_utils::TestGrid;
    use crate::Error;

    #[test]
    fn test_set_active_power_is_clamped() -> Result<(), Error> {
        let tg = TestGrid::new();
        let solar_arrays = tg.grid.solar_arrays();
        let solar = solar_arrays.new_solar_array(6800.0)?;
        assert_eq!(solar.max_w, 6800.0);
        assert_eq!(solar.active_w, 0.0);

        let result = solar_arrays.set_active_power(&solar.id, 4000.0)?;
        assert_eq!(result.active_w, 4000.0);
        assert_eq!(result.entity.active_w, 4000.0);

        assert_eq!(solar_arrays.set_active_power(&solar.id, 9000.0)?.active_w, 6800.0);
        assert_eq!(solar_arrays.solar_array(&solar.id)?.active_w, 6800.0);

        let log = tg.log_descriptions();
        assert_eq!(log.len(), 3);
        assert_eq!(log[1], format!("SET solar array {}, power 4000 W", solar.id));

        Ok(())
    }

    #[test]
    fn test_negative_power_is_rejected() -> Result<(), Error> {
        let tg = TestGrid::new();
        let solar_arrays = tg.grid.solar_arrays();
        let solar = solar_arrays.new_solar_array(6800.0)?;
        solar_arrays.set_active_power(&solar.id, 3000.0)?;

        assert_eq!(
            solar_arrays.set_active_power(&solar.id, -10.0),
            Err(Error::invalid_parameter("'activeW' must not be negative"))
        );
        assert_eq!(solar_arrays.solar_array(&solar.id)?.active_w, 3000.0);
        assert_eq!(tg.log_descriptions().len(), 2);

        Ok(())
    }

    #[test]
    fn test_invalid_parameters() {
        let tg = TestGrid::new();
        let solar_arrays = tg.grid.solar_arrays();

        assert_eq!(
            solar_arrays.new_solar_array(-1.0),
            Err(Error::invalid_parameter("'maxW' must not be negative"))
        );
        assert!(solar_arrays
            .set_active_power("nope", 1.0)
            .is_err_and(|e| e == Error::entity_not_found("Solar array with id nope not found.")));
        assert!(tg.log_descriptions().is_empty());
    }
}
