//! Range and fuel calculator.
//!
//! Produces two range figures from one fuel state:
//!
//! - `max_range_nm` holds back the fixed reserve (45-minute day VFR reserve
//!   folded together with a one-hour margin, 1.75 hours by default) and is
//!   the figure to plan with;
//! - `with_reserve_nm` subtracts only unusable fuel and shows what the tanks
//!   could physically deliver. It is typically the larger number.
//!
//! Callers must label the two distinctly; they are not monotonically related
//! in the obvious way.

use serde::{Deserialize, Serialize};

use crate::aircraft::AircraftProfile;
use crate::config::ReserveConfig;
use crate::error::{Error, Result};

/// Inputs to the range calculation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RangeInputs {
    /// Total fuel capacity in gallons.
    pub fuel_capacity_gal: f64,
    /// Cruise burn rate in gallons per hour.
    pub burn_rate_gph: f64,
    /// Cruise speed in knots.
    pub cruise_speed_kt: f64,
    /// Fuel currently on board, as a percentage of capacity.
    pub current_fuel_percent: f64,
    /// Unusable fuel in gallons.
    pub unusable_fuel_gal: f64,
}

impl RangeInputs {
    /// Build inputs from an aircraft profile, full tanks assumed.
    #[must_use]
    pub fn from_profile(
        profile: &AircraftProfile,
        current_fuel_percent: f64,
        unusable_fuel_gal: f64,
    ) -> Self {
        Self {
            fuel_capacity_gal: profile.fuel_capacity_gal,
            burn_rate_gph: profile.burn_rate_gph,
            cruise_speed_kt: profile.cruise_speed_kt,
            current_fuel_percent,
            unusable_fuel_gal,
        }
    }

    fn validate(&self) -> Result<()> {
        for (label, value) in [
            ("fuel capacity", self.fuel_capacity_gal),
            ("burn rate", self.burn_rate_gph),
            ("cruise speed", self.cruise_speed_kt),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(Error::invalid_input(format!(
                    "{label} must be a positive number, got {value}"
                )));
            }
        }
        for (label, value) in [
            ("current fuel percent", self.current_fuel_percent),
            ("unusable fuel", self.unusable_fuel_gal),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::invalid_input(format!(
                    "{label} must be non-negative, got {value}"
                )));
            }
        }
        Ok(())
    }
}

/// The result of a range calculation.
///
/// Fuel figures keep full precision; ranges are rounded to whole nautical
/// miles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RangeEstimate {
    /// Range on usable fuel after the fixed reserve, in NM.
    pub max_range_nm: f64,
    /// Fuel available after unusable fuel and the fixed reserve, in gallons.
    pub usable_fuel_gal: f64,
    /// Fuel held back by the fixed reserve policy, in gallons.
    pub reserve_fuel_gal: f64,
    /// Range ignoring the reserve policy (unusable fuel only), in NM.
    pub with_reserve_nm: f64,
}

/// Compute range figures for the given fuel state.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] for non-finite inputs, a non-positive
/// burn rate, speed, or capacity, or negative fuel figures. Inputs are
/// rejected rather than clamped so a bad profile surfaces instead of
/// producing a plausible-looking zero.
pub fn calculate_range(inputs: &RangeInputs, reserve: &ReserveConfig) -> Result<RangeEstimate> {
    inputs.validate()?;

    let current_fuel =
        inputs.fuel_capacity_gal * inputs.current_fuel_percent / 100.0 - inputs.unusable_fuel_gal;

    let reserve_fuel = inputs.burn_rate_gph * reserve.fixed_hours;
    let usable_fuel = (current_fuel - reserve_fuel).max(0.0);

    let max_range_nm = (usable_fuel / inputs.burn_rate_gph * inputs.cruise_speed_kt).round();
    let with_reserve_nm = ((current_fuel - inputs.unusable_fuel_gal) / inputs.burn_rate_gph
        * inputs.cruise_speed_kt)
        .round();

    Ok(RangeEstimate {
        max_range_nm,
        usable_fuel_gal: usable_fuel,
        reserve_fuel_gal: reserve_fuel,
        with_reserve_nm,
    })
}
