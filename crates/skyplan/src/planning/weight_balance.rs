//! Weight and balance calculator.
//!
//! Sums station weights and moments against an aircraft profile's arms and
//! reports the center of gravity against the certified envelope. Being over
//! maximum gross weight is reported independently of the CG verdict; an
//! aircraft can be inside the envelope and still overweight, or vice versa.

use serde::{Deserialize, Serialize};

use crate::aircraft::AircraftProfile;
use crate::config::Config;
use crate::error::{Error, Result};

/// Per-station loads for one flight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StationLoads {
    /// Front seat occupants, in pounds.
    pub front_seats_lb: f64,
    /// First rear seat occupant, in pounds.
    pub rear_seat_1_lb: f64,
    /// Second rear seat occupant, in pounds.
    pub rear_seat_2_lb: f64,
    /// Forward baggage, in pounds.
    pub baggage_1_lb: f64,
    /// Aft baggage, in pounds.
    pub baggage_2_lb: f64,
    /// Fuel on board, in gallons.
    pub fuel_gal: f64,
}

impl StationLoads {
    fn validate(&self) -> Result<()> {
        for (label, value) in [
            ("front seats", self.front_seats_lb),
            ("rear seat 1", self.rear_seat_1_lb),
            ("rear seat 2", self.rear_seat_2_lb),
            ("baggage 1", self.baggage_1_lb),
            ("baggage 2", self.baggage_2_lb),
            ("fuel", self.fuel_gal),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::invalid_input(format!(
                    "{label} load must be non-negative, got {value}"
                )));
            }
        }
        Ok(())
    }
}

/// The result of a weight-and-balance computation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightBalance {
    /// Total weight in pounds.
    pub total_weight_lb: f64,
    /// Total moment in pound-inches.
    pub total_moment: f64,
    /// Center of gravity in inches aft of datum.
    pub cg_in: f64,
    /// Whether the CG falls inside the certified envelope.
    pub cg_in_limits: bool,
    /// Whether total weight exceeds maximum gross weight.
    pub over_max_weight: bool,
    /// Fuel weight in pounds, derived from the profile's fuel type.
    pub fuel_weight_lb: f64,
}

/// Compute weight and balance for the given loads.
///
/// Fuel weight uses the density configured for the profile's fuel type, so
/// Jet-A aircraft are not computed at avgas weight.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] for an invalid profile or negative loads.
pub fn calculate_weight_balance(
    profile: &AircraftProfile,
    loads: &StationLoads,
    config: &Config,
) -> Result<WeightBalance> {
    profile.validate()?;
    loads.validate()?;

    let fuel_weight_lb = loads.fuel_gal * config.fuel_density_lb_per_gal(profile.fuel_type);

    let total_weight_lb = profile.empty_weight_lb
        + loads.front_seats_lb
        + loads.rear_seat_1_lb
        + loads.rear_seat_2_lb
        + loads.baggage_1_lb
        + loads.baggage_2_lb
        + fuel_weight_lb;

    let baggage2_arm = profile.arms.baggage2.unwrap_or(profile.arms.baggage1);
    let total_moment = profile.empty_weight_lb * profile.empty_cg_in
        + loads.front_seats_lb * profile.arms.front_seats
        + (loads.rear_seat_1_lb + loads.rear_seat_2_lb) * profile.arms.rear_seats
        + loads.baggage_1_lb * profile.arms.baggage1
        + loads.baggage_2_lb * baggage2_arm
        + fuel_weight_lb * profile.arms.fuel;

    let cg_in = total_moment / total_weight_lb;

    Ok(WeightBalance {
        total_weight_lb,
        total_moment,
        cg_in,
        cg_in_limits: profile.cg_limits.forward <= cg_in && cg_in <= profile.cg_limits.aft,
        over_max_weight: total_weight_lb > profile.max_weight_lb,
        fuel_weight_lb,
    })
}
