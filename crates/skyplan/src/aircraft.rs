//! Aircraft performance profiles.
//!
//! A profile carries the performance and loading data every calculator needs:
//! fuel capacity and burn, cruise speed, empty weight and CG, station arms,
//! and the certified CG envelope.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// The fuel an aircraft burns. Determines fuel weight per gallon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FuelType {
    /// 100LL avgas.
    Avgas100Ll,
    /// Jet-A kerosene.
    JetA,
}

impl std::fmt::Display for FuelType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Avgas100Ll => write!(f, "100LL"),
            Self::JetA => write!(f, "Jet A"),
        }
    }
}

/// Loading-station arms in inches aft of datum.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StationArms {
    /// Front seats arm.
    pub front_seats: f64,
    /// Rear seats arm.
    pub rear_seats: f64,
    /// Forward baggage compartment arm.
    pub baggage1: f64,
    /// Aft baggage compartment arm, if the type has one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub baggage2: Option<f64>,
    /// Fuel tank arm.
    pub fuel: f64,
}

/// Certified center-of-gravity envelope in inches aft of datum.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CgLimits {
    /// Forward limit.
    pub forward: f64,
    /// Aft limit.
    pub aft: f64,
}

/// An aircraft performance profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AircraftProfile {
    /// Model name, e.g. "Cessna 172S".
    pub name: String,
    /// Manufacturer name.
    pub manufacturer: String,
    /// Total fuel capacity in US gallons.
    pub fuel_capacity_gal: f64,
    /// Cruise fuel burn in gallons per hour.
    pub burn_rate_gph: f64,
    /// Cruise speed in knots.
    pub cruise_speed_kt: f64,
    /// Fuel type, used to derive fuel weight.
    pub fuel_type: FuelType,
    /// Empty weight in pounds.
    pub empty_weight_lb: f64,
    /// Empty-weight CG in inches aft of datum.
    pub empty_cg_in: f64,
    /// Maximum gross weight in pounds.
    pub max_weight_lb: f64,
    /// Loading-station arms.
    pub arms: StationArms,
    /// CG envelope.
    pub cg_limits: CgLimits,
}

impl AircraftProfile {
    /// Validate the profile's invariants.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if the CG envelope is inverted, any
    /// weight is negative, or a performance figure is not a positive finite
    /// number.
    pub fn validate(&self) -> Result<()> {
        if !(self.cg_limits.forward < self.cg_limits.aft) {
            return Err(Error::invalid_input(format!(
                "forward CG limit ({}) must be less than aft limit ({})",
                self.cg_limits.forward, self.cg_limits.aft
            )));
        }
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
            ("empty weight", self.empty_weight_lb),
            ("max weight", self.max_weight_lb),
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

/// The built-in profile registry.
///
/// Values are book numbers for common rental/trainer types; real flights
/// should use the weight-and-balance data for the specific tail number.
#[must_use]
pub fn builtin_profiles() -> Vec<AircraftProfile> {
    vec![
        AircraftProfile {
            name: "Cessna 172S".to_string(),
            manufacturer: "Cessna".to_string(),
            fuel_capacity_gal: 56.0,
            burn_rate_gph: 9.9,
            cruise_speed_kt: 122.0,
            fuel_type: FuelType::Avgas100Ll,
            empty_weight_lb: 1689.0,
            empty_cg_in: 39.1,
            max_weight_lb: 2550.0,
            arms: StationArms {
                front_seats: 37.0,
                rear_seats: 73.0,
                baggage1: 95.0,
                baggage2: Some(123.0),
                fuel: 48.0,
            },
            cg_limits: CgLimits {
                forward: 35.0,
                aft: 47.3,
            },
        },
        AircraftProfile {
            name: "Cessna 182T".to_string(),
            manufacturer: "Cessna".to_string(),
            fuel_capacity_gal: 92.0,
            burn_rate_gph: 12.5,
            cruise_speed_kt: 140.0,
            fuel_type: FuelType::Avgas100Ll,
            empty_weight_lb: 1710.0,
            empty_cg_in: 39.0,
            max_weight_lb: 3100.0,
            arms: StationArms {
                front_seats: 37.0,
                rear_seats: 73.0,
                baggage1: 95.0,
                baggage2: Some(123.0),
                fuel: 48.0,
            },
            cg_limits: CgLimits {
                forward: 35.0,
                aft: 47.3,
            },
        },
        AircraftProfile {
            name: "Piper Cherokee".to_string(),
            manufacturer: "Piper".to_string(),
            fuel_capacity_gal: 84.0,
            burn_rate_gph: 10.5,
            cruise_speed_kt: 132.0,
            fuel_type: FuelType::Avgas100Ll,
            empty_weight_lb: 1530.0,
            empty_cg_in: 35.5,
            max_weight_lb: 2800.0,
            arms: StationArms {
                front_seats: 32.5,
                rear_seats: 75.0,
                baggage1: 95.0,
                baggage2: Some(123.0),
                fuel: 47.0,
            },
            cg_limits: CgLimits {
                forward: 31.0,
                aft: 47.3,
            },
        },
        AircraftProfile {
            name: "Diamond DA40".to_string(),
            manufacturer: "Diamond".to_string(),
            fuel_capacity_gal: 58.0,
            burn_rate_gph: 8.8,
            cruise_speed_kt: 142.0,
            fuel_type: FuelType::Avgas100Ll,
            empty_weight_lb: 1660.0,
            empty_cg_in: 93.0,
            max_weight_lb: 2700.0,
            arms: StationArms {
                front_seats: 85.0,
                rear_seats: 85.0,
                baggage1: 90.0,
                baggage2: None,
                fuel: 90.0,
            },
            cg_limits: CgLimits {
                forward: 82.0,
                aft: 96.0,
            },
        },
        AircraftProfile {
            name: "Cirrus SR22".to_string(),
            manufacturer: "Cirrus".to_string(),
            fuel_capacity_gal: 92.0,
            burn_rate_gph: 12.5,
            cruise_speed_kt: 158.0,
            fuel_type: FuelType::Avgas100Ll,
            empty_weight_lb: 3410.0,
            empty_cg_in: 35.0,
            max_weight_lb: 3600.0,
            arms: StationArms {
                front_seats: 35.0,
                rear_seats: 66.0,
                baggage1: 86.0,
                baggage2: Some(86.0),
                fuel: 48.0,
            },
            cg_limits: CgLimits {
                forward: 33.0,
                aft: 47.3,
            },
        },
        AircraftProfile {
            name: "Beechcraft Bonanza A36".to_string(),
            manufacturer: "Beechcraft".to_string(),
            fuel_capacity_gal: 102.0,
            burn_rate_gph: 13.5,
            cruise_speed_kt: 158.0,
            fuel_type: FuelType::Avgas100Ll,
            empty_weight_lb: 2560.0,
            empty_cg_in: 82.0,
            max_weight_lb: 3600.0,
            arms: StationArms {
                front_seats: 82.5,
                rear_seats: 95.0,
                baggage1: 122.0,
                baggage2: None,
                fuel: 95.0,
            },
            cg_limits: CgLimits {
                forward: 77.0,
                aft: 93.0,
            },
        },
    ]
}

/// Find a built-in profile by name, case-insensitively.
///
/// Matches on an exact name first, then falls back to a substring match so
/// that `"172"` finds the Cessna 172S.
///
/// # Errors
///
/// Returns [`Error::ProfileNotFound`] if nothing matches.
pub fn find_profile(name: &str) -> Result<AircraftProfile> {
    let profiles = builtin_profiles();
    let lowered = name.to_lowercase();

    if let Some(exact) = profiles.iter().find(|p| p.name.to_lowercase() == lowered) {
        return Ok(exact.clone());
    }
    profiles
        .into_iter()
        .find(|p| p.name.to_lowercase().contains(&lowered))
        .ok_or_else(|| Error::ProfileNotFound {
            name: name.to_string(),
        })
}
