//! Airport records and the built-in demo registry.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Airport size class, used for flat landing fees and map display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AirportSize {
    /// Large air-carrier airport.
    Large,
    /// Medium regional airport.
    Medium,
    /// Small general-aviation field.
    Small,
}

impl std::fmt::Display for AirportSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Large => write!(f, "large"),
            Self::Medium => write!(f, "medium"),
            Self::Small => write!(f, "small"),
        }
    }
}

/// An airport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Airport {
    /// ICAO identifier, e.g. "KORD".
    pub icao: String,
    /// IATA code, if assigned.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iata: Option<String>,
    /// Airport name.
    pub name: String,
    /// City served.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
    /// Size class.
    pub size: AirportSize,
}

fn icao_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Z0-9]{3,4}$").expect("static pattern compiles"))
}

/// Check whether a string is a plausible ICAO identifier.
#[must_use]
pub fn is_valid_icao(code: &str) -> bool {
    icao_pattern().is_match(code)
}

/// Normalize an identifier to uppercase, rejecting malformed input.
///
/// # Errors
///
/// Returns [`Error::InvalidIcao`] if the code is not 3-4 alphanumeric
/// characters.
pub fn normalize_icao(code: &str) -> Result<String> {
    let upper = code.trim().to_uppercase();
    if is_valid_icao(&upper) {
        Ok(upper)
    } else {
        Err(Error::InvalidIcao {
            code: code.to_string(),
        })
    }
}

/// The built-in demo airports, used when no airport database is loaded.
#[must_use]
pub fn builtin_airports() -> Vec<Airport> {
    fn airport(icao: &str, iata: &str, name: &str, city: &str, lat: f64, lon: f64) -> Airport {
        Airport {
            icao: icao.to_string(),
            iata: Some(iata.to_string()),
            name: name.to_string(),
            city: Some(city.to_string()),
            latitude: lat,
            longitude: lon,
            size: AirportSize::Large,
        }
    }

    vec![
        airport("KORD", "ORD", "Chicago O'Hare International", "Chicago", 41.9742, -87.9073),
        airport("KLAX", "LAX", "Los Angeles International", "Los Angeles", 33.9425, -118.4081),
        airport("KJFK", "JFK", "John F. Kennedy International", "New York", 40.6413, -73.7781),
        airport("KSFO", "SFO", "San Francisco International", "San Francisco", 37.6213, -122.379),
        airport("KDEN", "DEN", "Denver International", "Denver", 39.8561, -104.6737),
        airport("KDFW", "DFW", "Dallas/Fort Worth International", "Dallas", 32.8998, -97.0403),
        airport("KLAS", "LAS", "Harry Reid International", "Las Vegas", 36.084, -115.1537),
        airport("KMIA", "MIA", "Miami International", "Miami", 25.7959, -80.287),
    ]
}

/// Find a built-in airport by ICAO identifier.
#[must_use]
pub fn find_builtin(icao: &str) -> Option<Airport> {
    let upper = icao.to_uppercase();
    builtin_airports().into_iter().find(|a| a.icao == upper)
}
