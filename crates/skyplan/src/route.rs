//! Routes: ordered waypoint sequences.

use serde::{Deserialize, Serialize};

use crate::airports::{normalize_icao, Airport, AirportSize};
use crate::error::{Error, Result};

/// A point on a route.
///
/// Two waypoints in a route need not be geographically distinct, but a
/// duplicate ICAO identifier is rejected when added.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    /// ICAO identifier.
    pub icao: String,
    /// Display name.
    pub name: String,
    /// City served, if known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
    /// Airport size class, when known. Drives landing fees.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<AirportSize>,
}

impl From<Airport> for Waypoint {
    fn from(airport: Airport) -> Self {
        Self {
            icao: airport.icao,
            name: airport.name,
            city: airport.city,
            latitude: airport.latitude,
            longitude: airport.longitude,
            size: Some(airport.size),
        }
    }
}

/// An ordered, named list of waypoints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Route {
    /// Route name, used when saving.
    pub name: String,
    /// Waypoints in flight order.
    waypoints: Vec<Waypoint>,
}

impl Route {
    /// Create an empty route with the given name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            waypoints: Vec::new(),
        }
    }

    /// The waypoints in flight order.
    #[must_use]
    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    /// Number of waypoints.
    #[must_use]
    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    /// Whether the route has no waypoints.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// Append a waypoint.
    ///
    /// The identifier is normalized to uppercase before the duplicate check.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidIcao`] for a malformed identifier and
    /// [`Error::DuplicateWaypoint`] if the identifier is already present.
    pub fn push(&mut self, mut waypoint: Waypoint) -> Result<()> {
        waypoint.icao = normalize_icao(&waypoint.icao)?;
        if self.waypoints.iter().any(|w| w.icao == waypoint.icao) {
            return Err(Error::DuplicateWaypoint {
                icao: waypoint.icao,
            });
        }
        self.waypoints.push(waypoint);
        Ok(())
    }

    /// Remove the waypoint with the given identifier, returning it.
    pub fn remove(&mut self, icao: &str) -> Option<Waypoint> {
        let upper = icao.to_uppercase();
        let index = self.waypoints.iter().position(|w| w.icao == upper)?;
        Some(self.waypoints.remove(index))
    }

    /// Ensure the route is long enough to estimate.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RouteTooShort`] with the current count if fewer than
    /// two waypoints are present.
    pub fn require_estimable(&self) -> Result<()> {
        if self.waypoints.len() < 2 {
            return Err(Error::RouteTooShort {
                count: self.waypoints.len(),
            });
        }
        Ok(())
    }
}
