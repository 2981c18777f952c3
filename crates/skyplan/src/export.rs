//! Flight plan export formats.
//!
//! - GPX 1.1 routes, readable by ForeFlight, Garmin Pilot, SkyDemon and most
//!   other EFBs;
//! - FPL, the one-identifier-per-line text format older Garmin panels take;
//! - JSON, the full route via serde.

use chrono::Utc;

use crate::error::Result;
use crate::route::Route;

/// Extra metadata attached to a GPX export.
#[derive(Debug, Clone, Default)]
pub struct GpxOptions {
    /// Aircraft type annotation.
    pub aircraft_type: Option<String>,
    /// Cruising altitude annotation, in feet.
    pub cruising_altitude_ft: Option<u32>,
}

/// Render a route as a GPX 1.1 route document.
#[must_use]
pub fn generate_gpx(route: &Route, options: &GpxOptions) -> String {
    let name = if route.name.is_empty() {
        "Flight Plan"
    } else {
        &route.name
    };

    let mut gpx = format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<gpx version="1.1"
     creator="skyplan"
     xmlns="http://www.topografix.com/GPX/1/1"
     xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"
     xsi:schemaLocation="http://www.topografix.com/GPX/1/1 http://www.topografix.com/GPX/1/1/gpx.xsd">
  <metadata>
    <name>{}</name>
    <time>{}</time>
  </metadata>
  <rte>
    <name>{}</name>"#,
        escape_xml(name),
        Utc::now().to_rfc3339(),
        escape_xml(name),
    );

    let last = route.len().saturating_sub(1);
    for (index, waypoint) in route.waypoints().iter().enumerate() {
        let point_type = if index == 0 {
            "DEPARTURE"
        } else if index == last {
            "ARRIVAL"
        } else {
            "WAYPOINT"
        };

        gpx.push_str(&format!(
            r#"
    <rtept lat="{:.6}" lon="{:.6}">
      <name>{}</name>
      <type>{}</type>
      <extensions>
        <waypointName>{}</waypointName>"#,
            waypoint.latitude,
            waypoint.longitude,
            escape_xml(&waypoint.icao),
            point_type,
            escape_xml(&waypoint.name),
        ));
        if let Some(aircraft_type) = &options.aircraft_type {
            gpx.push_str(&format!(
                "\n        <aircraftType>{}</aircraftType>",
                escape_xml(aircraft_type)
            ));
        }
        if let Some(altitude) = options.cruising_altitude_ft {
            gpx.push_str(&format!(
                "\n        <cruisingAltitude>{altitude}</cruisingAltitude>"
            ));
        }
        gpx.push_str("\n      </extensions>\n    </rtept>");
    }

    gpx.push_str("\n  </rte>\n</gpx>\n");
    gpx
}

/// Render a route in FPL format: one ICAO identifier per line.
#[must_use]
pub fn generate_fpl(route: &Route) -> String {
    route
        .waypoints()
        .iter()
        .map(|w| w.icao.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render the full route as pretty-printed JSON.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn generate_json(route: &Route) -> Result<String> {
    Ok(serde_json::to_string_pretty(route)?)
}

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::route::Waypoint;

    fn wp(icao: &str, name: &str, lat: f64, lon: f64) -> Waypoint {
        Waypoint {
            icao: icao.to_string(),
            name: name.to_string(),
            city: None,
            latitude: lat,
            longitude: lon,
            size: None,
        }
    }

    fn sample_route() -> Route {
        let mut route = Route::new("Chicago Hop");
        route.push(wp("KORD", "Chicago O'Hare International", 41.9742, -87.9073)).unwrap();
        route.push(wp("KMKE", "Milwaukee Mitchell", 42.9472, -87.8966)).unwrap();
        route.push(wp("KMSN", "Dane County Regional", 43.1399, -89.3375)).unwrap();
        route
    }

    #[test]
    fn test_gpx_marks_departure_and_arrival() {
        let gpx = generate_gpx(&sample_route(), &GpxOptions::default());

        assert!(gpx.contains("<type>DEPARTURE</type>"));
        assert!(gpx.contains("<type>WAYPOINT</type>"));
        assert!(gpx.contains("<type>ARRIVAL</type>"));
        assert!(gpx.contains(r#"<rtept lat="41.974200" lon="-87.907300">"#));
    }

    #[test]
    fn test_gpx_escapes_names() {
        let mut route = Route::new("Fish & Chips <Run>");
        route.push(wp("KORD", "O'Hare", 41.9742, -87.9073)).unwrap();
        route.push(wp("KMKE", "Mitchell", 42.9472, -87.8966)).unwrap();

        let gpx = generate_gpx(&route, &GpxOptions::default());
        assert!(gpx.contains("Fish &amp; Chips &lt;Run&gt;"));
        assert!(gpx.contains("O&apos;Hare"));
        assert!(!gpx.contains("<Run>"));
    }

    #[test]
    fn test_gpx_optional_annotations() {
        let options = GpxOptions {
            aircraft_type: Some("Cessna 172S".to_string()),
            cruising_altitude_ft: Some(5500),
        };
        let gpx = generate_gpx(&sample_route(), &options);
        assert!(gpx.contains("<aircraftType>Cessna 172S</aircraftType>"));
        assert!(gpx.contains("<cruisingAltitude>5500</cruisingAltitude>"));

        let bare = generate_gpx(&sample_route(), &GpxOptions::default());
        assert!(!bare.contains("aircraftType"));
    }

    #[test]
    fn test_fpl_one_identifier_per_line() {
        let fpl = generate_fpl(&sample_route());
        assert_eq!(fpl, "KORD\nKMKE\nKMSN");
    }

    #[test]
    fn test_json_round_trips() {
        let route = sample_route();
        let json = generate_json(&route).unwrap();
        let back: Route = serde_json::from_str(&json).unwrap();
        assert_eq!(route, back);
    }
}
