//! E6B wind triangle solver.
//!
//! Given heading, true airspeed, and the wind, computes ground speed, track,
//! and the drift between them. Angles are compass degrees; wind direction is
//! the direction the wind blows *from*, as reported in a METAR.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// The solved wind triangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindSolution {
    /// Ground speed in knots, rounded to the nearest knot.
    pub ground_speed_kt: f64,
    /// Resulting track in degrees, rounded, normalized to `[0, 360)`.
    pub track_deg: f64,
    /// Signed drift from heading to track, in degrees, rounded.
    pub wind_correction_deg: f64,
}

/// Solve the wind triangle.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] for a non-positive airspeed, a negative
/// wind speed, or any non-finite input.
pub fn solve_wind_triangle(
    heading_deg: f64,
    tas_kt: f64,
    wind_dir_deg: f64,
    wind_speed_kt: f64,
) -> Result<WindSolution> {
    if !tas_kt.is_finite() || tas_kt <= 0.0 {
        return Err(Error::invalid_input(format!(
            "true airspeed must be positive, got {tas_kt}"
        )));
    }
    if !wind_speed_kt.is_finite() || wind_speed_kt < 0.0 {
        return Err(Error::invalid_input(format!(
            "wind speed must be non-negative, got {wind_speed_kt}"
        )));
    }
    if !heading_deg.is_finite() || !wind_dir_deg.is_finite() {
        return Err(Error::invalid_input("heading and wind direction must be finite"));
    }

    let heading = heading_deg.to_radians();
    // The wind blows toward the reciprocal of its reported direction.
    let wind_to = wind_dir_deg.to_radians() + std::f64::consts::PI;

    let wx = wind_speed_kt * wind_to.cos();
    let wy = wind_speed_kt * wind_to.sin();

    let gx = tas_kt * heading.cos() + wx;
    let gy = tas_kt * heading.sin() + wy;

    let ground_speed_kt = gx.hypot(gy).round();
    let track_deg = (gy.atan2(gx).to_degrees() + 360.0) % 360.0;

    let mut wind_correction_deg = track_deg - heading_deg % 360.0;
    // Keep the drift in (-180, 180] so a small left drift never shows as a
    // 350-degree right turn.
    while wind_correction_deg > 180.0 {
        wind_correction_deg -= 360.0;
    }
    while wind_correction_deg <= -180.0 {
        wind_correction_deg += 360.0;
    }

    Ok(WindSolution {
        ground_speed_kt,
        track_deg: track_deg.round() % 360.0,
        wind_correction_deg: wind_correction_deg.round(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_direct_headwind() {
        let solution = solve_wind_triangle(360.0, 100.0, 360.0, 20.0).unwrap();
        assert_relative_eq!(solution.ground_speed_kt, 80.0);
        assert_relative_eq!(solution.track_deg, 0.0);
        assert_relative_eq!(solution.wind_correction_deg, 0.0);
    }

    #[test]
    fn test_direct_tailwind() {
        let solution = solve_wind_triangle(360.0, 100.0, 180.0, 20.0).unwrap();
        assert_relative_eq!(solution.ground_speed_kt, 120.0);
        assert_relative_eq!(solution.track_deg, 0.0);
    }

    #[test]
    fn test_left_crosswind_drifts_right() {
        // Wind from the west while heading north pushes the track east.
        let solution = solve_wind_triangle(360.0, 120.0, 270.0, 15.0).unwrap();
        assert_relative_eq!(solution.ground_speed_kt, 121.0);
        assert_relative_eq!(solution.track_deg, 7.0);
        assert_relative_eq!(solution.wind_correction_deg, 7.0);
    }

    #[test]
    fn test_right_crosswind_drifts_left() {
        let solution = solve_wind_triangle(360.0, 120.0, 90.0, 15.0).unwrap();
        assert_relative_eq!(solution.track_deg, 353.0);
        assert_relative_eq!(solution.wind_correction_deg, -7.0);
    }

    #[test]
    fn test_calm_wind() {
        let solution = solve_wind_triangle(45.0, 110.0, 0.0, 0.0).unwrap();
        assert_relative_eq!(solution.ground_speed_kt, 110.0);
        assert_relative_eq!(solution.track_deg, 45.0);
        assert_relative_eq!(solution.wind_correction_deg, 0.0);
    }

    #[test]
    fn test_rejects_zero_airspeed() {
        assert!(solve_wind_triangle(360.0, 0.0, 270.0, 15.0).is_err());
    }

    #[test]
    fn test_rejects_negative_wind_speed() {
        assert!(solve_wind_triangle(360.0, 100.0, 270.0, -5.0).is_err());
    }
}
