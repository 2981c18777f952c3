//! Trip cost estimator.
//!
//! Walks an ordered route leg by leg: great-circle distance, time at cruise
//! speed, fuel burn with the trip reserve multiplier, and cost at the
//! destination airport's posted fuel price (or the configured fallback when
//! unknown). Totals add optional flat landing fees by airport size and
//! per-airport FBO fees.
//!
//! The trip reserve (a flat multiplier on burn) is a deliberately separate
//! policy from the range calculator's fixed-hours reserve; both are named
//! config values and both appear, labeled, in output.

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::aircraft::AircraftProfile;
use crate::airports::{Airport, AirportSize};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::geo;
use crate::prices::{FboFeeSource, FuelPriceSource};
use crate::route::Route;

/// Assumed FBO spend subtracted from a one-way destination-finder budget.
const FINDER_FBO_BUFFER_ONE_WAY: f64 = 30.0;
/// Assumed FBO spend subtracted from a round-trip destination-finder budget.
const FINDER_FBO_BUFFER_ROUND_TRIP: f64 = 60.0;
/// Fraction of the tank the destination finder is willing to plan against.
const FINDER_TANK_FRACTION: f64 = 0.8;
/// Reserve held back by the destination finder, in hours.
const FINDER_RESERVE_HOURS: f64 = 1.0;
/// Maximum destinations returned by the finder.
const FINDER_MAX_RESULTS: usize = 20;

/// Per-trip options.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TripOptions {
    /// Fuel on board at departure, as a percentage of capacity.
    pub departure_fuel_percent: f64,
    /// Souls on board, for cost sharing.
    pub souls_on_board: u32,
    /// Charge a flat landing fee per intermediate/destination airport.
    pub include_landing_fees: bool,
    /// Charge each airport's FBO fee where one is known.
    pub include_fbo_fees: bool,
}

impl Default for TripOptions {
    fn default() -> Self {
        Self {
            departure_fuel_percent: 100.0,
            souls_on_board: 1,
            include_landing_fees: true,
            include_fbo_fees: false,
        }
    }
}

/// One leg of an estimated trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripLeg {
    /// Departure identifier.
    pub from_icao: String,
    /// Destination identifier.
    pub to_icao: String,
    /// Great-circle distance in NM.
    pub distance_nm: f64,
    /// Initial true bearing in degrees.
    pub bearing_deg: f64,
    /// Time at cruise speed, in hours.
    pub time_hr: f64,
    /// Fuel burned including the trip reserve multiplier, in gallons.
    pub fuel_gal: f64,
    /// Price per gallon used to cost this leg.
    pub fuel_price_per_gal: f64,
    /// Fuel cost for this leg.
    pub fuel_cost: f64,
    /// Whether the destination is flagged as a forced fuel stop.
    pub fuel_stop: bool,
}

/// An estimated trip.
///
/// Costs are carried at full precision; rounding is the display layer's job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripEstimate {
    /// Per-leg breakdown in flight order.
    pub legs: Vec<TripLeg>,
    /// Total distance in NM.
    pub total_distance_nm: f64,
    /// Total flight time in hours.
    pub total_time_hr: f64,
    /// Total fuel including the trip reserve, in gallons.
    pub total_fuel_gal: f64,
    /// Total fuel cost.
    pub fuel_cost: f64,
    /// Total landing fees (zero when disabled).
    pub landing_fees: f64,
    /// Total FBO fees (zero when disabled or unknown).
    pub fbo_fees: f64,
    /// Total trip cost: fuel plus enabled fees.
    pub total_cost: f64,
    /// Cost per person: total divided by souls when more than one.
    pub cost_per_person: f64,
    /// Identifiers of waypoints flagged as forced fuel stops.
    pub fuel_stops: Vec<String>,
}

/// A destination suggested by the budget finder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DestinationOption {
    /// The candidate airport.
    pub airport: Airport,
    /// One-way distance in NM.
    pub distance_nm: f64,
    /// Distance flown in total (doubled for round trips), in NM.
    pub total_distance_nm: f64,
    /// Estimated cost including the assumed FBO spend.
    pub estimated_cost: f64,
    /// Total flight time in hours.
    pub time_hr: f64,
    /// Price per gallon used in the estimate.
    pub fuel_price_per_gal: f64,
}

/// Parameters for the budget-based destination finder.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FinderRequest {
    /// Total budget for fuel and fees.
    pub budget: f64,
    /// Maximum one-way flight time, in hours.
    pub max_hours: f64,
    /// Whether the flight returns to the departure airport.
    pub round_trip: bool,
}

/// Trip estimator bound to a configuration.
#[derive(Debug, Clone)]
pub struct TripEstimator<'a> {
    config: &'a Config,
}

impl<'a> TripEstimator<'a> {
    /// Create an estimator using the given configuration.
    #[must_use]
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// Estimate a route flown by the given aircraft.
    ///
    /// `sources` provides both the fuel prices and the FBO fees; a
    /// [`crate::prices::PriceBook`] serves both roles.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RouteTooShort`] for routes under two waypoints,
    /// [`Error::InvalidInput`] for an invalid profile or departure fuel
    /// percentage.
    pub fn estimate<S: FuelPriceSource + FboFeeSource>(
        &self,
        route: &Route,
        profile: &AircraftProfile,
        options: &TripOptions,
        sources: &mut S,
    ) -> Result<TripEstimate> {
        route.require_estimable()?;
        profile.validate()?;
        if !options.departure_fuel_percent.is_finite() || options.departure_fuel_percent <= 0.0 {
            return Err(Error::invalid_input(format!(
                "departure fuel percent must be positive, got {}",
                options.departure_fuel_percent
            )));
        }

        let fallback = self.config.fuel.fallback_price_per_gal;
        let multiplier = self.config.reserve.trip_multiplier;

        // A fuel stop is suggested once the distance run since the last stop
        // crosses this fraction of the range available on departure fuel.
        let departure_fuel_gal =
            profile.fuel_capacity_gal * options.departure_fuel_percent / 100.0;
        let range_on_departure_fuel =
            departure_fuel_gal / profile.burn_rate_gph * profile.cruise_speed_kt;
        let stop_threshold_nm = self.config.reserve.fuel_stop_fraction * range_on_departure_fuel;

        let mut legs = Vec::with_capacity(route.len() - 1);
        let mut fuel_stops = Vec::new();
        let mut since_last_stop_nm = 0.0;

        for (from, to) in route.waypoints().iter().tuple_windows() {
            let distance_nm =
                geo::haversine_nm(from.latitude, from.longitude, to.latitude, to.longitude);
            let bearing_deg =
                geo::initial_bearing_deg(from.latitude, from.longitude, to.latitude, to.longitude);
            let time_hr = distance_nm / profile.cruise_speed_kt;
            let fuel_gal = time_hr * profile.burn_rate_gph * multiplier;

            let fuel_price_per_gal = sources
                .fuel_price(&to.icao)
                .and_then(|p| p.for_fuel(profile.fuel_type))
                .unwrap_or(fallback);
            let fuel_cost = fuel_gal * fuel_price_per_gal;

            since_last_stop_nm += distance_nm;
            let fuel_stop = since_last_stop_nm > stop_threshold_nm;
            if fuel_stop {
                fuel_stops.push(to.icao.clone());
                since_last_stop_nm = 0.0;
            }

            legs.push(TripLeg {
                from_icao: from.icao.clone(),
                to_icao: to.icao.clone(),
                distance_nm,
                bearing_deg,
                time_hr,
                fuel_gal,
                fuel_price_per_gal,
                fuel_cost,
                fuel_stop,
            });
        }

        let total_distance_nm: f64 = legs.iter().map(|l| l.distance_nm).sum();
        let total_time_hr: f64 = legs.iter().map(|l| l.time_hr).sum();
        let total_fuel_gal: f64 = legs.iter().map(|l| l.fuel_gal).sum();
        let fuel_cost: f64 = legs.iter().map(|l| l.fuel_cost).sum();

        // Fees are charged once per intermediate/destination airport, never
        // at the departure field.
        let mut landing_fees = 0.0;
        let mut fbo_fees = 0.0;
        for waypoint in &route.waypoints()[1..] {
            if options.include_landing_fees {
                let size = waypoint.size.unwrap_or(AirportSize::Small);
                landing_fees += self.config.landing_fee(size);
            }
            if options.include_fbo_fees {
                fbo_fees += sources.fbo_fee(&waypoint.icao).unwrap_or(0.0);
            }
        }

        let total_cost = fuel_cost + landing_fees + fbo_fees;
        let cost_per_person = if options.souls_on_board > 1 {
            total_cost / f64::from(options.souls_on_board)
        } else {
            total_cost
        };

        Ok(TripEstimate {
            legs,
            total_distance_nm,
            total_time_hr,
            total_fuel_gal,
            fuel_cost,
            landing_fees,
            fbo_fees,
            total_cost,
            cost_per_person,
            fuel_stops,
        })
    }

    /// Suggest destinations reachable within a budget.
    ///
    /// A greedy screen, not an optimization: candidates are costed with the
    /// trip reserve multiplier against the departure airport's price (with
    /// the fallback when unknown), filtered by a budget-derived range, time
    /// and cost, then sorted cheapest first.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] for an invalid profile or a
    /// non-positive budget.
    pub fn find_destinations<P: FuelPriceSource>(
        &self,
        departure: &Airport,
        candidates: &[Airport],
        profile: &AircraftProfile,
        request: &FinderRequest,
        prices: &mut P,
    ) -> Result<Vec<DestinationOption>> {
        profile.validate()?;
        if !request.budget.is_finite() || request.budget <= 0.0 {
            return Err(Error::invalid_input(format!(
                "budget must be positive, got {}",
                request.budget
            )));
        }

        let fallback = self.config.fuel.fallback_price_per_gal;
        let multiplier = self.config.reserve.trip_multiplier;

        let departure_price = prices
            .fuel_price(&departure.icao)
            .and_then(|p| p.for_fuel(profile.fuel_type))
            .unwrap_or(fallback);

        let fbo_buffer = if request.round_trip {
            FINDER_FBO_BUFFER_ROUND_TRIP
        } else {
            FINDER_FBO_BUFFER_ONE_WAY
        };
        let fuel_budget = (request.budget - fbo_buffer).max(0.0);
        let max_fuel = fuel_budget / departure_price;
        let usable_fuel = max_fuel.min(profile.fuel_capacity_gal * FINDER_TANK_FRACTION);
        let burnable_fuel =
            (usable_fuel - profile.burn_rate_gph * FINDER_RESERVE_HOURS).max(0.0);
        let max_range_nm = burnable_fuel / profile.burn_rate_gph * profile.cruise_speed_kt;

        let time_limit_hr = request.max_hours * if request.round_trip { 2.0 } else { 1.0 };

        let mut options: Vec<DestinationOption> = candidates
            .iter()
            .filter(|a| a.icao != departure.icao)
            .map(|airport| {
                let distance_nm = geo::haversine_nm(
                    departure.latitude,
                    departure.longitude,
                    airport.latitude,
                    airport.longitude,
                );
                let fuel_price_per_gal = prices
                    .fuel_price(&airport.icao)
                    .and_then(|p| p.for_fuel(profile.fuel_type))
                    .unwrap_or(departure_price);

                let total_distance_nm = if request.round_trip {
                    distance_nm * 2.0
                } else {
                    distance_nm
                };
                let time_hr = total_distance_nm / profile.cruise_speed_kt;
                let total_fuel_gal = time_hr * profile.burn_rate_gph * multiplier;
                let estimated_cost =
                    total_fuel_gal * fuel_price_per_gal + FINDER_FBO_BUFFER_ONE_WAY;

                DestinationOption {
                    airport: airport.clone(),
                    distance_nm,
                    total_distance_nm,
                    estimated_cost,
                    time_hr,
                    fuel_price_per_gal,
                }
            })
            .filter(|o| o.total_distance_nm <= max_range_nm * 1.1)
            .filter(|o| o.time_hr <= time_limit_hr)
            .filter(|o| o.estimated_cost <= request.budget * 1.2)
            .collect();

        options.sort_by(|a, b| {
            a.estimated_cost
                .partial_cmp(&b.estimated_cost)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        options.truncate(FINDER_MAX_RESULTS);
        Ok(options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    use crate::prices::StaticPrices;
    use crate::route::Waypoint;

    fn wp(icao: &str, lat: f64, lon: f64, size: Option<AirportSize>) -> Waypoint {
        Waypoint {
            icao: icao.to_string(),
            name: icao.to_string(),
            city: None,
            latitude: lat,
            longitude: lon,
            size,
        }
    }

    fn profile() -> AircraftProfile {
        let mut profile = crate::aircraft::find_profile("Cessna 172S").unwrap();
        // Round numbers for hand-checked expectations.
        profile.burn_rate_gph = 10.0;
        profile.cruise_speed_kt = 120.0;
        profile
    }

    // One degree of longitude along the equator.
    fn one_degree_nm() -> f64 {
        geo::EARTH_RADIUS_NM * std::f64::consts::PI / 180.0
    }

    fn equator_route(icaos: &[&str]) -> Route {
        let mut route = Route::new("test");
        for (i, icao) in icaos.iter().enumerate() {
            route.push(wp(icao, 0.0, i as f64, None)).unwrap();
        }
        route
    }

    #[test]
    fn test_fallback_price_used_when_unknown() {
        let config = Config::default();
        let estimator = TripEstimator::new(&config);
        let route = equator_route(&["AAAA", "BBBB"]);
        let options = TripOptions {
            include_landing_fees: false,
            ..TripOptions::default()
        };
        let mut sources = StaticPrices::empty();

        let estimate = estimator
            .estimate(&route, &profile(), &options, &mut sources)
            .unwrap();

        let dist = one_degree_nm();
        let fuel = dist / 120.0 * 10.0 * 1.25;
        assert_relative_eq!(estimate.total_distance_nm, dist, max_relative = 1e-12);
        assert_relative_eq!(estimate.total_fuel_gal, fuel, max_relative = 1e-12);
        // Exactly fuel times the fallback price, nothing rounded.
        assert_relative_eq!(estimate.total_cost, fuel * 6.50, max_relative = 1e-12);
        assert_relative_eq!(estimate.legs[0].fuel_price_per_gal, 6.50);
    }

    #[test]
    fn test_landing_fees_by_airport_size() {
        let config = Config::default();
        let estimator = TripEstimator::new(&config);

        let mut route = Route::new("test");
        route.push(wp("AAAA", 0.0, 0.0, Some(AirportSize::Small))).unwrap();
        route.push(wp("BBBB", 0.0, 1.0, Some(AirportSize::Medium))).unwrap();
        route.push(wp("CCCC", 0.0, 2.0, Some(AirportSize::Large))).unwrap();

        let options = TripOptions::default();
        let mut sources = StaticPrices::empty();

        let estimate = estimator
            .estimate(&route, &profile(), &options, &mut sources)
            .unwrap();

        // Departure is never charged: $30 medium + $50 large.
        assert_relative_eq!(estimate.landing_fees, 80.0);
        assert_relative_eq!(
            estimate.total_cost,
            estimate.fuel_cost + 80.0,
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_unknown_size_charged_as_small() {
        let config = Config::default();
        let estimator = TripEstimator::new(&config);
        let route = equator_route(&["AAAA", "BBBB"]);
        let mut sources = StaticPrices::empty();

        let estimate = estimator
            .estimate(&route, &profile(), &TripOptions::default(), &mut sources)
            .unwrap();

        assert_relative_eq!(estimate.landing_fees, 15.0);
    }

    #[test]
    fn test_fbo_fees_looked_up_per_airport() {
        let config = Config::default();
        let estimator = TripEstimator::new(&config);
        let route = equator_route(&["AAAA", "BBBB", "CCCC"]);
        let options = TripOptions {
            include_landing_fees: false,
            include_fbo_fees: true,
            ..TripOptions::default()
        };
        let mut sources = StaticPrices::empty().with_fee("BBBB", 45.0);

        let estimate = estimator
            .estimate(&route, &profile(), &options, &mut sources)
            .unwrap();

        // BBBB has a posted fee, CCCC is unknown and costs nothing.
        assert_relative_eq!(estimate.fbo_fees, 45.0);
    }

    #[test]
    fn test_destination_price_costs_each_leg() {
        let config = Config::default();
        let estimator = TripEstimator::new(&config);
        let route = equator_route(&["AAAA", "BBBB", "CCCC"]);
        let options = TripOptions {
            include_landing_fees: false,
            ..TripOptions::default()
        };
        let mut sources =
            StaticPrices::empty().with_100ll("BBBB", 5.00).with_100ll("CCCC", 8.00);

        let estimate = estimator
            .estimate(&route, &profile(), &options, &mut sources)
            .unwrap();

        assert_relative_eq!(estimate.legs[0].fuel_price_per_gal, 5.00);
        assert_relative_eq!(estimate.legs[1].fuel_price_per_gal, 8.00);
        let expected = estimate.legs[0].fuel_gal * 5.00 + estimate.legs[1].fuel_gal * 8.00;
        assert_relative_eq!(estimate.fuel_cost, expected, max_relative = 1e-12);
    }

    #[test]
    fn test_cost_per_person() {
        let config = Config::default();
        let estimator = TripEstimator::new(&config);
        let route = equator_route(&["AAAA", "BBBB"]);
        let mut sources = StaticPrices::empty();

        let solo = estimator
            .estimate(&route, &profile(), &TripOptions::default(), &mut sources)
            .unwrap();
        assert_relative_eq!(solo.cost_per_person, solo.total_cost);

        let shared = estimator
            .estimate(
                &route,
                &profile(),
                &TripOptions {
                    souls_on_board: 4,
                    ..TripOptions::default()
                },
                &mut sources,
            )
            .unwrap();
        assert_relative_eq!(
            shared.cost_per_person,
            shared.total_cost / 4.0,
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_fuel_stop_flagged_and_accumulator_reset() {
        let config = Config::default();
        let estimator = TripEstimator::new(&config);
        let mut profile = profile();
        // Full tanks: 56 gal / 10 gph * 120 kt = 672 NM range, 60% = 403 NM.
        profile.fuel_capacity_gal = 56.0;

        // Four equator hops of ~240 NM each.
        let mut route = Route::new("test");
        for (i, icao) in ["AAAA", "BBBB", "CCCC", "DDDD", "EEEE"].iter().enumerate() {
            route.push(wp(icao, 0.0, i as f64 * 4.0, None)).unwrap();
        }

        let options = TripOptions {
            include_landing_fees: false,
            ..TripOptions::default()
        };
        let mut sources = StaticPrices::empty();

        let estimate = estimator
            .estimate(&route, &profile, &options, &mut sources)
            .unwrap();

        // 240, 480 (stop, reset), 240, 480 (stop).
        assert_eq!(estimate.fuel_stops, vec!["CCCC".to_string(), "EEEE".to_string()]);
        assert!(!estimate.legs[0].fuel_stop);
        assert!(estimate.legs[1].fuel_stop);
        assert!(!estimate.legs[2].fuel_stop);
        assert!(estimate.legs[3].fuel_stop);
    }

    #[test]
    fn test_route_too_short() {
        let config = Config::default();
        let estimator = TripEstimator::new(&config);
        let route = equator_route(&["AAAA"]);
        let mut sources = StaticPrices::empty();

        let err = estimator
            .estimate(&route, &profile(), &TripOptions::default(), &mut sources)
            .unwrap_err();
        assert!(matches!(err, Error::RouteTooShort { count: 1 }));
    }

    #[test]
    fn test_rejects_zero_departure_fuel() {
        let config = Config::default();
        let estimator = TripEstimator::new(&config);
        let route = equator_route(&["AAAA", "BBBB"]);
        let mut sources = StaticPrices::empty();

        let err = estimator
            .estimate(
                &route,
                &profile(),
                &TripOptions {
                    departure_fuel_percent: 0.0,
                    ..TripOptions::default()
                },
                &mut sources,
            )
            .unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_find_destinations_sorted_and_filtered() {
        let config = Config::default();
        let estimator = TripEstimator::new(&config);
        let airports = crate::airports::builtin_airports();
        let departure = crate::airports::find_builtin("KORD").unwrap();
        let mut prices = StaticPrices::empty();

        // Long-range tanks so the built-in airports (600+ NM from KORD)
        // fall inside the budget-derived range.
        let mut profile = profile();
        profile.fuel_capacity_gal = 102.0;

        let results = estimator
            .find_destinations(
                &departure,
                &airports,
                &profile,
                &FinderRequest {
                    budget: 600.0,
                    max_hours: 10.0,
                    round_trip: false,
                },
                &mut prices,
            )
            .unwrap();

        // KJFK, KDEN and KDFW are inside ~940 NM; the west-coast fields
        // are not.
        assert!(!results.is_empty());
        assert!(results.iter().all(|r| r.airport.icao != "KORD"));
        assert!(results.iter().all(|r| r.total_distance_nm < 1000.0));
        for pair in results.windows(2) {
            assert!(pair[0].estimated_cost <= pair[1].estimated_cost);
        }
    }

    #[test]
    fn test_find_destinations_rejects_zero_budget() {
        let config = Config::default();
        let estimator = TripEstimator::new(&config);
        let airports = crate::airports::builtin_airports();
        let departure = crate::airports::find_builtin("KORD").unwrap();
        let mut prices = StaticPrices::empty();

        let err = estimator
            .find_destinations(
                &departure,
                &airports,
                &profile(),
                &FinderRequest {
                    budget: 0.0,
                    max_hours: 2.0,
                    round_trip: false,
                },
                &mut prices,
            )
            .unwrap_err();
        assert!(err.is_invalid_input());
    }
}
