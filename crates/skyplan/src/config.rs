//! Configuration management for skyplan.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.
//!
//! Every constant the calculators depend on lives here as a named value:
//! fuel densities, the fallback fuel price, landing fees by airport size,
//! and the reserve policies, so they can be overridden per installation
//! without code changes.

use std::path::PathBuf;

use chrono::Duration;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::aircraft::FuelType;
use crate::airports::AirportSize;
use crate::error::{Error, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "skyplan";

/// Default database file name.
const DATABASE_FILE_NAME: &str = "skyplan.db";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `SKYPLAN_`)
/// 2. TOML config file at `~/.config/skyplan/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Fuel density and pricing configuration.
    pub fuel: FuelConfig,
    /// Airport fee configuration.
    pub fees: FeeConfig,
    /// Fuel-reserve policy configuration.
    pub reserve: ReserveConfig,
    /// Per-flight defaults.
    pub flight: FlightConfig,
}

/// Storage-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the database file.
    /// Defaults to `~/.local/share/skyplan/skyplan.db`
    pub database_path: Option<PathBuf>,
    /// Age in days after which cached airport data expires.
    pub cache_ttl_days: u32,
    /// Maximum number of airports kept in the in-memory price cache.
    pub cache_capacity: usize,
}

/// Fuel densities and pricing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FuelConfig {
    /// Weight of one gallon of 100LL avgas, in pounds.
    pub density_100ll_lb_per_gal: f64,
    /// Weight of one gallon of Jet-A, in pounds.
    pub density_jet_a_lb_per_gal: f64,
    /// Price per gallon assumed when an airport has no known fuel price.
    pub fallback_price_per_gal: f64,
}

/// Flat landing fees charged per airport, by airport size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeeConfig {
    /// Landing fee at large airports.
    pub landing_large: f64,
    /// Landing fee at medium airports.
    pub landing_medium: f64,
    /// Landing fee at small airports.
    pub landing_small: f64,
}

/// Fuel-reserve policies.
///
/// The range calculator and the trip estimator intentionally carry distinct
/// policies; both are surfaced with their own labels rather than silently
/// reconciled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReserveConfig {
    /// Fixed reserve held back by the range calculator, in hours
    /// (45-minute day VFR reserve plus a one-hour margin).
    pub fixed_hours: f64,
    /// Multiplier applied to trip fuel burn by the trip estimator.
    pub trip_multiplier: f64,
    /// Fraction of range-on-departure-fuel after which a fuel stop is
    /// suggested.
    pub fuel_stop_fraction: f64,
}

/// Per-flight defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlightConfig {
    /// Unusable fuel assumed when a profile does not specify it, in gallons.
    pub default_unusable_fuel_gal: f64,
    /// Default souls on board.
    pub default_souls_on_board: u32,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: None, // Will be resolved to default at runtime
            cache_ttl_days: 7,
            cache_capacity: 512,
        }
    }
}

impl Default for FuelConfig {
    fn default() -> Self {
        Self {
            density_100ll_lb_per_gal: 6.0,
            density_jet_a_lb_per_gal: 6.7,
            fallback_price_per_gal: 6.50,
        }
    }
}

impl Default for FeeConfig {
    fn default() -> Self {
        Self {
            landing_large: 50.0,
            landing_medium: 30.0,
            landing_small: 15.0,
        }
    }
}

impl Default for ReserveConfig {
    fn default() -> Self {
        Self {
            fixed_hours: 1.75,
            trip_multiplier: 1.25,
            fuel_stop_fraction: 0.60,
        }
    }
}

impl Default for FlightConfig {
    fn default() -> Self {
        Self {
            default_unusable_fuel_gal: 2.0,
            default_souls_on_board: 1,
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// Configuration is loaded in this order (later sources override earlier):
    /// 1. Default values
    /// 2. TOML config file (if exists)
    /// 3. Environment variables (prefixed with `SKYPLAN_`)
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file).nested())
            .merge(Env::prefixed("SKYPLAN_").split("_"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        for (label, value) in [
            ("fuel.density_100ll_lb_per_gal", self.fuel.density_100ll_lb_per_gal),
            ("fuel.density_jet_a_lb_per_gal", self.fuel.density_jet_a_lb_per_gal),
            ("fuel.fallback_price_per_gal", self.fuel.fallback_price_per_gal),
            ("reserve.fixed_hours", self.reserve.fixed_hours),
            ("reserve.trip_multiplier", self.reserve.trip_multiplier),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(Error::ConfigValidation {
                    message: format!("{label} must be a positive number, got {value}"),
                });
            }
        }

        for (label, value) in [
            ("fees.landing_large", self.fees.landing_large),
            ("fees.landing_medium", self.fees.landing_medium),
            ("fees.landing_small", self.fees.landing_small),
            (
                "flight.default_unusable_fuel_gal",
                self.flight.default_unusable_fuel_gal,
            ),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::ConfigValidation {
                    message: format!("{label} must be non-negative, got {value}"),
                });
            }
        }

        if !self.reserve.fuel_stop_fraction.is_finite()
            || self.reserve.fuel_stop_fraction <= 0.0
            || self.reserve.fuel_stop_fraction > 1.0
        {
            return Err(Error::ConfigValidation {
                message: format!(
                    "reserve.fuel_stop_fraction must be in (0, 1], got {}",
                    self.reserve.fuel_stop_fraction
                ),
            });
        }

        if self.storage.cache_ttl_days == 0 {
            return Err(Error::ConfigValidation {
                message: "storage.cache_ttl_days must be greater than 0".to_string(),
            });
        }

        Ok(())
    }

    /// Get the database path, resolving defaults if not set.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.storage
            .database_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(DATABASE_FILE_NAME))
    }

    /// Get the cache TTL as a chrono Duration.
    #[must_use]
    pub fn cache_ttl(&self) -> Duration {
        Duration::days(i64::from(self.storage.cache_ttl_days))
    }

    /// Weight of one gallon of the given fuel, in pounds.
    #[must_use]
    pub fn fuel_density_lb_per_gal(&self, fuel_type: FuelType) -> f64 {
        match fuel_type {
            FuelType::Avgas100Ll => self.fuel.density_100ll_lb_per_gal,
            FuelType::JetA => self.fuel.density_jet_a_lb_per_gal,
        }
    }

    /// Flat landing fee for an airport of the given size.
    #[must_use]
    pub fn landing_fee(&self, size: AirportSize) -> f64 {
        match size {
            AirportSize::Large => self.fees.landing_large,
            AirportSize::Medium => self.fees.landing_medium,
            AirportSize::Small => self.fees.landing_small,
        }
    }
}
