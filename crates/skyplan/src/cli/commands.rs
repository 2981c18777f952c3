//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

use crate::sync::Resolution;

/// Range calculator arguments.
#[derive(Debug, Args)]
pub struct RangeCommand {
    /// Aircraft profile name (e.g. "Cessna 172S"); free-form numbers may
    /// override individual figures
    #[arg(short, long, default_value = "Cessna 172S")]
    pub aircraft: String,

    /// Override fuel capacity in gallons
    #[arg(long)]
    pub fuel_capacity: Option<f64>,

    /// Override burn rate in gallons per hour
    #[arg(long)]
    pub burn_rate: Option<f64>,

    /// Override cruise speed in knots
    #[arg(long)]
    pub cruise_speed: Option<f64>,

    /// Fuel on board as a percentage of capacity
    #[arg(short = 'p', long, default_value = "100")]
    pub fuel_percent: f64,

    /// Unusable fuel in gallons (defaults from configuration)
    #[arg(long)]
    pub unusable: Option<f64>,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Trip estimator arguments.
#[derive(Debug, Args)]
pub struct TripCommand {
    /// Waypoints as ICAO identifiers, in flight order
    #[arg(required_unless_present = "load", num_args = 2..)]
    pub waypoints: Vec<String>,

    /// Load a saved route by name instead of listing waypoints
    #[arg(short, long, conflicts_with = "waypoints")]
    pub load: Option<String>,

    /// Aircraft profile name
    #[arg(short, long, default_value = "Cessna 172S")]
    pub aircraft: String,

    /// Fuel on board at departure, as a percentage of capacity
    #[arg(short = 'p', long, default_value = "100")]
    pub fuel_percent: f64,

    /// Souls on board, for cost sharing
    #[arg(short, long, default_value = "1")]
    pub souls: u32,

    /// Skip flat landing fees
    #[arg(long)]
    pub no_landing_fees: bool,

    /// Include per-airport FBO fees where known
    #[arg(long)]
    pub fbo_fees: bool,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Weight and balance arguments.
#[derive(Debug, Args)]
pub struct WbCommand {
    /// Aircraft profile name
    #[arg(short, long, default_value = "Cessna 172S")]
    pub aircraft: String,

    /// Front seats load in pounds
    #[arg(long, default_value = "170")]
    pub front: f64,

    /// First rear seat load in pounds
    #[arg(long, default_value = "0")]
    pub rear1: f64,

    /// Second rear seat load in pounds
    #[arg(long, default_value = "0")]
    pub rear2: f64,

    /// Forward baggage in pounds
    #[arg(long, default_value = "0")]
    pub baggage1: f64,

    /// Aft baggage in pounds
    #[arg(long, default_value = "0")]
    pub baggage2: f64,

    /// Fuel on board in gallons
    #[arg(short, long, default_value = "40")]
    pub fuel: f64,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Wind triangle arguments.
#[derive(Debug, Args)]
pub struct WindCommand {
    /// Heading in degrees
    #[arg(long, default_value = "360")]
    pub heading: f64,

    /// True airspeed in knots
    #[arg(long, default_value = "120")]
    pub tas: f64,

    /// Wind direction in degrees (direction the wind blows from)
    #[arg(long, default_value = "270")]
    pub wind_dir: f64,

    /// Wind speed in knots
    #[arg(long, default_value = "15")]
    pub wind_speed: f64,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Currency report arguments.
#[derive(Debug, Args)]
pub struct CurrencyCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Logbook commands.
#[derive(Debug, Subcommand)]
pub enum LogbookCommand {
    /// Add a logbook entry
    Add {
        /// Flight date (YYYY-MM-DD)
        #[arg(short, long)]
        date: String,

        /// Total time in hours
        #[arg(short, long)]
        total: f64,

        /// Solo time in hours
        #[arg(long, default_value = "0")]
        solo: f64,

        /// Night time in hours
        #[arg(long, default_value = "0")]
        night: f64,

        /// Instrument time in hours
        #[arg(long, default_value = "0")]
        instrument: f64,

        /// Cross-country time in hours
        #[arg(long, default_value = "0")]
        cross_country: f64,

        /// Day landings
        #[arg(long, default_value = "0")]
        day_landings: u32,

        /// Night landings
        #[arg(long, default_value = "0")]
        night_landings: u32,

        /// Dual instruction received, in hours
        #[arg(long, default_value = "0")]
        dual: f64,
    },

    /// List logbook entries, most recent first
    List {
        /// Maximum number of entries to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Show logbook totals
    Totals {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },
}

/// Route management commands.
#[derive(Debug, Subcommand)]
pub enum RouteCommand {
    /// Save a route under a name
    Save {
        /// Route name
        name: String,

        /// Waypoints as ICAO identifiers, in flight order
        #[arg(required = true, num_args = 2..)]
        waypoints: Vec<String>,
    },

    /// List saved routes
    List,

    /// Show a saved route
    Show {
        /// Route name
        name: String,

        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Delete a saved route
    Delete {
        /// Route name
        name: String,
    },

    /// Export a saved route
    Export {
        /// Route name
        name: String,

        /// Export format
        #[arg(short, long, value_enum, default_value = "gpx")]
        format: ExportFormat,

        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Sync commands.
#[derive(Debug, Subcommand)]
pub enum SyncCommand {
    /// Show pending changes and unresolved conflicts
    Status {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Resolve pending conflicts with one strategy
    Resolve {
        /// How to resolve
        #[arg(short, long, value_enum)]
        strategy: ResolutionArg,

        /// Resolve every pending conflict instead of only the first
        #[arg(long)]
        all: bool,
    },
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Export format argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ExportFormat {
    /// GPX 1.1 route
    #[default]
    Gpx,
    /// One ICAO identifier per line
    Fpl,
    /// Full route as JSON
    Json,
}

/// Conflict resolution argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ResolutionArg {
    /// Discard the local change, keep the server record
    Server,
    /// Re-queue the local change
    Mine,
    /// Keep both: re-queue the local change as a new record
    Both,
}

impl From<ResolutionArg> for Resolution {
    fn from(arg: ResolutionArg) -> Self {
        match arg {
            ResolutionArg::Server => Self::KeepServer,
            ResolutionArg::Mine => Self::KeepMine,
            ResolutionArg::Both => Self::KeepBoth,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolution_arg_conversion() {
        assert_eq!(Resolution::from(ResolutionArg::Server), Resolution::KeepServer);
        assert_eq!(Resolution::from(ResolutionArg::Mine), Resolution::KeepMine);
        assert_eq!(Resolution::from(ResolutionArg::Both), Resolution::KeepBoth);
    }

    #[test]
    fn test_export_format_default() {
        assert_eq!(ExportFormat::default(), ExportFormat::Gpx);
    }

    #[test]
    fn test_range_command_debug() {
        let cmd = RangeCommand {
            aircraft: "Cessna 172S".to_string(),
            fuel_capacity: None,
            burn_rate: None,
            cruise_speed: None,
            fuel_percent: 100.0,
            unusable: None,
            json: false,
        };
        let debug_str = format!("{cmd:?}");
        assert!(debug_str.contains("aircraft"));
    }

    #[test]
    fn test_sync_command_debug() {
        let cmd = SyncCommand::Resolve {
            strategy: ResolutionArg::Both,
            all: true,
        };
        let debug_str = format!("{cmd:?}");
        assert!(debug_str.contains("Resolve"));
        assert!(debug_str.contains("Both"));
    }
}
