//! Command-line interface for skyplan.
//!
//! This module provides the CLI structure and command handlers for the
//! `skyplan` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    ConfigCommand, CurrencyCommand, ExportFormat, LogbookCommand, RangeCommand, ResolutionArg,
    RouteCommand, SyncCommand, TripCommand, WbCommand, WindCommand,
};

/// skyplan - Flight planning from your terminal
///
/// Plan routes with fuel costs, run weight and balance, track regulatory
/// currency from your logbook, and reconcile offline changes.
#[derive(Debug, Parser)]
#[command(name = "skyplan")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Compute range from a fuel state
    Range(RangeCommand),

    /// Estimate a trip: legs, fuel, cost, fuel stops
    Trip(TripCommand),

    /// Weight and balance
    Wb(WbCommand),

    /// Solve the wind triangle
    Wind(WindCommand),

    /// Report currency status from the logbook
    Currency(CurrencyCommand),

    /// Manage the logbook
    #[command(subcommand)]
    Logbook(LogbookCommand),

    /// Manage saved routes
    #[command(subcommand)]
    Route(RouteCommand),

    /// Inspect and resolve offline sync state
    #[command(subcommand)]
    Sync(SyncCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        if self.quiet {
            crate::logging::Verbosity::Quiet
        } else {
            match self.verbose {
                0 => crate::logging::Verbosity::Normal,
                1 => crate::logging::Verbosity::Verbose,
                _ => crate::logging::Verbosity::Trace,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_verify() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_name() {
        let cli = Cli::command();
        assert_eq!(cli.get_name(), "skyplan");
    }

    #[test]
    fn test_parse_range_defaults() {
        let cli = Cli::try_parse_from(["skyplan", "range"]).unwrap();
        match cli.command {
            Command::Range(cmd) => {
                assert_eq!(cmd.aircraft, "Cessna 172S");
                assert_eq!(cmd.fuel_percent, 100.0);
                assert!(cmd.fuel_capacity.is_none());
            }
            other => panic!("expected range, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_trip_with_waypoints() {
        let cli = Cli::try_parse_from(["skyplan", "trip", "KORD", "KMKE", "KMSN"]).unwrap();
        match cli.command {
            Command::Trip(cmd) => {
                assert_eq!(cmd.waypoints, vec!["KORD", "KMKE", "KMSN"]);
                assert!(!cmd.fbo_fees);
            }
            other => panic!("expected trip, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_trip_requires_waypoints_or_load() {
        assert!(Cli::try_parse_from(["skyplan", "trip"]).is_err());
        assert!(Cli::try_parse_from(["skyplan", "trip", "--load", "weekend"]).is_ok());
    }

    #[test]
    fn test_parse_trip_single_waypoint_rejected() {
        assert!(Cli::try_parse_from(["skyplan", "trip", "KORD"]).is_err());
    }

    #[test]
    fn test_parse_logbook_add() {
        let cli = Cli::try_parse_from([
            "skyplan", "logbook", "add", "--date", "2026-03-14", "--total", "1.5",
            "--day-landings", "3",
        ])
        .unwrap();
        match cli.command {
            Command::Logbook(LogbookCommand::Add {
                date,
                total,
                day_landings,
                ..
            }) => {
                assert_eq!(date, "2026-03-14");
                assert_eq!(total, 1.5);
                assert_eq!(day_landings, 3);
            }
            other => panic!("expected logbook add, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_route_save() {
        let cli =
            Cli::try_parse_from(["skyplan", "route", "save", "weekend", "KORD", "KMKE"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Route(RouteCommand::Save { .. })
        ));
    }

    #[test]
    fn test_parse_sync_resolve() {
        let cli = Cli::try_parse_from([
            "skyplan", "sync", "resolve", "--strategy", "both", "--all",
        ])
        .unwrap();
        match cli.command {
            Command::Sync(SyncCommand::Resolve { strategy, all }) => {
                assert_eq!(strategy, ResolutionArg::Both);
                assert!(all);
            }
            other => panic!("expected sync resolve, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_with_config_and_verbose() {
        let cli = Cli::try_parse_from([
            "skyplan", "-c", "/custom/config.toml", "-v", "currency",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/custom/config.toml")));
        assert_eq!(cli.verbose, 1);
        assert_eq!(cli.verbosity(), crate::logging::Verbosity::Verbose);
    }

    #[test]
    fn test_verbosity_quiet_wins() {
        let cli = Cli::try_parse_from(["skyplan", "-q", "-v", "currency"]).unwrap();
        assert_eq!(cli.verbosity(), crate::logging::Verbosity::Quiet);
    }
}
