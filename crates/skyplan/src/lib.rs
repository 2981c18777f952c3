//! `skyplan` - Local-first flight planning and pilot currency toolkit
//!
//! This library provides the flight-planning calculators (range, trip cost,
//! weight and balance, wind triangle), regulatory currency evaluation over a
//! local logbook, and the offline sync queue with its conflict resolver, all
//! backed by a `SQLite` store.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod aircraft;
pub mod airports;
pub mod cache;
pub mod cli;
pub mod config;
pub mod currency;
pub mod error;
pub mod export;
pub mod geo;
pub mod logbook;
pub mod logging;
pub mod planning;
pub mod prices;
pub mod route;
pub mod storage;
pub mod sync;

pub use aircraft::{AircraftProfile, FuelType};
pub use config::Config;
pub use error::{Error, Result};
pub use logging::init_logging;
pub use route::{Route, Waypoint};
pub use storage::{Storage, StorageStats};
