//! Logbook entries and aggregate totals.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// One logbook entry.
///
/// Entries are immutable inputs to the currency and totals calculators;
/// nothing downstream ever mutates one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogbookEntry {
    /// Unique identifier assigned by the storage layer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Date of the flight.
    pub date: NaiveDate,
    /// Total flight time in hours.
    pub total_time: f64,
    /// Solo time in hours.
    pub solo_time: f64,
    /// Night time in hours.
    pub night_time: f64,
    /// Instrument time in hours.
    pub instrument_time: f64,
    /// Cross-country time in hours.
    pub cross_country_time: f64,
    /// Landings during the day.
    pub day_landings: u32,
    /// Landings at night.
    pub night_landings: u32,
    /// Dual instruction received, in hours.
    pub dual_received: f64,
}

impl LogbookEntry {
    /// A zeroed entry for the given date.
    #[must_use]
    pub fn on(date: NaiveDate) -> Self {
        Self {
            id: None,
            date,
            total_time: 0.0,
            solo_time: 0.0,
            night_time: 0.0,
            instrument_time: 0.0,
            cross_country_time: 0.0,
            day_landings: 0,
            night_landings: 0,
            dual_received: 0.0,
        }
    }

    /// Validate the entry's fields.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if any duration is negative or
    /// non-finite.
    pub fn validate(&self) -> Result<()> {
        for (label, value) in [
            ("total time", self.total_time),
            ("solo time", self.solo_time),
            ("night time", self.night_time),
            ("instrument time", self.instrument_time),
            ("cross-country time", self.cross_country_time),
            ("dual received", self.dual_received),
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

/// Aggregate totals across a set of logbook entries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LogbookTotals {
    /// Number of entries.
    pub entries: usize,
    /// Total flight time in hours.
    pub total_time: f64,
    /// Solo time in hours.
    pub solo_time: f64,
    /// Night time in hours.
    pub night_time: f64,
    /// Instrument time in hours.
    pub instrument_time: f64,
    /// Cross-country time in hours.
    pub cross_country_time: f64,
    /// Dual instruction received, in hours.
    pub dual_received: f64,
    /// Landings during the day.
    pub day_landings: u32,
    /// Landings at night.
    pub night_landings: u32,
}

/// Sum a set of entries.
#[must_use]
pub fn totals(entries: &[LogbookEntry]) -> LogbookTotals {
    let mut acc = LogbookTotals {
        entries: entries.len(),
        ..LogbookTotals::default()
    };
    for entry in entries {
        acc.total_time += entry.total_time;
        acc.solo_time += entry.solo_time;
        acc.night_time += entry.night_time;
        acc.instrument_time += entry.instrument_time;
        acc.cross_country_time += entry.cross_country_time;
        acc.dual_received += entry.dual_received;
        acc.day_landings += entry.day_landings;
        acc.night_landings += entry.night_landings;
    }
    acc
}
