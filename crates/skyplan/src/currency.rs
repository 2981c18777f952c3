//! Regulatory currency evaluation over logbook entries.
//!
//! Each rule scans the logbook for its most recent qualifying entry and adds
//! a fixed offset; the passenger-carrying rules instead sum landings across
//! a rolling 90-day window. Statuses are recomputed from scratch on every
//! call and never persisted.

use chrono::{DateTime, Days, Months, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::logbook::LogbookEntry;

/// Sentinel `days_remaining` for a currency that was never established.
///
/// A lapsed currency carries a small negative `days_remaining` computed from
/// its real expiry; exactly `-999` means no qualifying entry exists at all.
/// Consumers branch on this distinction.
pub const NEVER_ESTABLISHED: i64 = -999;

/// Landings required within the trailing window for passenger currency.
const PASSENGER_LANDINGS_REQUIRED: u32 = 3;

/// Length of the passenger-currency window, in days.
const PASSENGER_WINDOW_DAYS: u64 = 90;

/// The status of one currency rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrencyStatus {
    /// Rule name.
    pub name: String,
    /// Display icon.
    pub icon: String,
    /// Whether the pilot is current under this rule.
    pub is_current: bool,
    /// When the currency lapses, if it was ever established.
    pub expires_at: Option<DateTime<Utc>>,
    /// Whole days until expiry; negative when lapsed,
    /// [`NEVER_ESTABLISHED`] when no qualifying entry exists.
    pub days_remaining: i64,
    /// Human-readable rule description.
    pub description: String,
}

/// Evaluate all currency rules against a logbook.
///
/// `now` is passed in rather than read from the clock so results are
/// reproducible; callers use `Utc::now()`.
#[must_use]
pub fn evaluate_currencies(entries: &[LogbookEntry], now: DateTime<Utc>) -> Vec<CurrencyStatus> {
    vec![
        single_entry_rule(
            entries,
            now,
            "BFR (Biennial Flight Review)",
            "📋",
            "Required every 24 months",
            "No dual instruction recorded",
            |e| e.dual_received > 0.0,
            Offset::CalendarMonths(24),
        ),
        single_entry_rule(
            entries,
            now,
            "Night Landing Currency",
            "🌙",
            "Required every 90 days for night flights",
            "No night landings recorded",
            |e| e.night_landings > 0,
            Offset::Days(90),
        ),
        single_entry_rule(
            entries,
            now,
            "Instrument Currency",
            "🌫️",
            "Required every 6 months under IFR",
            "No instrument time recorded",
            |e| e.instrument_time > 0.0,
            Offset::CalendarMonths(6),
        ),
        passenger_rule(
            entries,
            now,
            "Day Passenger Currency",
            "👥",
            "3 takeoffs/landings in 90 days",
            |e| e.day_landings,
        ),
        passenger_rule(
            entries,
            now,
            "Night Passenger Currency",
            "🌃",
            "3 night takeoffs/landings in 90 days",
            |e| e.night_landings,
        ),
        single_entry_rule(
            entries,
            now,
            "IPC (Instrument Proficiency)",
            "✈️",
            "Required every 12 months",
            "No instrument training recorded",
            |e| e.instrument_time > 0.0 && e.dual_received > 0.0,
            Offset::CalendarMonths(12),
        ),
    ]
}

/// Offset applied to a qualifying entry's date.
enum Offset {
    /// Calendar months, clamped to the end of the month.
    CalendarMonths(u32),
    /// A fixed number of days.
    Days(u64),
}

impl Offset {
    fn apply(&self, date: NaiveDate) -> NaiveDate {
        match self {
            Self::CalendarMonths(months) => date + Months::new(*months),
            Self::Days(days) => date + Days::new(*days),
        }
    }
}

/// Whole days until `expires_at`, floored, so "later today" is day zero and
/// a lapse earlier today is day minus one.
fn days_remaining(expires_at: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (expires_at - now).num_milliseconds().div_euclid(86_400_000)
}

fn midnight_utc(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN))
}

#[allow(clippy::too_many_arguments)]
fn single_entry_rule(
    entries: &[LogbookEntry],
    now: DateTime<Utc>,
    name: &str,
    icon: &str,
    description: &str,
    missing_description: &str,
    qualifies: impl Fn(&LogbookEntry) -> bool,
    offset: Offset,
) -> CurrencyStatus {
    let latest = entries.iter().filter(|e| qualifies(e)).max_by_key(|e| e.date);

    match latest {
        Some(entry) => {
            let expires_at = midnight_utc(offset.apply(entry.date));
            let remaining = days_remaining(expires_at, now);
            CurrencyStatus {
                name: name.to_string(),
                icon: icon.to_string(),
                is_current: now < expires_at,
                expires_at: Some(expires_at),
                days_remaining: remaining,
                description: description.to_string(),
            }
        }
        None => CurrencyStatus {
            name: name.to_string(),
            icon: icon.to_string(),
            is_current: false,
            expires_at: None,
            days_remaining: NEVER_ESTABLISHED,
            description: missing_description.to_string(),
        },
    }
}

fn passenger_rule(
    entries: &[LogbookEntry],
    now: DateTime<Utc>,
    name: &str,
    icon: &str,
    description: &str,
    landings: impl Fn(&LogbookEntry) -> u32,
) -> CurrencyStatus {
    let window_start = now - chrono::Duration::days(PASSENGER_WINDOW_DAYS as i64);
    let in_window: Vec<&LogbookEntry> = entries
        .iter()
        .filter(|e| midnight_utc(e.date) > window_start)
        .collect();

    let total: u32 = in_window.iter().map(|e| landings(e)).sum();
    let is_current = total >= PASSENGER_LANDINGS_REQUIRED;

    // Currency holds until the earliest landings still counted age out of
    // the window.
    let expires_at = if is_current {
        in_window
            .iter()
            .filter(|e| landings(e) > 0)
            .map(|e| e.date)
            .min()
            .map(|date| midnight_utc(date + Days::new(PASSENGER_WINDOW_DAYS)))
    } else {
        None
    };

    let remaining = expires_at.map_or(NEVER_ESTABLISHED, |at| days_remaining(at, now));

    CurrencyStatus {
        name: name.to_string(),
        icon: icon.to_string(),
        is_current,
        expires_at,
        days_remaining: remaining,
        description: description.to_string(),
    }
}
