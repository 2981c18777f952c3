//! Storage layer for skyplan.
//!
//! This module provides `SQLite`-based persistent storage: the pilot's
//! logbook, saved routes, the offline sync queue and its conflicts, and the
//! airport price cache with its TTL.

pub mod migrations;
pub mod schema;

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::airports::AirportSize;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::logbook::LogbookEntry;
use crate::prices::{FuelPrice, PriceBook};
use crate::route::{Route, Waypoint};
use crate::sync::{
    ChangeAction, Conflict, ConflictKind, ConflictStore, PendingChange, RecordKind,
};

/// Airport-cache row key for 100LL prices.
const CACHE_TYPE_100LL: &str = "fuel_100ll";
/// Airport-cache row key for Jet-A prices.
const CACHE_TYPE_JET_A: &str = "fuel_jet_a";
/// Airport-cache row key for FBO fees.
const CACHE_TYPE_FBO_FEE: &str = "fbo_fee";

/// Storage engine backed by `SQLite`.
#[derive(Debug)]
pub struct Storage {
    /// Path to the database file.
    path: PathBuf,
    /// Database connection.
    conn: Connection,
}

/// Statistics about the storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageStats {
    /// Number of logbook entries.
    pub logbook_entries: i64,
    /// Number of saved routes.
    pub saved_routes: i64,
    /// Number of pending sync changes.
    pub pending_changes: i64,
    /// Number of unresolved conflicts.
    pub unresolved_conflicts: i64,
    /// Number of airports with cached data.
    pub cached_airports: i64,
    /// Size of the database file in bytes.
    pub db_size_bytes: u64,
}

impl Storage {
    /// Open or create a storage database at the given path.
    ///
    /// Creates the parent directories and database file if they don't exist.
    /// Initializes the schema if this is a new database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or schema
    /// initialization fails.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        debug!("Opening database at {}", path.display());
        let conn = Connection::open(&path).map_err(|source| Error::DatabaseOpen {
            path: path.clone(),
            source,
        })?;

        // WAL for concurrent readers; foreign keys so route deletes cascade.
        conn.execute_batch(
            "PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL; PRAGMA foreign_keys=ON;",
        )?;

        migrations::initialize_schema(&conn)?;

        info!("Database opened successfully at {}", path.display());
        Ok(Self { path, conn })
    }

    /// Create an in-memory storage instance for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| Error::DatabaseOpen {
            path: PathBuf::from(":memory:"),
            source,
        })?;

        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        migrations::initialize_schema(&conn)?;

        Ok(Self {
            path: PathBuf::from(":memory:"),
            conn,
        })
    }

    /// Get the path to the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    // === Logbook ===

    /// Insert a logbook entry, returning its assigned id.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry is invalid or the insert fails.
    pub fn insert_entry(&self, entry: &LogbookEntry) -> Result<i64> {
        entry.validate()?;
        self.conn.execute(
            r"
            INSERT INTO logbook_entries (
                date, total_time, solo_time, night_time, instrument_time,
                cross_country_time, day_landings, night_landings, dual_received
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            ",
            params![
                entry.date.to_string(),
                entry.total_time,
                entry.solo_time,
                entry.night_time,
                entry.instrument_time,
                entry.cross_country_time,
                entry.day_landings,
                entry.night_landings,
                entry.dual_received,
            ],
        )?;

        let id = self.conn.last_insert_rowid();
        debug!("Inserted logbook entry {}", id);
        Ok(id)
    }

    /// List all logbook entries, most recent first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_entries(&self) -> Result<Vec<LogbookEntry>> {
        let mut stmt = self.conn.prepare(
            r"
            SELECT id, date, total_time, solo_time, night_time, instrument_time,
                   cross_country_time, day_landings, night_landings, dual_received
            FROM logbook_entries ORDER BY date DESC, id DESC
            ",
        )?;

        let entries = stmt
            .query_map([], Self::row_to_entry)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    /// Delete a logbook entry by id.
    ///
    /// Returns `true` if an entry was deleted, `false` if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn delete_entry(&self, id: i64) -> Result<bool> {
        let affected = self
            .conn
            .execute("DELETE FROM logbook_entries WHERE id = ?1", [id])?;
        Ok(affected > 0)
    }

    fn row_to_entry(row: &rusqlite::Row) -> rusqlite::Result<LogbookEntry> {
        let date_str: String = row.get(1)?;
        let date = NaiveDate::from_str(&date_str).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(1, rusqlite::types::Type::Text, Box::new(e))
        })?;

        Ok(LogbookEntry {
            id: Some(row.get(0)?),
            date,
            total_time: row.get(2)?,
            solo_time: row.get(3)?,
            night_time: row.get(4)?,
            instrument_time: row.get(5)?,
            cross_country_time: row.get(6)?,
            day_landings: row.get(7)?,
            night_landings: row.get(8)?,
            dual_received: row.get(9)?,
        })
    }

    // === Saved routes ===

    /// Save a route under its name, replacing any previous version.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction fails.
    pub fn save_route(&mut self, route: &Route) -> Result<()> {
        let tx = self.conn.transaction()?;

        tx.execute("DELETE FROM routes WHERE name = ?1", [&route.name])?;
        tx.execute("INSERT INTO routes (name) VALUES (?1)", [&route.name])?;
        let route_id = tx.last_insert_rowid();

        for (seq, waypoint) in route.waypoints().iter().enumerate() {
            tx.execute(
                r"
                INSERT INTO route_waypoints
                    (route_id, seq, icao, name, city, latitude, longitude, size)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                ",
                params![
                    route_id,
                    seq as i64,
                    waypoint.icao,
                    waypoint.name,
                    waypoint.city,
                    waypoint.latitude,
                    waypoint.longitude,
                    waypoint.size.map(|s| s.to_string()),
                ],
            )?;
        }

        tx.commit()?;
        debug!("Saved route '{}'", route.name);
        Ok(())
    }

    /// Load a saved route by name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RouteNotFound`] if no route has the name.
    pub fn load_route(&self, name: &str) -> Result<Route> {
        let route_id: i64 = self
            .conn
            .query_row("SELECT id FROM routes WHERE name = ?1", [name], |row| {
                row.get(0)
            })
            .optional()?
            .ok_or_else(|| Error::RouteNotFound {
                name: name.to_string(),
            })?;

        let mut stmt = self.conn.prepare(
            r"
            SELECT icao, name, city, latitude, longitude, size
            FROM route_waypoints WHERE route_id = ?1 ORDER BY seq
            ",
        )?;
        let waypoints = stmt
            .query_map([route_id], Self::row_to_waypoint)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let mut route = Route::new(name);
        for waypoint in waypoints {
            route.push(waypoint)?;
        }
        Ok(route)
    }

    /// List saved route names, most recent first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_routes(&self) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT name FROM routes ORDER BY created_at DESC, id DESC")?;
        let names = stmt
            .query_map([], |row| row.get(0))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(names)
    }

    /// Delete a saved route by name, cascading to its waypoints.
    ///
    /// Returns `true` if a route was deleted.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn delete_route(&self, name: &str) -> Result<bool> {
        let affected = self.conn.execute("DELETE FROM routes WHERE name = ?1", [name])?;
        Ok(affected > 0)
    }

    fn row_to_waypoint(row: &rusqlite::Row) -> rusqlite::Result<Waypoint> {
        let size_str: Option<String> = row.get(5)?;
        let size = size_str.and_then(|s| match s.as_str() {
            "large" => Some(AirportSize::Large),
            "medium" => Some(AirportSize::Medium),
            "small" => Some(AirportSize::Small),
            other => {
                warn!("Unknown airport size '{}', ignoring", other);
                None
            }
        });

        Ok(Waypoint {
            icao: row.get(0)?,
            name: row.get(1)?,
            city: row.get(2)?,
            latitude: row.get(3)?,
            longitude: row.get(4)?,
            size,
        })
    }

    // === Sync queue ===

    /// Add a change to the sync queue, returning its assigned id.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn queue_change(&self, change: &PendingChange) -> Result<i64> {
        self.conn.execute(
            r"
            INSERT INTO sync_queue (kind, action, data, queued_at, retries)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ",
            params![
                change.kind.to_string(),
                change.action.to_string(),
                change.data.to_string(),
                change.queued_at.to_rfc3339(),
                change.retries,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// All pending changes, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn pending_changes(&self) -> Result<Vec<PendingChange>> {
        let mut stmt = self.conn.prepare(
            r"
            SELECT id, kind, action, data, queued_at, retries
            FROM sync_queue ORDER BY queued_at, id
            ",
        )?;
        let changes = stmt
            .query_map([], Self::row_to_change)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(changes)
    }

    /// Number of pending changes.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn pending_count(&self) -> Result<i64> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM sync_queue", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Remove a change from the queue after a successful push.
    ///
    /// Returns `true` if a change was removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn remove_change(&self, id: i64) -> Result<bool> {
        let affected = self.conn.execute("DELETE FROM sync_queue WHERE id = ?1", [id])?;
        Ok(affected > 0)
    }

    fn row_to_change(row: &rusqlite::Row) -> rusqlite::Result<PendingChange> {
        let kind_str: String = row.get(1)?;
        let kind = RecordKind::from_str(&kind_str).unwrap_or_else(|_| {
            warn!("Unknown record kind '{}', defaulting to flight_log", kind_str);
            RecordKind::FlightLog
        });
        let action_str: String = row.get(2)?;
        let action = ChangeAction::from_str(&action_str).unwrap_or_else(|_| {
            warn!("Unknown change action '{}', defaulting to create", action_str);
            ChangeAction::Create
        });
        let data_str: String = row.get(3)?;
        let data: Value = serde_json::from_str(&data_str).unwrap_or(Value::Null);
        let queued_at_str: String = row.get(4)?;
        let queued_at = DateTime::parse_from_rfc3339(&queued_at_str)
            .map_or_else(|_| Utc::now(), |dt| dt.with_timezone(&Utc));

        Ok(PendingChange {
            id: Some(row.get(0)?),
            kind,
            action,
            data,
            queued_at,
            retries: row.get(5)?,
        })
    }

    // === Conflicts ===

    /// Record a detected conflict, returning its assigned id.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn record_conflict(
        &self,
        kind: RecordKind,
        local_data: &Value,
        server_data: &Value,
        conflict_kind: ConflictKind,
    ) -> Result<i64> {
        self.conn.execute(
            r"
            INSERT INTO conflicts (kind, local_data, server_data, conflict_kind, detected_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ",
            params![
                kind.to_string(),
                local_data.to_string(),
                server_data.to_string(),
                conflict_kind.to_string(),
                Utc::now().to_rfc3339(),
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Number of unresolved conflicts.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn unresolved_count(&self) -> Result<i64> {
        let count = self.conn.query_row(
            "SELECT COUNT(*) FROM conflicts WHERE resolved = 0",
            [],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    fn unresolved_conflicts(&self) -> Result<Vec<Conflict>> {
        let mut stmt = self.conn.prepare(
            r"
            SELECT id, kind, local_data, server_data, conflict_kind, detected_at, resolved
            FROM conflicts WHERE resolved = 0 ORDER BY detected_at, id
            ",
        )?;
        let conflicts = stmt
            .query_map([], Self::row_to_conflict)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(conflicts)
    }

    fn row_to_conflict(row: &rusqlite::Row) -> rusqlite::Result<Conflict> {
        let kind_str: String = row.get(1)?;
        let kind = RecordKind::from_str(&kind_str).unwrap_or_else(|_| {
            warn!("Unknown record kind '{}', defaulting to flight_log", kind_str);
            RecordKind::FlightLog
        });
        let local_str: String = row.get(2)?;
        let server_str: String = row.get(3)?;
        let conflict_kind_str: String = row.get(4)?;
        let conflict_kind = ConflictKind::from_str(&conflict_kind_str).unwrap_or_else(|_| {
            warn!(
                "Unknown conflict kind '{}', defaulting to updated",
                conflict_kind_str
            );
            ConflictKind::Updated
        });
        let detected_at_str: String = row.get(5)?;
        let detected_at = DateTime::parse_from_rfc3339(&detected_at_str)
            .map_or_else(|_| Utc::now(), |dt| dt.with_timezone(&Utc));

        Ok(Conflict {
            id: row.get(0)?,
            kind,
            local_data: serde_json::from_str(&local_str).unwrap_or(Value::Null),
            server_data: serde_json::from_str(&server_str).unwrap_or(Value::Null),
            conflict_kind,
            detected_at,
            resolved: row.get::<_, i64>(6)? != 0,
        })
    }

    // === Airport cache ===

    /// Cache posted fuel prices for an airport, overwriting by key.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn store_cached_price(&self, icao: &str, price: &FuelPrice) -> Result<()> {
        let now = Utc::now().to_rfc3339();
        let upper = icao.to_uppercase();
        for (data_type, value) in [
            (CACHE_TYPE_100LL, price.price_100ll),
            (CACHE_TYPE_JET_A, price.price_jet_a),
        ] {
            if let Some(value) = value {
                self.conn.execute(
                    r"
                    INSERT OR REPLACE INTO airport_cache (icao, data_type, price, updated_at)
                    VALUES (?1, ?2, ?3, ?4)
                    ",
                    params![upper, data_type, value, now],
                )?;
            }
        }
        Ok(())
    }

    /// Cache an FBO fee for an airport, overwriting by key.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn store_cached_fee(&self, icao: &str, fee: f64) -> Result<()> {
        self.conn.execute(
            r"
            INSERT OR REPLACE INTO airport_cache (icao, data_type, price, updated_at)
            VALUES (?1, ?2, ?3, ?4)
            ",
            params![
                icao.to_uppercase(),
                CACHE_TYPE_FBO_FEE,
                fee,
                Utc::now().to_rfc3339()
            ],
        )?;
        Ok(())
    }

    /// Hydrate an in-memory price book from the persisted cache.
    ///
    /// Entries keep their original store timestamps, so anything past the
    /// configured TTL is already expired when first read.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn load_price_book(&self, config: &Config) -> Result<PriceBook> {
        let mut stmt = self
            .conn
            .prepare("SELECT icao, data_type, price, updated_at FROM airport_cache")?;
        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, f64>(2)?,
                    row.get::<_, String>(3)?,
                ))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        // Merge per-datum rows into one price record per airport, stamped
        // with the oldest contributing row so TTL stays conservative.
        let mut prices: HashMap<String, (FuelPrice, DateTime<Utc>)> = HashMap::new();
        let mut book = PriceBook::new(config);

        for (icao, data_type, value, updated_at_str) in rows {
            let updated_at = DateTime::parse_from_rfc3339(&updated_at_str)
                .map_or_else(|_| Utc::now(), |dt| dt.with_timezone(&Utc));

            match data_type.as_str() {
                CACHE_TYPE_100LL | CACHE_TYPE_JET_A => {
                    let entry = prices
                        .entry(icao)
                        .or_insert((FuelPrice::default(), updated_at));
                    if data_type == CACHE_TYPE_100LL {
                        entry.0.price_100ll = Some(value);
                    } else {
                        entry.0.price_jet_a = Some(value);
                    }
                    entry.1 = entry.1.min(updated_at);
                }
                CACHE_TYPE_FBO_FEE => {
                    book.store_fee_at(&icao, value, updated_at);
                }
                other => warn!("Unknown airport cache type '{}', skipping", other),
            }
        }

        for (icao, (price, stored_at)) in prices {
            book.store_price_at(&icao, price, stored_at);
        }
        Ok(book)
    }

    /// Delete cached airport data older than the given age.
    ///
    /// Returns the number of rows deleted.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn prune_airport_cache(&self, max_age: Duration) -> Result<usize> {
        let cutoff = (Utc::now() - max_age).to_rfc3339();
        let affected = self
            .conn
            .execute("DELETE FROM airport_cache WHERE updated_at < ?1", [cutoff])?;

        if affected > 0 {
            info!("Pruned {} stale airport cache rows", affected);
        }
        Ok(affected)
    }

    // === Stats ===

    /// Get database statistics.
    ///
    /// # Errors
    ///
    /// Returns an error if a query fails.
    pub fn stats(&self) -> Result<StorageStats> {
        let count = |sql: &str| -> Result<i64> {
            Ok(self.conn.query_row(sql, [], |row| row.get(0))?)
        };

        let db_size_bytes = if self.path.to_string_lossy() == ":memory:" {
            0
        } else {
            std::fs::metadata(&self.path).map(|m| m.len()).unwrap_or(0)
        };

        Ok(StorageStats {
            logbook_entries: count("SELECT COUNT(*) FROM logbook_entries")?,
            saved_routes: count("SELECT COUNT(*) FROM routes")?,
            pending_changes: count("SELECT COUNT(*) FROM sync_queue")?,
            unresolved_conflicts: count("SELECT COUNT(*) FROM conflicts WHERE resolved = 0")?,
            cached_airports: count("SELECT COUNT(DISTINCT icao) FROM airport_cache")?,
            db_size_bytes,
        })
    }
}

impl ConflictStore for Storage {
    fn unresolved(&mut self) -> Result<Vec<Conflict>> {
        Self::unresolved_conflicts(self)
    }

    /// Resolve a conflict, re-queueing in the same transaction so a crash
    /// can neither duplicate nor lose the local change.
    fn finish(&mut self, conflict_id: i64, requeue: Option<PendingChange>) -> Result<()> {
        let tx = self.conn.transaction()?;

        let affected = tx.execute(
            "UPDATE conflicts SET resolved = 1 WHERE id = ?1 AND resolved = 0",
            [conflict_id],
        )?;
        if affected == 0 {
            return Err(Error::ConflictNotFound { id: conflict_id });
        }

        if let Some(change) = requeue {
            tx.execute(
                r"
                INSERT INTO sync_queue (kind, action, data, queued_at, retries)
                VALUES (?1, ?2, ?3, ?4, ?5)
                ",
                params![
                    change.kind.to_string(),
                    change.action.to_string(),
                    change.data.to_string(),
                    change.queued_at.to_rfc3339(),
                    change.retries,
                ],
            )?;
        }

        tx.commit()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    use crate::sync::{ConflictResolver, Resolution, ResolverState};

    fn create_test_storage() -> Storage {
        Storage::open_in_memory().expect("failed to create test storage")
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample_entry() -> LogbookEntry {
        let mut entry = LogbookEntry::on(date(2026, 3, 14));
        entry.total_time = 1.5;
        entry.day_landings = 3;
        entry.dual_received = 1.5;
        entry
    }

    #[test]
    fn test_open_in_memory() {
        assert!(Storage::open_in_memory().is_ok());
    }

    #[test]
    fn test_insert_and_list_entries() {
        let storage = create_test_storage();
        let id = storage.insert_entry(&sample_entry()).unwrap();
        assert!(id > 0);

        let entries = storage.list_entries().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id, Some(id));
        assert_eq!(entries[0].date, date(2026, 3, 14));
        assert_eq!(entries[0].day_landings, 3);
    }

    #[test]
    fn test_list_entries_most_recent_first() {
        let storage = create_test_storage();
        let mut older = sample_entry();
        older.date = date(2026, 1, 1);
        let mut newer = sample_entry();
        newer.date = date(2026, 5, 1);

        storage.insert_entry(&older).unwrap();
        storage.insert_entry(&newer).unwrap();

        let entries = storage.list_entries().unwrap();
        assert_eq!(entries[0].date, date(2026, 5, 1));
        assert_eq!(entries[1].date, date(2026, 1, 1));
    }

    #[test]
    fn test_insert_rejects_invalid_entry() {
        let storage = create_test_storage();
        let mut bad = sample_entry();
        bad.total_time = -1.0;
        assert!(storage.insert_entry(&bad).is_err());
    }

    #[test]
    fn test_delete_entry() {
        let storage = create_test_storage();
        let id = storage.insert_entry(&sample_entry()).unwrap();

        assert!(storage.delete_entry(id).unwrap());
        assert!(!storage.delete_entry(id).unwrap());
        assert!(storage.list_entries().unwrap().is_empty());
    }

    fn sample_route(name: &str) -> Route {
        let mut route = Route::new(name);
        for airport in ["KORD", "KDEN"] {
            route
                .push(crate::airports::find_builtin(airport).unwrap().into())
                .unwrap();
        }
        route
    }

    #[test]
    fn test_save_and_load_route() {
        let mut storage = create_test_storage();
        let route = sample_route("chicago-denver");
        storage.save_route(&route).unwrap();

        let loaded = storage.load_route("chicago-denver").unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded.waypoints()[0].icao, "KORD");
        assert_eq!(loaded.waypoints()[1].icao, "KDEN");
        assert_eq!(loaded.waypoints()[0].size, Some(AirportSize::Large));
    }

    #[test]
    fn test_save_route_replaces_previous() {
        let mut storage = create_test_storage();
        storage.save_route(&sample_route("trip")).unwrap();

        let mut updated = Route::new("trip");
        updated
            .push(crate::airports::find_builtin("KLAX").unwrap().into())
            .unwrap();
        updated
            .push(crate::airports::find_builtin("KLAS").unwrap().into())
            .unwrap();
        storage.save_route(&updated).unwrap();

        let loaded = storage.load_route("trip").unwrap();
        assert_eq!(loaded.waypoints()[0].icao, "KLAX");
        assert_eq!(storage.list_routes().unwrap().len(), 1);
    }

    #[test]
    fn test_load_route_not_found() {
        let storage = create_test_storage();
        let err = storage.load_route("nowhere").unwrap_err();
        assert!(matches!(err, Error::RouteNotFound { .. }));
    }

    #[test]
    fn test_delete_route_cascades_waypoints() {
        let mut storage = create_test_storage();
        storage.save_route(&sample_route("trip")).unwrap();

        assert!(storage.delete_route("trip").unwrap());
        assert!(!storage.delete_route("trip").unwrap());

        let orphans: i64 = storage
            .conn
            .query_row("SELECT COUNT(*) FROM route_waypoints", [], |row| row.get(0))
            .unwrap();
        assert_eq!(orphans, 0);
    }

    #[test]
    fn test_queue_and_list_changes() {
        let storage = create_test_storage();
        let change = PendingChange::create(RecordKind::FlightLog, json!({"date": "2026-03-14"}));
        let id = storage.queue_change(&change).unwrap();

        let pending = storage.pending_changes().unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].id, Some(id));
        assert_eq!(pending[0].kind, RecordKind::FlightLog);
        assert_eq!(pending[0].data, json!({"date": "2026-03-14"}));
        assert_eq!(storage.pending_count().unwrap(), 1);
    }

    #[test]
    fn test_remove_change() {
        let storage = create_test_storage();
        let change = PendingChange::create(RecordKind::Booking, json!({}));
        let id = storage.queue_change(&change).unwrap();

        assert!(storage.remove_change(id).unwrap());
        assert!(!storage.remove_change(id).unwrap());
        assert_eq!(storage.pending_count().unwrap(), 0);
    }

    #[test]
    fn test_record_conflict_and_resolver_round_trip() {
        let storage = create_test_storage();
        let local = json!({"id": 12, "status": "airworthy"});
        let server = json!({"id": 12, "status": "grounded"});
        storage
            .record_conflict(RecordKind::AircraftStatus, &local, &server, ConflictKind::Updated)
            .unwrap();
        assert_eq!(storage.unresolved_count().unwrap(), 1);

        let mut resolver = ConflictResolver::new(storage);
        assert_eq!(
            resolver.start().unwrap(),
            ResolverState::Presenting { index: 0 }
        );
        let presented = resolver.current().unwrap();
        assert_eq!(presented.kind, RecordKind::AircraftStatus);
        assert_eq!(presented.local_data, local);

        assert_eq!(
            resolver.resolve(Resolution::KeepBoth).unwrap(),
            ResolverState::Done
        );

        let storage = resolver.into_store();
        assert_eq!(storage.unresolved_count().unwrap(), 0);
        let pending = storage.pending_changes().unwrap();
        assert_eq!(pending.len(), 1);
        // Keep-both cleared the identifier so a fresh record is created.
        assert!(pending[0].data.get("id").is_none());
        assert_eq!(pending[0].data.get("status"), local.get("status"));
    }

    #[test]
    fn test_finish_unknown_conflict() {
        let mut storage = create_test_storage();
        let err = storage.finish(99, None).unwrap_err();
        assert!(matches!(err, Error::ConflictNotFound { id: 99 }));
    }

    #[test]
    fn test_finish_twice_rejected() {
        let mut storage = create_test_storage();
        let id = storage
            .record_conflict(
                RecordKind::Booking,
                &json!({"id": 1}),
                &json!({"id": 1}),
                ConflictKind::Deleted,
            )
            .unwrap();

        storage.finish(id, None).unwrap();
        assert!(storage.finish(id, None).is_err());
    }

    #[test]
    fn test_store_and_load_price_book() {
        let storage = create_test_storage();
        storage
            .store_cached_price(
                "kord",
                &FuelPrice {
                    price_100ll: Some(9.58),
                    price_jet_a: Some(7.20),
                },
            )
            .unwrap();
        storage.store_cached_fee("KORD", 30.0).unwrap();

        let mut book = storage.load_price_book(&Config::default()).unwrap();
        let price = crate::prices::FuelPriceSource::fuel_price(&mut book, "KORD").unwrap();
        assert_eq!(price.price_100ll, Some(9.58));
        assert_eq!(price.price_jet_a, Some(7.20));
        assert_eq!(crate::prices::FboFeeSource::fbo_fee(&mut book, "KORD"), Some(30.0));
    }

    #[test]
    fn test_cached_price_overwrites_by_key() {
        let storage = create_test_storage();
        let price = |p| FuelPrice {
            price_100ll: Some(p),
            price_jet_a: None,
        };
        storage.store_cached_price("KORD", &price(9.00)).unwrap();
        storage.store_cached_price("KORD", &price(9.85)).unwrap();

        let mut book = storage.load_price_book(&Config::default()).unwrap();
        let loaded = crate::prices::FuelPriceSource::fuel_price(&mut book, "KORD").unwrap();
        assert_eq!(loaded.price_100ll, Some(9.85));
    }

    #[test]
    fn test_prune_airport_cache() {
        let storage = create_test_storage();
        storage
            .store_cached_price(
                "KORD",
                &FuelPrice {
                    price_100ll: Some(9.58),
                    price_jet_a: None,
                },
            )
            .unwrap();

        // Nothing is older than a week yet.
        assert_eq!(storage.prune_airport_cache(Duration::days(7)).unwrap(), 0);

        // Backdate the row and prune again.
        let stale = (Utc::now() - Duration::days(10)).to_rfc3339();
        storage
            .conn
            .execute("UPDATE airport_cache SET updated_at = ?1", [stale])
            .unwrap();
        assert_eq!(storage.prune_airport_cache(Duration::days(7)).unwrap(), 1);
    }

    #[test]
    fn test_stats() {
        let mut storage = create_test_storage();
        storage.insert_entry(&sample_entry()).unwrap();
        storage.save_route(&sample_route("trip")).unwrap();
        storage
            .queue_change(&PendingChange::create(RecordKind::FlightLog, json!({})))
            .unwrap();
        storage
            .record_conflict(
                RecordKind::FlightLog,
                &json!({}),
                &json!({}),
                ConflictKind::Updated,
            )
            .unwrap();
        storage
            .store_cached_price(
                "KORD",
                &FuelPrice {
                    price_100ll: Some(9.58),
                    price_jet_a: None,
                },
            )
            .unwrap();

        let stats = storage.stats().unwrap();
        assert_eq!(stats.logbook_entries, 1);
        assert_eq!(stats.saved_routes, 1);
        assert_eq!(stats.pending_changes, 1);
        assert_eq!(stats.unresolved_conflicts, 1);
        assert_eq!(stats.cached_airports, 1);
        assert_eq!(stats.db_size_bytes, 0);
    }

    #[test]
    fn test_open_file_based() {
        let temp_dir = std::env::temp_dir();
        let db_path = temp_dir.join(format!("skyplan_test_{}.db", std::process::id()));

        let storage = Storage::open(&db_path).unwrap();
        storage.insert_entry(&sample_entry()).unwrap();
        assert_eq!(storage.stats().unwrap().logbook_entries, 1);
        assert_eq!(storage.path(), db_path);

        drop(storage);
        let _ = std::fs::remove_file(&db_path);
        let _ = std::fs::remove_file(db_path.with_extension("db-wal"));
        let _ = std::fs::remove_file(db_path.with_extension("db-shm"));
    }

    #[test]
    fn test_open_creates_parent_dirs() {
        let temp_dir = std::env::temp_dir();
        let nested_path = temp_dir.join(format!(
            "skyplan_test_{}/nested/db.sqlite",
            std::process::id()
        ));

        if let Some(parent) = nested_path.parent() {
            let _ = std::fs::remove_dir_all(parent);
        }

        let storage = Storage::open(&nested_path).unwrap();
        assert!(nested_path.exists());

        drop(storage);
        if let Some(parent) = nested_path.parent() {
            let _ = std::fs::remove_dir_all(parent.parent().unwrap());
        }
    }
}
