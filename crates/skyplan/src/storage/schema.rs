//! `SQLite` schema definitions for skyplan.
//!
//! This module contains the SQL statements for creating and managing
//! the database schema.

/// SQL statement to create the logbook table.
pub const CREATE_LOGBOOK_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS logbook_entries (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    date TEXT NOT NULL,
    total_time REAL NOT NULL DEFAULT 0,
    solo_time REAL NOT NULL DEFAULT 0,
    night_time REAL NOT NULL DEFAULT 0,
    instrument_time REAL NOT NULL DEFAULT 0,
    cross_country_time REAL NOT NULL DEFAULT 0,
    day_landings INTEGER NOT NULL DEFAULT 0,
    night_landings INTEGER NOT NULL DEFAULT 0,
    dual_received REAL NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
)
";

/// SQL statement to create an index on logbook dates.
pub const CREATE_LOGBOOK_DATE_INDEX: &str = r"
CREATE INDEX IF NOT EXISTS idx_logbook_date ON logbook_entries(date DESC)
";

/// SQL statement to create the saved-routes table.
pub const CREATE_ROUTES_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS routes (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE,
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
)
";

/// SQL statement to create the route-waypoints table.
pub const CREATE_ROUTE_WAYPOINTS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS route_waypoints (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    route_id INTEGER NOT NULL REFERENCES routes(id) ON DELETE CASCADE,
    seq INTEGER NOT NULL,
    icao TEXT NOT NULL,
    name TEXT NOT NULL,
    city TEXT,
    latitude REAL NOT NULL,
    longitude REAL NOT NULL,
    size TEXT
)
";

/// SQL statement to create an index on waypoint route membership.
pub const CREATE_ROUTE_WAYPOINTS_INDEX: &str = r"
CREATE INDEX IF NOT EXISTS idx_route_waypoints_route ON route_waypoints(route_id, seq)
";

/// SQL statement to create the offline sync queue.
pub const CREATE_SYNC_QUEUE_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS sync_queue (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    kind TEXT NOT NULL,
    action TEXT NOT NULL,
    data TEXT NOT NULL,
    queued_at TEXT NOT NULL,
    retries INTEGER NOT NULL DEFAULT 0
)
";

/// SQL statement to create an index on queue order.
pub const CREATE_SYNC_QUEUE_INDEX: &str = r"
CREATE INDEX IF NOT EXISTS idx_sync_queue_queued_at ON sync_queue(queued_at)
";

/// SQL statement to create the conflicts table.
pub const CREATE_CONFLICTS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS conflicts (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    kind TEXT NOT NULL,
    local_data TEXT NOT NULL,
    server_data TEXT NOT NULL,
    conflict_kind TEXT NOT NULL,
    detected_at TEXT NOT NULL,
    resolved INTEGER NOT NULL DEFAULT 0
)
";

/// SQL statement to create an index on unresolved conflicts.
pub const CREATE_CONFLICTS_INDEX: &str = r"
CREATE INDEX IF NOT EXISTS idx_conflicts_resolved ON conflicts(resolved, detected_at)
";

/// SQL statement to create the airport data cache.
///
/// One row per airport per datum (`fuel_100ll`, `fuel_jet_a`, `fbo_fee`);
/// a later write for the same key overwrites.
pub const CREATE_AIRPORT_CACHE_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS airport_cache (
    icao TEXT NOT NULL,
    data_type TEXT NOT NULL,
    price REAL NOT NULL,
    updated_at TEXT NOT NULL,
    PRIMARY KEY (icao, data_type)
)
";

/// SQL statement to create the metadata table for storing key-value pairs.
pub const CREATE_METADATA_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS metadata (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
)
";

/// All schema creation statements in order.
pub const SCHEMA_STATEMENTS: &[&str] = &[
    CREATE_LOGBOOK_TABLE,
    CREATE_LOGBOOK_DATE_INDEX,
    CREATE_ROUTES_TABLE,
    CREATE_ROUTE_WAYPOINTS_TABLE,
    CREATE_ROUTE_WAYPOINTS_INDEX,
    CREATE_SYNC_QUEUE_TABLE,
    CREATE_SYNC_QUEUE_INDEX,
    CREATE_CONFLICTS_TABLE,
    CREATE_CONFLICTS_INDEX,
    CREATE_AIRPORT_CACHE_TABLE,
    CREATE_METADATA_TABLE,
];
