//! Offline sync: pending changes, conflicts, and the conflict resolver.
//!
//! Changes made while offline queue locally until they can be pushed. When a
//! queued change collides with a newer server record, a [`Conflict`] is
//! recorded and the [`resolver::ConflictResolver`] walks the user through
//! them one at a time.

pub mod resolver;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use resolver::{ConflictResolver, ConflictStore, Resolution, ResolverState};

/// The kind of record a change or conflict concerns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    /// A logbook flight entry.
    FlightLog,
    /// A maintenance record.
    Maintenance,
    /// An aircraft status update.
    AircraftStatus,
    /// A booking.
    Booking,
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FlightLog => write!(f, "flight_log"),
            Self::Maintenance => write!(f, "maintenance"),
            Self::AircraftStatus => write!(f, "aircraft_status"),
            Self::Booking => write!(f, "booking"),
        }
    }
}

impl std::str::FromStr for RecordKind {
    type Err = crate::error::Error;

    fn from_str(s: &str) -> crate::error::Result<Self> {
        match s {
            "flight_log" => Ok(Self::FlightLog),
            "maintenance" => Ok(Self::Maintenance),
            "aircraft_status" => Ok(Self::AircraftStatus),
            "booking" => Ok(Self::Booking),
            other => Err(crate::error::Error::internal(format!(
                "unknown record kind: {other}"
            ))),
        }
    }
}

/// What a queued change does to its record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeAction {
    /// Create a new record.
    Create,
    /// Update an existing record.
    Update,
    /// Delete an existing record.
    Delete,
}

impl std::fmt::Display for ChangeAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Create => write!(f, "create"),
            Self::Update => write!(f, "update"),
            Self::Delete => write!(f, "delete"),
        }
    }
}

impl std::str::FromStr for ChangeAction {
    type Err = crate::error::Error;

    fn from_str(s: &str) -> crate::error::Result<Self> {
        match s {
            "create" => Ok(Self::Create),
            "update" => Ok(Self::Update),
            "delete" => Ok(Self::Delete),
            other => Err(crate::error::Error::internal(format!(
                "unknown change action: {other}"
            ))),
        }
    }
}

/// A locally queued change awaiting sync.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingChange {
    /// Queue row identifier, assigned by storage.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Record kind.
    pub kind: RecordKind,
    /// What the change does.
    pub action: ChangeAction,
    /// The record payload.
    pub data: Value,
    /// When the change was queued locally.
    pub queued_at: DateTime<Utc>,
    /// Push attempts so far.
    pub retries: u32,
}

impl PendingChange {
    /// Queue a record creation.
    #[must_use]
    pub fn create(kind: RecordKind, data: Value) -> Self {
        Self {
            id: None,
            kind,
            action: ChangeAction::Create,
            data,
            queued_at: Utc::now(),
            retries: 0,
        }
    }
}

/// How a local change collided with the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictKind {
    /// The record was updated on the server after the local change.
    Updated,
    /// The record was deleted on the server.
    Deleted,
}

impl std::fmt::Display for ConflictKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Updated => write!(f, "updated"),
            Self::Deleted => write!(f, "deleted"),
        }
    }
}

impl std::str::FromStr for ConflictKind {
    type Err = crate::error::Error;

    fn from_str(s: &str) -> crate::error::Result<Self> {
        match s {
            "updated" => Ok(Self::Updated),
            "deleted" => Ok(Self::Deleted),
            other => Err(crate::error::Error::internal(format!(
                "unknown conflict kind: {other}"
            ))),
        }
    }
}

/// A detected collision between a local change and the server record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conflict {
    /// Conflict row identifier.
    pub id: i64,
    /// Record kind.
    pub kind: RecordKind,
    /// The local version of the record.
    pub local_data: Value,
    /// The server version of the record (empty object for deletions).
    pub server_data: Value,
    /// How the collision happened.
    pub conflict_kind: ConflictKind,
    /// When the collision was detected.
    pub detected_at: DateTime<Utc>,
    /// Whether the conflict has been resolved.
    pub resolved: bool,
}

/// Clone a payload with its `id` field removed, so re-queueing it creates a
/// new record instead of colliding again.
#[must_use]
pub fn without_id(data: &Value) -> Value {
    let mut cleared = data.clone();
    if let Value::Object(map) = &mut cleared {
        map.remove("id");
    }
    cleared
}
