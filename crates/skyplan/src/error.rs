//! Error types for skyplan.
//!
//! This module defines all error types used throughout the skyplan crate,
//! providing detailed context for debugging and user-friendly error messages.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for skyplan operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Storage Errors ===
    /// Failed to open or create the database.
    #[error("failed to open database at {path}: {source}")]
    DatabaseOpen {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// A database query failed.
    #[error("database query failed: {0}")]
    DatabaseQuery(#[from] rusqlite::Error),

    /// Failed to run database migrations.
    #[error("database migration failed: {message}")]
    DatabaseMigration {
        /// Description of what went wrong.
        message: String,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Planning Errors ===
    /// A calculator was given an input it cannot work with.
    #[error("invalid input: {message}")]
    InvalidInput {
        /// Description of the rejected input.
        message: String,
    },

    /// No aircraft profile matched the requested name.
    #[error("unknown aircraft profile: {name}")]
    ProfileNotFound {
        /// The name that was looked up.
        name: String,
    },

    /// A route needs at least two waypoints to be estimated.
    #[error("route has {count} waypoint(s), at least 2 required")]
    RouteTooShort {
        /// Number of waypoints present.
        count: usize,
    },

    /// The waypoint's ICAO identifier is already part of the route.
    #[error("waypoint {icao} is already in the route")]
    DuplicateWaypoint {
        /// The duplicated identifier.
        icao: String,
    },

    /// The identifier is not a valid ICAO airport code.
    #[error("invalid ICAO identifier: {code}")]
    InvalidIcao {
        /// The rejected identifier.
        code: String,
    },

    /// No saved route matched the requested name.
    #[error("no saved route named '{name}'")]
    RouteNotFound {
        /// The name that was looked up.
        name: String,
    },

    // === Sync Errors ===
    /// No conflict with the given identifier exists.
    #[error("no pending conflict with id {id}")]
    ConflictNotFound {
        /// The conflict row identifier.
        id: i64,
    },

    /// The resolver was asked to resolve while not presenting a conflict.
    #[error("no conflict is currently presented")]
    NoConflictPresented,

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // === Generic Errors ===
    /// An internal error occurred (bug).
    #[error("internal error: {0}")]
    Internal(String),
}

/// A specialized Result type for skyplan operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a new invalid-input error.
    #[must_use]
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Create a new internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Check if this error is an input-validation rejection.
    #[must_use]
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput { .. })
    }

    /// Check if this error means a looked-up record was absent.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::ProfileNotFound { .. }
                | Self::RouteNotFound { .. }
                | Self::ConflictNotFound { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::invalid_input("burn rate must be positive");
        assert_eq!(err.to_string(), "invalid input: burn rate must be positive");

        let err = Error::RouteTooShort { count: 1 };
        assert_eq!(err.to_string(), "route has 1 waypoint(s), at least 2 required");
    }

    #[test]
    fn test_error_is_invalid_input() {
        assert!(Error::invalid_input("x").is_invalid_input());
        assert!(!Error::NoConflictPresented.is_invalid_input());
    }

    #[test]
    fn test_error_is_not_found() {
        let err = Error::ProfileNotFound {
            name: "Cessna 140".to_string(),
        };
        assert!(err.is_not_found());
        assert!(Error::RouteNotFound { name: "x".into() }.is_not_found());
        assert!(Error::ConflictNotFound { id: 7 }.is_not_found());
        assert!(!Error::invalid_input("x").is_not_found());
    }

    #[test]
    fn test_duplicate_waypoint_display() {
        let err = Error::DuplicateWaypoint {
            icao: "KORD".to_string(),
        };
        assert!(err.to_string().contains("KORD"));
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_from_json_error() {
        let json_result: std::result::Result<i32, serde_json::Error> =
            serde_json::from_str("not valid json");
        if let Err(json_err) = json_result {
            let err: Error = json_err.into();
            assert!(matches!(err, Error::Json(_)));
        }
    }

    #[test]
    fn test_from_rusqlite_error() {
        let result = rusqlite::Connection::open_with_flags(
            "/nonexistent/path/db.sqlite",
            rusqlite::OpenFlags::SQLITE_OPEN_READ_ONLY,
        );
        if let Err(sqlite_err) = result {
            let err: Error = sqlite_err.into();
            assert!(matches!(err, Error::DatabaseQuery(_)));
        }
    }

    #[test]
    fn test_config_validation_error_display() {
        let err = Error::ConfigValidation {
            message: "fallback price must be positive".to_string(),
        };
        assert!(err.to_string().contains("fallback price"));
    }
}
