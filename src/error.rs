//! Error types for the attendance engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for every failure the engine can surface to a caller. Nothing is folded
//! into a generic failure: each variant belongs to exactly one [`ErrorKind`].

use chrono::NaiveDateTime;
use thiserror::Error;

use crate::models::Role;

/// Broad classification of an [`EngineError`].
///
/// Callers use the kind to decide how to present a failure and whether it is
/// safe to retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The reported coordinate is outside the active perimeter.
    Geofence,
    /// A shift-state invariant was violated (race or stale client state).
    StateConflict,
    /// Input is malformed and must be corrected before resubmitting.
    MalformedInput,
    /// The caller's role does not permit the operation.
    Unauthorized,
    /// A collaborator (persistence, lock) failed or timed out.
    Unavailable,
    /// The engine configuration could not be loaded.
    Configuration,
}

/// The main error type for the attendance engine.
///
/// # Example
///
/// ```
/// use attendance_engine::error::{EngineError, ErrorKind};
///
/// let error = EngineError::NotClockedIn {
///     worker_id: "w-001".to_string(),
/// };
/// assert_eq!(error.to_string(), "Worker 'w-001' has no open shift");
/// assert_eq!(error.kind(), ErrorKind::StateConflict);
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// The clock event was reported from outside the perimeter.
    #[error(
        "Location is outside the allowed perimeter: {distance_meters:.1}m from center, radius {radius_meters:.1}m"
    )]
    OutsidePerimeter {
        /// Great-circle distance from the perimeter center.
        distance_meters: f64,
        /// Radius of the active perimeter.
        radius_meters: f64,
    },

    /// The worker already has an open shift.
    #[error("Worker '{worker_id}' is already clocked in (shift '{shift_id}')")]
    AlreadyClockedIn {
        /// The worker attempting to clock in.
        worker_id: String,
        /// The currently open shift.
        shift_id: String,
    },

    /// The worker has no open shift to complete.
    #[error("Worker '{worker_id}' has no open shift")]
    NotClockedIn {
        /// The worker attempting to clock out.
        worker_id: String,
    },

    /// The store refused a second open shift for the same worker.
    #[error("Worker '{worker_id}' already has an open shift in the store")]
    DuplicateOpenShift {
        /// The worker whose record was rejected.
        worker_id: String,
    },

    /// A clock-out time is not strictly after the clock-in time.
    #[error("Clock-out at {clock_out} is not after clock-in at {clock_in} for shift '{shift_id}'")]
    InvalidTimestamp {
        /// The shift being completed.
        shift_id: String,
        /// The shift's clock-in time.
        clock_in: NaiveDateTime,
        /// The rejected clock-out time.
        clock_out: NaiveDateTime,
    },

    /// A perimeter definition was rejected.
    #[error("Invalid perimeter: {message}")]
    InvalidPerimeter {
        /// What made the perimeter invalid.
        message: String,
    },

    /// A reported coordinate is not a valid latitude/longitude pair.
    #[error("Invalid location: {message}")]
    InvalidLocation {
        /// What made the coordinate invalid.
        message: String,
    },

    /// A worker registration was rejected.
    #[error("Invalid worker: {message}")]
    InvalidWorker {
        /// What made the registration invalid.
        message: String,
    },

    /// A summary window cannot be built from the requested start date.
    #[error("Invalid summary window: {message}")]
    InvalidWindow {
        /// What made the window invalid.
        message: String,
    },

    /// The caller's role does not allow the operation.
    #[error("Worker '{worker_id}' is not authorized: {required} role required")]
    Unauthorized {
        /// The calling worker.
        worker_id: String,
        /// The role the operation requires.
        required: Role,
    },

    /// The shift store failed.
    #[error("Shift store unavailable during {operation}: {message}")]
    StoreUnavailable {
        /// The store operation that failed.
        operation: String,
        /// A description of the failure.
        message: String,
    },

    /// A collaborator call did not finish in time.
    #[error("Operation '{operation}' timed out after {millis}ms")]
    Timeout {
        /// The operation that timed out.
        operation: String,
        /// The configured limit.
        millis: u64,
    },

    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },
}

impl EngineError {
    /// Returns the classification of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            EngineError::OutsidePerimeter { .. } => ErrorKind::Geofence,
            EngineError::AlreadyClockedIn { .. }
            | EngineError::NotClockedIn { .. }
            | EngineError::DuplicateOpenShift { .. } => ErrorKind::StateConflict,
            EngineError::InvalidTimestamp { .. }
            | EngineError::InvalidPerimeter { .. }
            | EngineError::InvalidLocation { .. }
            | EngineError::InvalidWorker { .. }
            | EngineError::InvalidWindow { .. } => ErrorKind::MalformedInput,
            EngineError::Unauthorized { .. } => ErrorKind::Unauthorized,
            EngineError::StoreUnavailable { .. } | EngineError::Timeout { .. } => {
                ErrorKind::Unavailable
            }
            EngineError::ConfigNotFound { .. } | EngineError::ConfigParseError { .. } => {
                ErrorKind::Configuration
            }
        }
    }

    /// Returns true if resubmitting (after refreshing state) may succeed.
    ///
    /// State conflicts are retryable once the caller has re-read its state.
    /// Unavailability is retryable, but writes are never retried by the
    /// engine itself.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::StateConflict | ErrorKind::Unavailable
        )
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
