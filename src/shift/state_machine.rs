//! Per-worker clock state and transition rules.
//!
//! A worker is either [`ShiftState::Out`] (no open shift) or
//! [`ShiftState::In`] (exactly one open shift). Transitions cycle
//! `Out -> In -> Out` for the lifetime of the worker; there is no terminal
//! state. Every transition is guarded by the active perimeter.
//!
//! The functions here are pure: they decide whether a transition is allowed
//! and build the resulting record. Serializing transitions per worker is the
//! caller's job (see [`crate::shift::WorkerLocks`]).

use chrono::NaiveDateTime;
use tracing::warn;
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::geo::{Coordinate, Perimeter};
use crate::models::{ClockOut, ShiftRecord};

/// The clock state of a single worker.
#[derive(Debug, Clone, PartialEq)]
pub enum ShiftState {
    /// No open shift.
    Out,
    /// One open shift.
    In(ShiftRecord),
}

impl ShiftState {
    /// Derives the state from the worker's open shift, if any.
    pub fn from_open_shift(open: Option<ShiftRecord>) -> Self {
        match open {
            Some(record) => ShiftState::In(record),
            None => ShiftState::Out,
        }
    }

    /// Returns the open shift when clocked in.
    pub fn open_shift(&self) -> Option<&ShiftRecord> {
        match self {
            ShiftState::In(record) => Some(record),
            ShiftState::Out => None,
        }
    }

    /// Returns true when the worker has an open shift.
    pub fn is_clocked_in(&self) -> bool {
        matches!(self, ShiftState::In(_))
    }
}

/// A clock-in or clock-out attempt reported by a worker's device.
#[derive(Debug, Clone, PartialEq)]
pub struct ClockEvent {
    /// The worker performing the action.
    pub worker_id: String,
    /// The reported device location.
    pub location: Coordinate,
    /// Optional free-text note.
    pub note: Option<String>,
    /// Server time of the event.
    pub at: NaiveDateTime,
}

/// Treats blank notes as absent.
fn normalize_note(note: Option<String>) -> Option<String> {
    note.filter(|n| !n.trim().is_empty())
}

/// Applies `Out --clock_in--> In`.
///
/// Checks, in order: the worker is not already clocked in, the location is
/// a valid coordinate, and the location lies inside `perimeter`.
///
/// # Errors
///
/// - `AlreadyClockedIn` if `state` is `In`
/// - `InvalidLocation` if the coordinate is malformed
/// - `OutsidePerimeter` if the guard fails
///
/// # Returns
///
/// The new open [`ShiftRecord`], dated on the clock-in day.
pub fn clock_in(
    state: &ShiftState,
    perimeter: &Perimeter,
    event: ClockEvent,
) -> EngineResult<ShiftRecord> {
    if let Some(open) = state.open_shift() {
        return Err(EngineError::AlreadyClockedIn {
            worker_id: event.worker_id,
            shift_id: open.id.clone(),
        });
    }

    let location = event.location.validated()?;
    if let Err(err) = perimeter.ensure_contains(&location) {
        warn!(worker_id = %event.worker_id, error = %err, "Clock-in rejected by perimeter");
        return Err(err);
    }

    Ok(ShiftRecord {
        id: Uuid::new_v4().to_string(),
        worker_id: event.worker_id,
        date: event.at.date(),
        clock_in_time: event.at,
        clock_in_location: location,
        clock_in_note: normalize_note(event.note),
        clock_out: None,
    })
}

/// Applies `In --clock_out--> Out`.
///
/// Checks, in order: the worker has an open shift, the location is a valid
/// coordinate, the location lies inside `perimeter`, and the event time is
/// strictly after the shift's clock-in.
///
/// # Errors
///
/// - `NotClockedIn` if `state` is `Out`
/// - `InvalidLocation` if the coordinate is malformed
/// - `OutsidePerimeter` if the guard fails
/// - `InvalidTimestamp` if the event is not after clock-in
///
/// # Returns
///
/// The [`ClockOut`] that completes the open shift. Writing it is the
/// store's job ([`crate::shift::ShiftStore::complete_open_shift`]).
pub fn clock_out(
    state: &ShiftState,
    perimeter: &Perimeter,
    event: ClockEvent,
) -> EngineResult<ClockOut> {
    let Some(open) = state.open_shift() else {
        return Err(EngineError::NotClockedIn {
            worker_id: event.worker_id,
        });
    };

    let location = event.location.validated()?;
    if let Err(err) = perimeter.ensure_contains(&location) {
        warn!(worker_id = %event.worker_id, error = %err, "Clock-out rejected by perimeter");
        return Err(err);
    }

    let completion = ClockOut {
        time: event.at,
        location,
        note: normalize_note(event.note),
    };
    validate_completion(open, &completion)?;
    Ok(completion)
}

/// Checks that a record is fit to be appended as a new open shift.
///
/// # Errors
///
/// - `InvalidTimestamp` if the record already carries a clock-out that is
///   not after its clock-in
/// - `InvalidLocation` if the clock-in coordinate is malformed
pub fn validate_new_record(record: &ShiftRecord) -> EngineResult<()> {
    record.clock_in_location.validated()?;
    if let Some(out) = &record.clock_out {
        validate_completion(record, out)?;
    }
    Ok(())
}

/// Checks that `completion` may close `open`.
///
/// # Errors
///
/// - `InvalidTimestamp` if the clock-out time is not strictly after clock-in
/// - `InvalidLocation` if the clock-out coordinate is malformed
pub fn validate_completion(open: &ShiftRecord, completion: &ClockOut) -> EngineResult<()> {
    if completion.time <= open.clock_in_time {
        return Err(EngineError::InvalidTimestamp {
            shift_id: open.id.clone(),
            clock_in: open.clock_in_time,
            clock_out: completion.time,
        });
    }
    completion.location.validated()?;
    Ok(())
}
