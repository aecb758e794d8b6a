//! Weekly summary models.
//!
//! This module contains the [`WeeklySummary`] type produced by the
//! aggregation engine. Summaries are derived on read and never stored.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The inclusive date range a summary covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryPeriod {
    /// First day of the window.
    pub start: NaiveDate,
    /// Last day of the window (start + 6 days).
    pub end: NaiveDate,
}

/// Total completed hours for one worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerHours {
    /// The worker's identifier.
    pub worker_id: String,
    /// The worker's display name, or the identifier when unknown.
    pub name: String,
    /// Completed hours within the window.
    pub hours: Decimal,
}

/// Why a record was excluded from the totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditCode {
    /// Clock-out is not strictly after clock-in.
    ClockOutNotAfterClockIn,
    /// The shift overlaps an earlier shift for the same worker.
    OverlappingShift,
    /// The worker has more than one open shift.
    MultipleOpenShifts,
}

/// A record excluded from aggregation and flagged for review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditFlag {
    /// The offending shift.
    pub shift_id: String,
    /// The shift's worker.
    pub worker_id: String,
    /// The kind of defect.
    pub code: AuditCode,
    /// A human-readable description.
    pub message: String,
}

/// Aggregated attendance for a 7-day window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklySummary {
    /// The window covered.
    pub period: SummaryPeriod,
    /// Average hours per active worker, for each of the 7 days.
    pub average_hours_per_day: BTreeMap<NaiveDate, Decimal>,
    /// Completed hours per worker, ordered by worker id.
    pub total_hours_per_worker: Vec<WorkerHours>,
    /// Sum of all per-worker totals.
    pub total_week_hours: Decimal,
    /// Distinct workers with at least one record in the window.
    pub unique_users: usize,
    /// Records excluded from totals.
    #[serde(default)]
    pub audit_flags: Vec<AuditFlag>,
}

impl WeeklySummary {
    /// Returns the total hours for a worker, or zero if absent.
    pub fn hours_for(&self, worker_id: &str) -> Decimal {
        self.total_hours_per_worker
            .iter()
            .find(|w| w.worker_id == worker_id)
            .map(|w| w.hours)
            .unwrap_or(Decimal::ZERO)
    }

    /// Returns the average for a day, or zero if the day is outside the window.
    pub fn average_for(&self, date: NaiveDate) -> Decimal {
        self.average_hours_per_day
            .get(&date)
            .copied()
            .unwrap_or(Decimal::ZERO)
    }
}
