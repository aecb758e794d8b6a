//! Shift record model.
//!
//! A [`ShiftRecord`] is created by a successful clock-in and completed by a
//! clock-out. The clock-out side is a single optional [`ClockOut`] so that
//! its time, location and note are always present or absent together.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::geo::Coordinate;

/// The clock-out half of a shift.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClockOut {
    /// When the worker clocked out.
    pub time: NaiveDateTime,
    /// Where the worker clocked out.
    pub location: Coordinate,
    /// Optional note left at clock-out.
    #[serde(default)]
    pub note: Option<String>,
}

/// One clock-in/clock-out pair for a worker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShiftRecord {
    /// Unique identifier for the shift.
    pub id: String,
    /// The worker who owns the shift.
    pub worker_id: String,
    /// The shift date (the clock-in date).
    pub date: NaiveDate,
    /// When the worker clocked in.
    pub clock_in_time: NaiveDateTime,
    /// Where the worker clocked in.
    pub clock_in_location: Coordinate,
    /// Optional note left at clock-in.
    #[serde(default)]
    pub clock_in_note: Option<String>,
    /// The clock-out half, absent while the shift is open.
    #[serde(default)]
    pub clock_out: Option<ClockOut>,
}

impl ShiftRecord {
    /// Returns true if the shift has not been clocked out.
    pub fn is_open(&self) -> bool {
        self.clock_out.is_none()
    }

    /// Returns the clock-out time, if any.
    pub fn clock_out_time(&self) -> Option<NaiveDateTime> {
        self.clock_out.as_ref().map(|c| c.time)
    }

    /// Returns true if the clock-out time is strictly after the clock-in time.
    ///
    /// Open shifts are considered well-formed.
    pub fn is_well_formed(&self) -> bool {
        self.clock_out_time()
            .is_none_or(|out| out > self.clock_in_time)
    }

    /// Calculates the worked hours for a completed shift.
    ///
    /// Returns `None` for an open shift or a shift whose clock-out is not
    /// after its clock-in.
    ///
    /// # Examples
    ///
    /// ```
    /// use attendance_engine::geo::Coordinate;
    /// use attendance_engine::models::{ClockOut, ShiftRecord};
    /// use chrono::NaiveDate;
    /// use rust_decimal::Decimal;
    ///
    /// let day = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
    /// let site = Coordinate::new(-33.8688, 151.2093);
    /// let shift = ShiftRecord {
    ///     id: "s-1".to_string(),
    ///     worker_id: "w-1".to_string(),
    ///     date: day,
    ///     clock_in_time: day.and_hms_opt(9, 0, 0).unwrap(),
    ///     clock_in_location: site,
    ///     clock_in_note: None,
    ///     clock_out: Some(ClockOut {
    ///         time: day.and_hms_opt(17, 30, 0).unwrap(),
    ///         location: site,
    ///         note: None,
    ///     }),
    /// };
    /// assert_eq!(shift.worked_hours(), Some(Decimal::new(85, 1)));
    /// ```
    pub fn worked_hours(&self) -> Option<Decimal> {
        let out = self.clock_out_time()?;
        if out <= self.clock_in_time {
            return None;
        }
        let seconds = (out - self.clock_in_time).num_seconds();
        Some(Decimal::new(seconds, 0) / Decimal::new(3600, 0))
    }
}
