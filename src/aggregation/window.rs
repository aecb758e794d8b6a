//! Seven-day summary windows.

use chrono::{Datelike, Days, NaiveDate};

use crate::error::{EngineError, EngineResult};
use crate::models::SummaryPeriod;

/// Number of calendar days in a summary window.
pub const WINDOW_DAYS: u64 = 7;

/// Seven consecutive calendar days starting at `start`.
///
/// Both ends are representable dates; windows that would run past the
/// calendar are rejected on construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SummaryWindow {
    start: NaiveDate,
    end: NaiveDate,
}

impl SummaryWindow {
    /// Creates the window `start ..= start + 6 days`.
    pub fn starting(start: NaiveDate) -> EngineResult<Self> {
        let end = start
            .checked_add_days(Days::new(WINDOW_DAYS - 1))
            .ok_or_else(|| EngineError::InvalidWindow {
                message: format!("a window starting {start} runs past the last representable date"),
            })?;
        Ok(Self { start, end })
    }

    /// The window for the week before the week containing `today`.
    ///
    /// Weeks start on Monday.
    ///
    /// # Examples
    ///
    /// ```
    /// use attendance_engine::aggregation::SummaryWindow;
    /// use chrono::NaiveDate;
    ///
    /// // Wednesday 2026-03-11 -> Monday 2026-03-02 .. Sunday 2026-03-08
    /// let window = SummaryWindow::previous_week(NaiveDate::from_ymd_opt(2026, 3, 11).unwrap()).unwrap();
    /// assert_eq!(window.start(), NaiveDate::from_ymd_opt(2026, 3, 2).unwrap());
    /// assert_eq!(window.end(), NaiveDate::from_ymd_opt(2026, 3, 8).unwrap());
    /// ```
    pub fn previous_week(today: NaiveDate) -> EngineResult<Self> {
        let since_monday = u64::from(today.weekday().num_days_from_monday());
        let start = today
            .checked_sub_days(Days::new(since_monday + WINDOW_DAYS))
            .ok_or_else(|| EngineError::InvalidWindow {
                message: format!("no complete week precedes {today}"),
            })?;
        Self::starting(start)
    }

    /// First day of the window.
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// Last day of the window.
    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Returns true if `date` falls within the window (inclusive).
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// The seven days of the window in order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        self.start.iter_days().take_while(move |day| *day <= end)
    }

    /// The window as a serializable period.
    pub fn period(&self) -> SummaryPeriod {
        SummaryPeriod {
            start: self.start,
            end: self.end,
        }
    }
}
