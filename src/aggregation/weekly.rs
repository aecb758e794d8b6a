//! Weekly attendance aggregation.
//!
//! Turns the raw shift records of a [`SummaryWindow`] into a
//! [`WeeklySummary`]: per-day average hours, per-worker totals, the week
//! total and the count of distinct active workers.
//!
//! Records that break the shift invariants (clock-out not after clock-in,
//! overlapping shifts, several open shifts for one worker) are excluded from
//! every hour figure and reported in `audit_flags`. Their workers still count
//! as active.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use tracing::warn;

use crate::models::{AuditCode, AuditFlag, ShiftRecord, WeeklySummary, WorkerHours};

use super::SummaryWindow;

/// Decimal places used for reported hours.
pub const HOURS_DECIMAL_PLACES: u32 = 2;

#[derive(Default)]
struct DayTotals {
    hours: Decimal,
    workers: BTreeSet<String>,
}

/// Splits a worker's records into accepted ones and audit flags.
///
/// `records` must belong to one worker and be sorted by clock-in time.
fn screen_worker_records<'a>(
    records: &[&'a ShiftRecord],
    flags: &mut Vec<AuditFlag>,
) -> Vec<&'a ShiftRecord> {
    let mut accepted = Vec::with_capacity(records.len());
    // End of the last accepted shift; `None` inside an accepted open shift.
    let mut busy_until: Option<Option<NaiveDateTime>> = None;

    for &record in records {
        if !record.is_well_formed() {
            flags.push(AuditFlag {
                shift_id: record.id.clone(),
                worker_id: record.worker_id.clone(),
                code: AuditCode::ClockOutNotAfterClockIn,
                message: format!(
                    "clock-out {} is not after clock-in {}",
                    record
                        .clock_out_time()
                        .map(|t| t.to_string())
                        .unwrap_or_default(),
                    record.clock_in_time
                ),
            });
            continue;
        }

        match busy_until {
            Some(None) => {
                let code = if record.is_open() {
                    AuditCode::MultipleOpenShifts
                } else {
                    AuditCode::OverlappingShift
                };
                flags.push(AuditFlag {
                    shift_id: record.id.clone(),
                    worker_id: record.worker_id.clone(),
                    code,
                    message: "starts while an earlier shift is still open".to_string(),
                });
                continue;
            }
            Some(Some(end)) if record.clock_in_time < end => {
                flags.push(AuditFlag {
                    shift_id: record.id.clone(),
                    worker_id: record.worker_id.clone(),
                    code: AuditCode::OverlappingShift,
                    message: format!(
                        "starts at {} before the previous shift ended at {}",
                        record.clock_in_time, end
                    ),
                });
                continue;
            }
            _ => {}
        }

        busy_until = Some(record.clock_out_time());
        accepted.push(record);
    }

    accepted
}

/// Builds the weekly summary for `window` from `records`.
///
/// Records dated outside the window are ignored. `names` maps worker ids
/// to display names; workers missing from it are labelled with their id.
///
/// # Examples
///
/// ```
/// use std::collections::HashMap;
/// use attendance_engine::aggregation::{summarize, SummaryWindow};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let window = SummaryWindow::starting(NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()).unwrap();
/// let summary = summarize(&window, &[], &HashMap::new());
/// assert_eq!(summary.total_week_hours, Decimal::ZERO);
/// assert_eq!(summary.unique_users, 0);
/// assert_eq!(summary.average_hours_per_day.len(), 7);
/// ```
pub fn summarize(
    window: &SummaryWindow,
    records: &[ShiftRecord],
    names: &HashMap<String, String>,
) -> WeeklySummary {
    let mut by_worker: BTreeMap<&str, Vec<&ShiftRecord>> = BTreeMap::new();
    for record in records.iter().filter(|r| window.contains(r.date)) {
        by_worker.entry(record.worker_id.as_str()).or_default().push(record);
    }

    let unique_users = by_worker.len();
    let mut flags = Vec::new();
    let mut days: BTreeMap<NaiveDate, DayTotals> = window
        .days()
        .map(|day| (day, DayTotals::default()))
        .collect();
    let mut total_hours_per_worker = Vec::with_capacity(by_worker.len());

    for (worker_id, mut worker_records) in by_worker {
        worker_records.sort_by(|a, b| {
            a.clock_in_time
                .cmp(&b.clock_in_time)
                .then_with(|| a.id.cmp(&b.id))
        });

        let accepted = screen_worker_records(&worker_records, &mut flags);
        if accepted.is_empty() {
            continue;
        }

        let mut worker_total = Decimal::ZERO;
        for record in accepted {
            let hours = record.worked_hours().unwrap_or(Decimal::ZERO);
            worker_total += hours;
            if let Some(day) = days.get_mut(&record.date) {
                day.hours += hours;
                day.workers.insert(worker_id.to_string());
            }
        }

        total_hours_per_worker.push(WorkerHours {
            worker_id: worker_id.to_string(),
            name: names
                .get(worker_id)
                .cloned()
                .unwrap_or_else(|| worker_id.to_string()),
            hours: worker_total.round_dp(HOURS_DECIMAL_PLACES),
        });
    }

    for flag in &flags {
        warn!(
            shift_id = %flag.shift_id,
            worker_id = %flag.worker_id,
            code = ?flag.code,
            "Shift excluded from weekly totals"
        );
    }

    let average_hours_per_day = days
        .into_iter()
        .map(|(day, totals)| {
            let average = if totals.workers.is_empty() {
                Decimal::ZERO
            } else {
                (totals.hours / Decimal::from(totals.workers.len()))
                    .round_dp(HOURS_DECIMAL_PLACES)
            };
            (day, average)
        })
        .collect();

    let total_week_hours: Decimal = total_hours_per_worker.iter().map(|w| w.hours).sum();

    WeeklySummary {
        period: window.period(),
        average_hours_per_day,
        total_hours_per_worker,
        total_week_hours,
        unique_users,
        audit_flags: flags,
    }
}
