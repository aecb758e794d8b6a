//! Core data models for the attendance engine.
//!
//! This module contains the domain models shared by the state machine,
//! the store, the aggregation engine and the API.

mod shift_record;
mod weekly_summary;
mod worker;

pub use shift_record::{ClockOut, ShiftRecord};
pub use weekly_summary::{AuditCode, AuditFlag, SummaryPeriod, WeeklySummary, WorkerHours};
pub use worker::{Role, Worker};
