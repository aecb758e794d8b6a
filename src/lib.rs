//! Geofenced Attendance Engine
//!
//! This crate records care worker clock-in and clock-out events, accepts
//! them only when the reported location lies inside a manager-configured
//! circular perimeter, enforces at most one open shift per worker, and
//! computes weekly attendance summaries from the recorded shifts.
//!
//! The [`service::AttendanceService`] façade ties the pieces together and
//! [`api::create_router`] exposes it over HTTP.

#![warn(missing_docs)]

pub mod aggregation;
pub mod api;
pub mod config;
pub mod error;
pub mod geo;
pub mod models;
pub mod service;
pub mod shift;
