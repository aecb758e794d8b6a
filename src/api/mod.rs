//! HTTP API module for the attendance engine.
//!
//! This module provides the REST endpoints for clocking in and out,
//! shift history, weekly summaries, perimeter management and the worker
//! registry.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::{create_router, WORKER_ID_HEADER, WORKER_ROLE_HEADER};
pub use request::{ClockRequest, PerimeterRequest, RegisterWorkerRequest, SummaryQuery};
pub use response::{ApiError, HealthResponse};
pub use state::AppState;
