//! HTTP request handlers for the attendance API.
//!
//! This module contains the handler functions for all API endpoints. Every
//! request gets a correlation id that is attached to its log lines.

use std::time::Instant;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::EngineError;
use crate::models::Role;
use crate::service::Caller;

use super::request::{ClockRequest, PerimeterRequest, RegisterWorkerRequest, SummaryQuery};
use super::response::{ApiError, ApiErrorResponse, HealthResponse};
use super::state::AppState;

/// Header carrying the caller's worker id, set by the identity gateway.
pub const WORKER_ID_HEADER: &str = "x-worker-id";
/// Header carrying the caller's role, set by the identity gateway.
pub const WORKER_ROLE_HEADER: &str = "x-worker-role";

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/clock-in", post(clock_in_handler))
        .route("/clock-out", post(clock_out_handler))
        .route("/workers", get(list_workers_handler).post(register_worker_handler))
        .route("/workers/:worker_id/shifts", get(history_handler))
        .route("/shifts/today", get(shifts_today_handler))
        .route("/summary/weekly", get(weekly_summary_handler))
        .route("/perimeter", get(get_perimeter_handler).put(set_perimeter_handler))
        .route("/health", get(health_handler))
        .with_state(state)
}

/// Handler for POST /clock-in.
async fn clock_in_handler(
    State(state): State<AppState>,
    payload: Result<Json<ClockRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing clock-in request");

    let request = match parse_clock_request(correlation_id, payload) {
        Ok(request) => request,
        Err(response) => return response,
    };

    let start_time = Instant::now();
    let location = request.location();
    match state
        .service()
        .clock_in(&request.worker_id, location, request.note)
        .await
    {
        Ok(record) => {
            info!(
                correlation_id = %correlation_id,
                worker_id = %record.worker_id,
                shift_id = %record.id,
                duration_us = start_time.elapsed().as_micros(),
                "Clock-in accepted"
            );
            json_response(StatusCode::CREATED, record)
        }
        Err(err) => engine_error(correlation_id, "clock-in", err),
    }
}

/// Handler for POST /clock-out.
async fn clock_out_handler(
    State(state): State<AppState>,
    payload: Result<Json<ClockRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing clock-out request");

    let request = match parse_clock_request(correlation_id, payload) {
        Ok(request) => request,
        Err(response) => return response,
    };

    let start_time = Instant::now();
    let location = request.location();
    match state
        .service()
        .clock_out(&request.worker_id, location, request.note)
        .await
    {
        Ok(record) => {
            info!(
                correlation_id = %correlation_id,
                worker_id = %record.worker_id,
                shift_id = %record.id,
                duration_us = start_time.elapsed().as_micros(),
                "Clock-out accepted"
            );
            json_response(StatusCode::OK, record)
        }
        Err(err) => engine_error(correlation_id, "clock-out", err),
    }
}

/// Handler for GET /workers/:worker_id/shifts.
async fn history_handler(
    State(state): State<AppState>,
    Path(worker_id): Path<String>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    match state.service().history(&worker_id).await {
        Ok(records) => {
            info!(
                correlation_id = %correlation_id,
                worker_id = %worker_id,
                shifts = records.len(),
                "History served"
            );
            json_response(StatusCode::OK, records)
        }
        Err(err) => engine_error(correlation_id, "history", err),
    }
}

/// Handler for GET /shifts/today.
async fn shifts_today_handler(State(state): State<AppState>) -> Response {
    let correlation_id = Uuid::new_v4();
    match state.service().shifts_today().await {
        Ok(records) => json_response(StatusCode::OK, records),
        Err(err) => engine_error(correlation_id, "shifts-today", err),
    }
}

/// Handler for GET /summary/weekly.
async fn weekly_summary_handler(
    State(state): State<AppState>,
    query: Result<Query<SummaryQuery>, QueryRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing weekly summary request");

    let query = match query {
        Ok(Query(query)) => query,
        Err(rejection) => {
            warn!(
                correlation_id = %correlation_id,
                error = %rejection.body_text(),
                "Invalid summary query"
            );
            return json_response(
                StatusCode::BAD_REQUEST,
                ApiError::validation_error(rejection.body_text()),
            );
        }
    };

    match state.service().weekly_summary(query.start).await {
        Ok(summary) => json_response(StatusCode::OK, summary),
        Err(err) => engine_error(correlation_id, "weekly-summary", err),
    }
}

/// Handler for GET /perimeter.
async fn get_perimeter_handler(State(state): State<AppState>) -> Response {
    json_response(StatusCode::OK, &*state.service().current_perimeter())
}

/// Handler for PUT /perimeter. Manager only.
async fn set_perimeter_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<PerimeterRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing perimeter update");

    let caller = match caller_from_headers(&headers) {
        Ok(caller) => caller,
        Err(error) => {
            warn!(correlation_id = %correlation_id, "Perimeter update without identity");
            return json_response(StatusCode::UNAUTHORIZED, error);
        }
    };
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return json_rejection(correlation_id, rejection),
    };

    match state
        .service()
        .set_perimeter(&caller, request.center(), request.radius_meters)
    {
        Ok(version) => json_response(StatusCode::OK, &*version),
        Err(err) => engine_error(correlation_id, "set-perimeter", err),
    }
}

/// Handler for POST /workers. Manager only.
async fn register_worker_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<RegisterWorkerRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let caller = match caller_from_headers(&headers) {
        Ok(caller) => caller,
        Err(error) => {
            warn!(correlation_id = %correlation_id, "Worker registration without identity");
            return json_response(StatusCode::UNAUTHORIZED, error);
        }
    };
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return json_rejection(correlation_id, rejection),
    };

    match state
        .service()
        .register_worker(&caller, &request.name, request.role)
        .await
    {
        Ok(worker) => json_response(StatusCode::CREATED, worker),
        Err(err) => engine_error(correlation_id, "register-worker", err),
    }
}

/// Handler for GET /workers.
async fn list_workers_handler(State(state): State<AppState>) -> Response {
    let correlation_id = Uuid::new_v4();
    match state.service().workers().await {
        Ok(workers) => json_response(StatusCode::OK, workers),
        Err(err) => engine_error(correlation_id, "list-workers", err),
    }
}

/// Handler for GET /health.
async fn health_handler(State(state): State<AppState>) -> Response {
    json_response(
        StatusCode::OK,
        HealthResponse {
            status: "ok".to_string(),
            perimeter_version: state.service().current_perimeter().version,
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
        },
    )
}

/// Unwraps a clock request body, rejecting blank worker ids.
fn parse_clock_request(
    correlation_id: Uuid,
    payload: Result<Json<ClockRequest>, JsonRejection>,
) -> Result<ClockRequest, Response> {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return Err(json_rejection(correlation_id, rejection)),
    };
    if request.worker_id.trim().is_empty() {
        warn!(correlation_id = %correlation_id, "Clock request without worker id");
        return Err(json_response(
            StatusCode::BAD_REQUEST,
            ApiError::validation_error("worker_id must not be blank"),
        ));
    }
    Ok(request)
}

/// Reads the caller's identity from the gateway headers.
fn caller_from_headers(headers: &HeaderMap) -> Result<Caller, ApiError> {
    let worker_id = headers
        .get(WORKER_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| ApiError::missing_identity(WORKER_ID_HEADER))?;
    let role = headers
        .get(WORKER_ROLE_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(Role::parse)
        .ok_or_else(|| ApiError::missing_identity(WORKER_ROLE_HEADER))?;

    Ok(Caller::new(worker_id, role))
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

fn engine_error(correlation_id: Uuid, operation: &str, err: EngineError) -> Response {
    warn!(
        correlation_id = %correlation_id,
        operation,
        kind = ?err.kind(),
        error = %err,
        "Request failed"
    );
    let api_error: ApiErrorResponse = err.into();
    json_response(api_error.status, api_error.error)
}

fn json_rejection(correlation_id: Uuid, rejection: JsonRejection) -> Response {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            // The body text carries serde's detailed message
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") || body_text.contains("unknown variant") {
                ApiError::validation_error(body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    json_response(StatusCode::BAD_REQUEST, error)
}
