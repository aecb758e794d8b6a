//! Request types for the attendance API.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::geo::Coordinate;
use crate::models::Role;

/// Request body for `POST /clock-in` and `POST /clock-out`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClockRequest {
    /// The worker clocking in or out.
    pub worker_id: String,
    /// Optional free-text note.
    #[serde(default)]
    pub note: Option<String>,
    /// Device latitude in degrees.
    pub lat: f64,
    /// Device longitude in degrees.
    pub lng: f64,
}

impl ClockRequest {
    /// The reported device location.
    pub fn location(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lng)
    }
}

/// Request body for `PUT /perimeter`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerimeterRequest {
    /// Center latitude in degrees.
    pub latitude: f64,
    /// Center longitude in degrees.
    pub longitude: f64,
    /// Radius in meters.
    pub radius_meters: f64,
}

impl PerimeterRequest {
    /// The requested center.
    pub fn center(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }
}

/// Request body for `POST /workers`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterWorkerRequest {
    /// Display name.
    pub name: String,
    /// The worker's role.
    pub role: Role,
}

/// Query string of `GET /summary/weekly`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SummaryQuery {
    /// First day of the window; defaults to the previous week's Monday.
    #[serde(default)]
    pub start: Option<NaiveDate>,
}
