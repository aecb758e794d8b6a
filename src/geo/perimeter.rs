//! Circular perimeter (geofence) and containment checks.

use serde::Serialize;

use crate::error::{EngineError, EngineResult};

use super::Coordinate;

/// An administrator-defined circular boundary.
///
/// Construct through [`Perimeter::new`], which rejects non-positive radii and
/// out-of-range centers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Perimeter {
    center: Coordinate,
    radius_meters: f64,
}

impl Perimeter {
    /// Creates a validated perimeter.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPerimeter` when the radius is not a positive finite
    /// number, or the center latitude is outside [-90, 90] or longitude
    /// outside [-180, 180].
    ///
    /// # Examples
    ///
    /// ```
    /// use attendance_engine::geo::{Coordinate, Perimeter};
    ///
    /// assert!(Perimeter::new(Coordinate::new(0.0, 0.0), 100.0).is_ok());
    /// assert!(Perimeter::new(Coordinate::new(0.0, 0.0), 0.0).is_err());
    /// assert!(Perimeter::new(Coordinate::new(91.0, 0.0), 100.0).is_err());
    /// ```
    pub fn new(center: Coordinate, radius_meters: f64) -> EngineResult<Self> {
        if !radius_meters.is_finite() || radius_meters <= 0.0 {
            return Err(EngineError::InvalidPerimeter {
                message: format!("radius must be a positive number of meters, got {radius_meters}"),
            });
        }
        if !center.is_valid() {
            return Err(EngineError::InvalidPerimeter {
                message: format!(
                    "center ({}, {}) is outside the valid latitude/longitude range",
                    center.latitude, center.longitude
                ),
            });
        }
        Ok(Self {
            center,
            radius_meters,
        })
    }

    /// The perimeter's center.
    pub fn center(&self) -> Coordinate {
        self.center
    }

    /// The perimeter's radius in meters.
    pub fn radius_meters(&self) -> f64 {
        self.radius_meters
    }

    /// Great-circle distance from the center to `point`.
    pub fn distance_from_center(&self, point: &Coordinate) -> f64 {
        self.center.distance_meters(point)
    }

    /// Returns true iff `point` lies on or inside the boundary.
    pub fn contains(&self, point: &Coordinate) -> bool {
        self.distance_from_center(point) <= self.radius_meters
    }

    /// Checks that `point` lies within the perimeter.
    ///
    /// # Errors
    ///
    /// Returns `OutsidePerimeter` with the measured distance when it does not.
    pub fn ensure_contains(&self, point: &Coordinate) -> EngineResult<()> {
        let distance_meters = self.distance_from_center(point);
        if distance_meters <= self.radius_meters {
            Ok(())
        } else {
            Err(EngineError::OutsidePerimeter {
                distance_meters,
                radius_meters: self.radius_meters,
            })
        }
    }
}
