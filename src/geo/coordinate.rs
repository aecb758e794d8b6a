//! Geographic coordinates and great-circle distance.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Mean Earth radius in meters (IUGG).
pub const EARTH_RADIUS_METERS: f64 = 6_371_008.8;

/// A WGS-84 latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Latitude in degrees, within [-90, 90].
    pub latitude: f64,
    /// Longitude in degrees, within [-180, 180].
    pub longitude: f64,
}

impl Coordinate {
    /// Creates a coordinate without validating it.
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Returns true if both components are finite and within range.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }

    /// Validates a coordinate reported by a worker's device.
    ///
    /// # Errors
    ///
    /// Returns `InvalidLocation` if either component is non-finite or out of range.
    pub fn validated(self) -> EngineResult<Self> {
        if self.is_valid() {
            Ok(self)
        } else {
            Err(EngineError::InvalidLocation {
                message: format!(
                    "({}, {}) is not a valid latitude/longitude",
                    self.latitude, self.longitude
                ),
            })
        }
    }

    /// Great-circle distance to `other` in meters, using the haversine formula.
    ///
    /// # Examples
    ///
    /// ```
    /// use attendance_engine::geo::Coordinate;
    ///
    /// let origin = Coordinate::new(0.0, 0.0);
    /// let east = Coordinate::new(0.0, 0.002);
    /// let d = origin.distance_meters(&east);
    /// assert!((d - 222.39).abs() < 0.01);
    /// ```
    pub fn distance_meters(&self, other: &Coordinate) -> f64 {
        let lat1 = self.latitude.to_radians();
        let lat2 = other.latitude.to_radians();
        let d_lat = (other.latitude - self.latitude).to_radians();
        let d_lon = (other.longitude - self.longitude).to_radians();

        let h = (d_lat / 2.0).sin().powi(2)
            + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
        // Clamp guards asin against rounding just above 1.0 for antipodal points.
        let c = 2.0 * h.sqrt().min(1.0).asin();
        EARTH_RADIUS_METERS * c
    }
}
