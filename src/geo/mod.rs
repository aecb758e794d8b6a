//! Geofencing for clock events.
//!
//! This module provides coordinates with haversine distance, the circular
//! [`Perimeter`] used to guard clock-in and clock-out, and the
//! [`PerimeterRegistry`] that holds the single active perimeter.

mod coordinate;
mod perimeter;
mod registry;

pub use coordinate::{Coordinate, EARTH_RADIUS_METERS};
pub use perimeter::Perimeter;
pub use registry::{PerimeterRegistry, PerimeterVersion};
