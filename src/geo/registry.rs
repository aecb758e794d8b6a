//! Versioned, process-wide perimeter configuration.
//!
//! The registry holds exactly one active [`PerimeterVersion`]. Readers take a
//! cheap `Arc` snapshot, so a center/radius pair is never observed half
//! written. A replace installs a new version in one step.

use std::sync::{Arc, RwLock};

use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::info;

use super::Perimeter;

/// A perimeter together with its replacement metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerimeterVersion {
    /// Monotonically increasing version number, starting at 1.
    pub version: u64,
    /// The perimeter itself.
    pub perimeter: Perimeter,
    /// When this version was installed.
    pub updated_at: NaiveDateTime,
    /// Who installed this version (`None` for the configured initial value).
    pub updated_by: Option<String>,
}

/// Holds the single active perimeter.
#[derive(Debug)]
pub struct PerimeterRegistry {
    current: RwLock<Arc<PerimeterVersion>>,
}

impl PerimeterRegistry {
    /// Creates a registry with an initial perimeter at version 1.
    pub fn new(initial: Perimeter, installed_at: NaiveDateTime) -> Self {
        Self {
            current: RwLock::new(Arc::new(PerimeterVersion {
                version: 1,
                perimeter: initial,
                updated_at: installed_at,
                updated_by: None,
            })),
        }
    }

    /// Returns a snapshot of the active perimeter version.
    pub fn current(&self) -> Arc<PerimeterVersion> {
        // A poisoned lock still holds a complete Arc; the swap never panics midway.
        match self.current.read() {
            Ok(guard) => Arc::clone(&*guard),
            Err(poisoned) => Arc::clone(&*poisoned.into_inner()),
        }
    }

    /// Replaces the active perimeter, discarding the previous value.
    pub fn replace(
        &self,
        perimeter: Perimeter,
        updated_at: NaiveDateTime,
        updated_by: &str,
    ) -> Arc<PerimeterVersion> {
        let mut guard = match self.current.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let next = Arc::new(PerimeterVersion {
            version: guard.version + 1,
            perimeter,
            updated_at,
            updated_by: Some(updated_by.to_string()),
        });
        *guard = Arc::clone(&next);

        info!(
            version = next.version,
            latitude = perimeter.center().latitude,
            longitude = perimeter.center().longitude,
            radius_meters = perimeter.radius_meters(),
            updated_by = %updated_by,
            "Perimeter replaced"
        );
        next
    }
}
