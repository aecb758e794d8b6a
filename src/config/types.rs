//! Configuration types for the attendance engine.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from the YAML configuration file. Every section except
//! `perimeter` has defaults.

use std::time::Duration;

use serde::Deserialize;

use crate::error::EngineResult;
use crate::geo::{Coordinate, Perimeter};
use crate::service::ServiceSettings;

/// The full engine configuration file.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// The perimeter installed at startup.
    pub perimeter: PerimeterConfig,
    /// Collaborator timeouts.
    #[serde(default)]
    pub timeouts: TimeoutConfig,
    /// Read retry policy.
    #[serde(default)]
    pub retry: RetryConfig,
    /// Log output settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl EngineConfig {
    /// The service's timeout and retry settings.
    pub fn service_settings(&self) -> ServiceSettings {
        ServiceSettings {
            store_timeout: Duration::from_millis(self.timeouts.store_millis),
            lock_timeout: Duration::from_millis(self.timeouts.lock_millis),
            read_retry_backoff: Duration::from_millis(self.retry.read_backoff_millis),
        }
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Address the API listens on (e.g., "0.0.0.0:8080").
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
        }
    }
}

fn default_bind_address() -> String {
    "0.0.0.0:8080".to_string()
}

/// The initial perimeter.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PerimeterConfig {
    /// Center latitude in degrees.
    pub latitude: f64,
    /// Center longitude in degrees.
    pub longitude: f64,
    /// Radius in meters.
    pub radius_meters: f64,
}

impl PerimeterConfig {
    /// Builds the perimeter, applying the same checks as a manager update.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPerimeter` if the center or radius is invalid.
    pub fn to_perimeter(&self) -> EngineResult<Perimeter> {
        Perimeter::new(
            Coordinate::new(self.latitude, self.longitude),
            self.radius_meters,
        )
    }
}

/// Upper bounds on collaborator calls, in milliseconds.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct TimeoutConfig {
    /// Each shift store call.
    #[serde(default = "default_timeout_millis")]
    pub store_millis: u64,
    /// Waiting for a worker's transition lock.
    #[serde(default = "default_timeout_millis")]
    pub lock_millis: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            store_millis: default_timeout_millis(),
            lock_millis: default_timeout_millis(),
        }
    }
}

fn default_timeout_millis() -> u64 {
    2_000
}

/// Retry policy for idempotent reads.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct RetryConfig {
    /// Pause before the single retry.
    #[serde(default = "default_backoff_millis")]
    pub read_backoff_millis: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            read_backoff_millis: default_backoff_millis(),
        }
    }
}

fn default_backoff_millis() -> u64 {
    100
}

/// Log output settings.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Maximum level emitted (`error`, `warn`, `info`, `debug`, `trace`).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
