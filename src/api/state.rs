//! Application state for the attendance API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use crate::config::ConfigLoader;
use crate::service::{AttendanceService, InMemoryWorkerDirectory, SystemClock};
use crate::shift::InMemoryShiftStore;

/// Shared application state.
///
/// Wraps the attendance service so every handler sees the same store,
/// perimeter registry and worker locks.
#[derive(Clone)]
pub struct AppState {
    service: Arc<AttendanceService>,
}

impl AppState {
    /// Creates a new application state around an existing service.
    pub fn new(service: AttendanceService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }

    /// Builds an in-memory service on the system clock from configuration.
    pub fn from_config(config: &ConfigLoader) -> Self {
        Self::new(AttendanceService::new(
            Arc::new(InMemoryShiftStore::new()),
            Arc::new(InMemoryWorkerDirectory::new()),
            config.perimeter(),
            Arc::new(SystemClock),
            config.service_settings(),
        ))
    }

    /// Returns the attendance service.
    pub fn service(&self) -> &AttendanceService {
        &self.service
    }
}
