//! Configuration loading and management for the attendance engine.
//!
//! This module loads the engine configuration from a YAML file: the HTTP
//! bind address, the initial perimeter, collaborator timeouts, the read
//! retry policy and the log level.
//!
//! # Example
//!
//! ```no_run
//! use attendance_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/attendance.yaml").unwrap();
//! println!("Listening on {}", config.bind_address());
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    EngineConfig, LoggingConfig, PerimeterConfig, RetryConfig, ServerConfig, TimeoutConfig,
};
