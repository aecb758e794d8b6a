//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading the engine
//! configuration from a YAML file.

use std::fs;
use std::path::Path;

use crate::error::{EngineError, EngineResult};
use crate::geo::Perimeter;
use crate::service::ServiceSettings;

use super::types::EngineConfig;

/// Loads and provides access to the engine configuration.
///
/// The initial perimeter is validated at load time, so a loader that exists
/// always holds a usable perimeter.
///
/// # File Layout
///
/// ```yaml
/// server:
///   bind_address: "0.0.0.0:8080"
/// perimeter:
///   latitude: -33.8688
///   longitude: 151.2093
///   radius_meters: 150
/// timeouts:
///   store_millis: 2000
///   lock_millis: 2000
/// retry:
///   read_backoff_millis: 100
/// logging:
///   level: info
/// ```
///
/// # Example
///
/// ```no_run
/// use attendance_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/attendance.yaml")?;
/// println!("Perimeter radius: {}m", loader.perimeter().radius_meters());
/// # Ok::<(), attendance_engine::error::EngineError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: EngineConfig,
    perimeter: Perimeter,
}

impl ConfigLoader {
    /// Loads configuration from the YAML file at `path`.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - The file is missing (`ConfigNotFound`)
    /// - The file contains invalid YAML or lacks a required field (`ConfigParseError`)
    /// - The perimeter section is out of range (`InvalidPerimeter`)
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        Self::from_yaml_str(&content, &path_str)
    }

    /// Parses configuration from YAML text. `source` names the text in errors.
    pub fn from_yaml_str(content: &str, source: &str) -> EngineResult<Self> {
        let config: EngineConfig =
            serde_yaml::from_str(content).map_err(|e| EngineError::ConfigParseError {
                path: source.to_string(),
                message: e.to_string(),
            })?;
        let perimeter = config.perimeter.to_perimeter()?;

        Ok(Self { config, perimeter })
    }

    /// Returns the underlying configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Returns the validated initial perimeter.
    pub fn perimeter(&self) -> Perimeter {
        self.perimeter
    }

    /// Returns the service's timeout and retry settings.
    pub fn service_settings(&self) -> ServiceSettings {
        self.config.service_settings()
    }

    /// Returns the address the HTTP server binds to.
    pub fn bind_address(&self) -> &str {
        &self.config.server.bind_address
    }

    /// Returns the configured log level.
    pub fn log_level(&self) -> &str {
        &self.config.logging.level
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    const FULL: &str = r#"
server:
  bind_address: "127.0.0.1:9000"
perimeter:
  latitude: -33.8688
  longitude: 151.2093
  radius_meters: 150
timeouts:
  store_millis: 750
  lock_millis: 300
retry:
  read_backoff_millis: 25
logging:
  level: debug
"#;

    #[test]
    fn test_load_shipped_configuration() {
        let loader = ConfigLoader::load("./config/attendance.yaml").unwrap();
        assert!(loader.perimeter().radius_meters() > 0.0);
        assert_eq!(loader.log_level(), "info");
    }

    #[test]
    fn test_parse_full_configuration() {
        let loader = ConfigLoader::from_yaml_str(FULL, "inline").unwrap();

        assert_eq!(loader.bind_address(), "127.0.0.1:9000");
        assert_eq!(loader.perimeter().radius_meters(), 150.0);
        assert_eq!(loader.perimeter().center().latitude, -33.8688);
        assert_eq!(loader.log_level(), "debug");

        let settings = loader.service_settings();
        assert_eq!(settings.store_timeout, Duration::from_millis(750));
        assert_eq!(settings.lock_timeout, Duration::from_millis(300));
        assert_eq!(settings.read_retry_backoff, Duration::from_millis(25));
    }

    #[test]
    fn test_optional_sections_use_defaults() {
        let yaml = "perimeter:\n  latitude: 0\n  longitude: 0\n  radius_meters: 100\n";
        let loader = ConfigLoader::from_yaml_str(yaml, "inline").unwrap();

        assert_eq!(loader.bind_address(), "0.0.0.0:8080");
        assert_eq!(loader.log_level(), "info");
        assert_eq!(loader.service_settings(), ServiceSettings::default());
    }

    #[test]
    fn test_missing_perimeter_is_a_parse_error() {
        match ConfigLoader::from_yaml_str("server:\n  bind_address: x\n", "inline") {
            Err(EngineError::ConfigParseError { path, message }) => {
                assert_eq!(path, "inline");
                assert!(message.contains("perimeter"));
            }
            other => panic!("Expected ConfigParseError, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_perimeter_is_rejected() {
        let yaml = "perimeter:\n  latitude: 91\n  longitude: 0\n  radius_meters: 100\n";
        assert!(matches!(
            ConfigLoader::from_yaml_str(yaml, "inline"),
            Err(EngineError::InvalidPerimeter { .. })
        ));
    }

    #[test]
    fn test_load_missing_file_returns_error() {
        match ConfigLoader::load("./config/does-not-exist.yaml") {
            Err(EngineError::ConfigNotFound { path }) => {
                assert!(path.contains("does-not-exist.yaml"));
            }
            other => panic!("Expected ConfigNotFound, got {other:?}"),
        }
    }
}
