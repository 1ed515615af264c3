//! # Config Loader
//!
//! Configuration loading and parsing module.
//!
//! Responsibilities:
//! - Parse TOML/JSON configuration files
//! - Validate configuration legality
//! - Produce `ReporterConfig`
//!
//! # Example
//!
//! ```no_run
//! use config_loader::ConfigLoader;
//! use std::path::Path;
//!
//! let config = ConfigLoader::load_from_path(Path::new("config.toml")).unwrap();
//! println!("Endpoint: {}", config.server.endpoint);
//! ```

mod parser;
mod validator;

pub use contracts::ReporterConfig;
pub use parser::ConfigFormat;

use contracts::EngineError;
use std::path::Path;

/// Configuration loader
///
/// Provides static methods to load configuration from files or strings.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from file path
    ///
    /// Automatically detects format from file extension (.toml / .json).
    ///
    /// # Errors
    /// - File read failure
    /// - Unsupported format
    /// - Parse failure
    /// - Validation failure
    pub fn load_from_path(path: &Path) -> Result<ReporterConfig, EngineError> {
        let format = Self::detect_format(path)?;
        let content = Self::read_file(path)?;
        Self::load_from_str(&content, format)
    }

    /// Load configuration from string
    ///
    /// # Errors
    /// - Parse failure
    /// - Validation failure
    pub fn load_from_str(
        content: &str,
        format: ConfigFormat,
    ) -> Result<ReporterConfig, EngineError> {
        Self::parse_and_validate(content, format)
    }

    /// Serialize ReporterConfig to TOML string
    pub fn to_toml(config: &ReporterConfig) -> Result<String, EngineError> {
        toml::to_string_pretty(config)
            .map_err(|e| EngineError::config_parse(format!("TOML serialize error: {e}")))
    }

    /// Serialize ReporterConfig to JSON string
    pub fn to_json(config: &ReporterConfig) -> Result<String, EngineError> {
        serde_json::to_string_pretty(config)
            .map_err(|e| EngineError::config_parse(format!("JSON serialize error: {e}")))
    }
}

impl ConfigLoader {
    /// Infer configuration format from file extension
    fn detect_format(path: &Path) -> Result<ConfigFormat, EngineError> {
        let ext = path.extension().and_then(|e| e.to_str()).ok_or_else(|| {
            EngineError::config_parse("cannot determine file format from extension")
        })?;

        ConfigFormat::from_extension(ext)
            .ok_or_else(|| EngineError::config_parse(format!("unsupported config format: .{ext}")))
    }

    /// Read configuration file content
    fn read_file(path: &Path) -> Result<String, EngineError> {
        Ok(std::fs::read_to_string(path)?)
    }

    /// Parse and validate configuration content
    fn parse_and_validate(
        content: &str,
        format: ConfigFormat,
    ) -> Result<ReporterConfig, EngineError> {
        let config = parser::parse(content, format)?;
        validator::validate(&config)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL_TOML: &str = r#"
[server]
endpoint = "https://app.example.care/api/location/save/patient"

[sampling]
min_interval_ms = 5000
max_interval_ms = 10000
min_displacement_m = 10.0

[source]
start_lat = 47.918
start_lng = 106.917
"#;

    #[test]
    fn test_load_from_str_toml() {
        let result = ConfigLoader::load_from_str(MINIMAL_TOML, ConfigFormat::Toml);
        assert!(result.is_ok(), "Failed: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.sampling.min_displacement_m, 10.0);
        assert_eq!(config.source.speed_mps, 1.4);
    }

    #[test]
    fn test_round_trip_toml() {
        let config = ConfigLoader::load_from_str(MINIMAL_TOML, ConfigFormat::Toml).unwrap();
        let serialized = ConfigLoader::to_toml(&config).unwrap();
        let config2 = ConfigLoader::load_from_str(&serialized, ConfigFormat::Toml).unwrap();
        assert_eq!(config.server.endpoint, config2.server.endpoint);
        assert_eq!(
            config.sampling.min_displacement_m,
            config2.sampling.min_displacement_m
        );
    }

    #[test]
    fn test_round_trip_json() {
        let config = ConfigLoader::load_from_str(MINIMAL_TOML, ConfigFormat::Toml).unwrap();
        let json = ConfigLoader::to_json(&config).unwrap();
        let config2 = ConfigLoader::load_from_str(&json, ConfigFormat::Json).unwrap();
        assert_eq!(config.server.endpoint, config2.server.endpoint);
    }

    #[test]
    fn test_validation_runs_after_parse() {
        // Inverted interval bounds should fail validation, not parsing
        let content = r#"
[server]
endpoint = "https://example.test/report"

[sampling]
min_interval_ms = 10000
max_interval_ms = 5000
"#;
        let result = ConfigLoader::load_from_str(content, ConfigFormat::Toml);
        assert!(result.is_err());
        assert!(matches!(
            result.unwrap_err(),
            EngineError::ConfigValidation { .. }
        ));
    }
}
