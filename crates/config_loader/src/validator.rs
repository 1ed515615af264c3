//! Config validation
//!
//! Rules:
//! - server.endpoint is an absolute http(s) URL
//! - server.request_timeout_s > 0
//! - sampling profile is internally consistent
//! - source coordinates are within valid ranges, speed_mps > 0
//! - metrics.port != 0 when metrics is enabled

use contracts::{EngineError, ReporterConfig};
use url::Url;

/// Validate a ReporterConfig
///
/// Returns the first error encountered, or Ok(()).
pub fn validate(config: &ReporterConfig) -> Result<(), EngineError> {
    validate_server(config)?;
    config.sampling.validate()?;
    validate_source(config)?;
    validate_metrics(config)?;
    Ok(())
}

fn validate_server(config: &ReporterConfig) -> Result<(), EngineError> {
    let url = Url::parse(&config.server.endpoint).map_err(|e| {
        EngineError::config_validation("server.endpoint", format!("invalid URL: {e}"))
    })?;

    match url.scheme() {
        "http" | "https" => {}
        other => {
            return Err(EngineError::config_validation(
                "server.endpoint",
                format!("unsupported scheme '{other}', expected http or https"),
            ));
        }
    }

    if config.server.request_timeout_s == 0 {
        return Err(EngineError::config_validation(
            "server.request_timeout_s",
            "request timeout must be > 0",
        ));
    }

    Ok(())
}

fn validate_source(config: &ReporterConfig) -> Result<(), EngineError> {
    let source = &config.source;

    if !(-90.0..=90.0).contains(&source.start_lat) {
        return Err(EngineError::config_validation(
            "source.start_lat",
            format!("latitude must be in [-90, 90], got {}", source.start_lat),
        ));
    }
    if !(-180.0..=180.0).contains(&source.start_lng) {
        return Err(EngineError::config_validation(
            "source.start_lng",
            format!("longitude must be in [-180, 180], got {}", source.start_lng),
        ));
    }
    if source.speed_mps <= 0.0 || !source.speed_mps.is_finite() {
        return Err(EngineError::config_validation(
            "source.speed_mps",
            format!("speed must be > 0, got {}", source.speed_mps),
        ));
    }

    Ok(())
}

fn validate_metrics(config: &ReporterConfig) -> Result<(), EngineError> {
    if let Some(metrics) = &config.metrics {
        if metrics.port == 0 {
            return Err(EngineError::config_validation(
                "metrics.port",
                "port cannot be 0",
            ));
        }
    }
    Ok(())
}
