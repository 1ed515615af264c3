//! ReporterConfig - Config Loader output
//!
//! Describes a complete reporter setup: server endpoint, sampling profile,
//! simulated source parameters, metrics.

use serde::{Deserialize, Serialize};

use crate::SamplingProfile;

/// Configuration version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConfigVersion {
    #[default]
    V1,
}

/// Complete reporter configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReporterConfig {
    /// Configuration version
    #[serde(default)]
    pub version: ConfigVersion,

    /// Remote service settings
    pub server: ServerConfig,

    /// Initial sampling profile
    #[serde(default)]
    pub sampling: SamplingProfile,

    /// Simulated source parameters
    #[serde(default)]
    pub source: SourceConfig,

    /// Metrics exporter (optional)
    #[serde(default)]
    pub metrics: Option<MetricsConfig>,
}

/// Remote service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Report endpoint, e.g. "https://app.example.care/api/location/save/patient"
    pub endpoint: String,

    /// Per-request timeout (seconds)
    #[serde(default = "default_request_timeout_s")]
    pub request_timeout_s: u64,
}

fn default_request_timeout_s() -> u64 {
    15
}

/// Simulated walk parameters
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Walk origin latitude (degrees)
    pub start_lat: f64,

    /// Walk origin longitude (degrees)
    pub start_lng: f64,

    /// Walking speed (meters per second)
    #[serde(default = "default_speed_mps")]
    pub speed_mps: f64,
}

fn default_speed_mps() -> f64 {
    1.4
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            start_lat: 47.918,
            start_lng: 106.917,
            speed_mps: default_speed_mps(),
        }
    }
}

/// Metrics exporter settings
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// Prometheus listener port
    pub port: u16,
}
