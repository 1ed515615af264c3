//! SamplingProfile - position request parameters
//!
//! Owned by the adaptation controller; position sources hold a read-only
//! snapshot applied at (re)subscription time. Changing the displacement
//! threshold requires an explicit unsubscribe+subscribe, mirroring platform
//! location APIs that cannot hot-swap filter parameters on a live request.

use serde::{Deserialize, Serialize};

use crate::EngineError;

/// Sampling request profile
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SamplingProfile {
    /// Fastest accepted update interval (milliseconds)
    #[serde(default = "default_min_interval_ms")]
    pub min_interval_ms: u64,

    /// Target update interval (milliseconds)
    #[serde(default = "default_max_interval_ms")]
    pub max_interval_ms: u64,

    /// Minimum movement before a new fix is significant (meters)
    #[serde(default = "default_min_displacement_m")]
    pub min_displacement_m: f64,
}

fn default_min_interval_ms() -> u64 {
    5_000
}

fn default_max_interval_ms() -> u64 {
    10_000
}

fn default_min_displacement_m() -> f64 {
    10.0
}

impl Default for SamplingProfile {
    fn default() -> Self {
        Self {
            min_interval_ms: default_min_interval_ms(),
            max_interval_ms: default_max_interval_ms(),
            min_displacement_m: default_min_displacement_m(),
        }
    }
}

impl SamplingProfile {
    /// Validate profile invariants
    ///
    /// # Errors
    /// - `min_displacement_m` negative or non-finite
    /// - `min_interval_ms` zero or above `max_interval_ms`
    pub fn validate(&self) -> Result<(), EngineError> {
        if !self.min_displacement_m.is_finite() || self.min_displacement_m < 0.0 {
            return Err(EngineError::config_validation(
                "sampling.min_displacement_m",
                format!("must be >= 0 and finite, got {}", self.min_displacement_m),
            ));
        }
        if self.min_interval_ms == 0 {
            return Err(EngineError::config_validation(
                "sampling.min_interval_ms",
                "must be > 0",
            ));
        }
        if self.min_interval_ms > self.max_interval_ms {
            return Err(EngineError::config_validation(
                "sampling.min_interval_ms",
                format!(
                    "must be <= max_interval_ms ({} > {})",
                    self.min_interval_ms, self.max_interval_ms
                ),
            ));
        }
        Ok(())
    }

    /// Copy of this profile with a new displacement threshold
    pub fn with_displacement(&self, min_displacement_m: f64) -> Self {
        Self {
            min_displacement_m,
            ..*self
        }
    }
}
