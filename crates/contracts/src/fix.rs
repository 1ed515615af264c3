//! PositionFix - Position Source output
//!
//! A single reported geographic position with a capture time.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// One geographic position fix
///
/// Immutable once produced: created by a `PositionSource` on each qualifying
/// movement event, consumed by the sync transport, and discarded afterwards.
/// The engine never persists a location history.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionFix {
    /// Latitude (degrees)
    pub latitude: f64,

    /// Longitude (degrees)
    pub longitude: f64,

    /// Capture time (Unix seconds, f64) - primary clock
    pub captured_at: f64,
}

impl PositionFix {
    /// Create a fix stamped with the current wall clock
    pub fn now(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            captured_at: unix_now(),
        }
    }

    /// Create a fix with an explicit capture time
    pub fn at(latitude: f64, longitude: f64, captured_at: f64) -> Self {
        Self {
            latitude,
            longitude,
            captured_at,
        }
    }
}

/// Current Unix time in seconds
pub(crate) fn unix_now() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0)
}
