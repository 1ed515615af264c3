//! EngineEvent - out-of-band signals to the external layer
//!
//! Delivered best-effort, at-least-once; receivers must handle repeats
//! idempotently.

/// Out-of-band engine signal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineEvent {
    /// Server confirmed arrival within the destination range. Re-triggered on
    /// every confirming delivery; the server is authoritative on repeats.
    ProximityReached(bool),

    /// Authentication was rejected; sampling stopped, fresh credentials are
    /// required before restarting.
    ReauthenticationRequired,
}
