//! SyncTransport trait - fix delivery seam
//!
//! Pure request/response with no retained state. The concrete HTTP client
//! lives in the `sync_client` crate; tests substitute scripted transports.

use crate::{PositionFix, SessionContext, SyncOutcome};

/// Delivers one fix and classifies the server's answer
///
/// `send` is infallible at the type level: every failure mode is a
/// `SyncOutcome` variant so the adaptation controller consumes exactly one
/// outcome per issued send.
#[trait_variant::make(SyncTransport: Send)]
pub trait LocalSyncTransport {
    /// Deliver `fix` under `session`
    async fn send(&self, fix: &PositionFix, session: &SessionContext) -> SyncOutcome;
}
