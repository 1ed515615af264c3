//! PositionSource trait - platform location-provider abstraction
//!
//! Platform adapters (and the simulated/scripted sources) implement this
//! capability; the engine core stays platform-agnostic.

use tokio::sync::mpsc;

use crate::{EngineError, PositionFix, SamplingProfile};

/// Position data source trait
///
/// # Design Principles
///
/// 1. **Re-registration model**: `unsubscribe()` followed by `subscribe()`
///    with a new profile is the only way to change the displacement
///    threshold - real location-provider APIs cannot hot-swap a live
///    request's filter parameters.
/// 2. **Ordering**: emitted fixes carry monotonically non-decreasing
///    `captured_at` values.
/// 3. **Best-effort last known**: `current_fix` never blocks and may return
///    `None` before the provider has produced anything.
#[trait_variant::make(PositionSource: Send)]
pub trait LocalPositionSource {
    /// Begin delivering fixes under the given profile
    ///
    /// Returns the receiving end of the fix stream. Calling `subscribe` while
    /// already subscribed replaces the existing subscription.
    ///
    /// # Errors
    /// `PermissionDenied` when the platform refuses location access; fatal
    /// for this attempt, no automatic retry.
    async fn subscribe(
        &mut self,
        profile: &SamplingProfile,
    ) -> Result<mpsc::Receiver<PositionFix>, EngineError>;

    /// Stop delivering fixes; idempotent
    async fn unsubscribe(&mut self);

    /// Best-effort, non-blocking last-known fix
    fn current_fix(&self) -> Option<PositionFix>;
}
