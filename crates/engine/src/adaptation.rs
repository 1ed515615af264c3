//! AdaptationController - server-feedback loop
//!
//! Owns the live sampling profile and turns each `SyncOutcome` into a
//! control decision. Changing the displacement threshold forces a discard
//! and re-establishment of the position subscription, so the controller
//! compares hints at the server's reporting granularity (2 decimal places)
//! and only requests a resubscription when the rounded value actually
//! changes. Repeated identical hints are no-ops.

use contracts::{EngineEvent, SamplingProfile, SyncOutcome};
use observability::record_resubscription;
use tracing::{debug, warn};

use crate::notifier::EventNotifier;

/// Decision produced from one outcome
#[derive(Debug, Clone, PartialEq)]
pub enum ControlAction {
    /// Nothing to change
    None,
    /// Re-establish the position subscription with this profile
    Resubscribe(SamplingProfile),
    /// Terminal for the session: tear down sampling
    StopSampling,
}

/// Feedback controller owning the sampling profile
pub struct AdaptationController {
    profile: SamplingProfile,
    notifier: EventNotifier,
}

impl AdaptationController {
    pub fn new(profile: SamplingProfile, notifier: EventNotifier) -> Self {
        Self { profile, notifier }
    }

    /// Current sampling profile snapshot
    pub fn profile(&self) -> SamplingProfile {
        self.profile
    }

    /// Consume one outcome, producing the control decision
    ///
    /// Each outcome is consumed exactly once, in the order the fixes were
    /// captured; the worker serializes sends so that order holds by
    /// construction.
    pub fn apply(&mut self, outcome: SyncOutcome) -> ControlAction {
        match outcome {
            SyncOutcome::Delivered {
                proximity_reached,
                suggested_displacement,
            } => {
                if proximity_reached {
                    // Server is authoritative on repeat arrivals: re-signal
                    // on every confirming delivery, no dedup
                    self.notifier.notify(EngineEvent::ProximityReached(true));
                }
                match suggested_displacement {
                    Some(hint) => self.apply_displacement_hint(hint),
                    None => ControlAction::None,
                }
            }
            SyncOutcome::AuthRejected => {
                self.notifier.notify(EngineEvent::ReauthenticationRequired);
                ControlAction::StopSampling
            }
            SyncOutcome::TransportFailure { kind, message } => {
                // Transient: silently absorbed, the next fix is the retry
                debug!(?kind, message, "transport failure absorbed");
                ControlAction::None
            }
        }
    }

    fn apply_displacement_hint(&mut self, hint_m: f64) -> ControlAction {
        let new = round_cm(hint_m);
        let current = round_cm(self.profile.min_displacement_m);

        if new <= 0.0 {
            // Hints are filtered at the client; guard anyway so a bad hint
            // can never disable displacement filtering
            warn!(hint_m, "ignoring non-positive displacement hint");
            return ControlAction::None;
        }
        if new == current {
            return ControlAction::None;
        }

        record_resubscription(current, new);
        self.profile.min_displacement_m = new;
        ControlAction::Resubscribe(self.profile)
    }
}

/// Round to 2 decimal places (centimeter granularity), matching the server's
/// reporting precision
fn round_cm(meters: f64) -> f64 {
    (meters * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::EngineEvent;

    fn controller() -> (AdaptationController, tokio::sync::broadcast::Receiver<EngineEvent>) {
        let notifier = EventNotifier::new();
        let events = notifier.subscribe();
        (
            AdaptationController::new(SamplingProfile::default(), notifier),
            events,
        )
    }

    fn hint(d: f64) -> SyncOutcome {
        SyncOutcome::Delivered {
            proximity_reached: false,
            suggested_displacement: Some(d),
        }
    }

    #[tokio::test]
    async fn test_new_hint_triggers_resubscribe_with_rounded_value() {
        let (mut controller, _events) = controller();

        let action = controller.apply(hint(25.004));
        match action {
            ControlAction::Resubscribe(profile) => {
                assert_eq!(profile.min_displacement_m, 25.0);
            }
            other => panic!("expected Resubscribe, got {other:?}"),
        }
        assert_eq!(controller.profile().min_displacement_m, 25.0);
    }

    #[tokio::test]
    async fn test_identical_hint_is_idempotent() {
        let (mut controller, _events) = controller();

        assert!(matches!(
            controller.apply(hint(25.004)),
            ControlAction::Resubscribe(_)
        ));
        // Same value to 2 decimals: no second resubscription
        assert_eq!(controller.apply(hint(25.004)), ControlAction::None);
        assert_eq!(controller.apply(hint(25.0)), ControlAction::None);
        assert_eq!(controller.apply(hint(24.9999)), ControlAction::None);
    }

    #[tokio::test]
    async fn test_hint_equal_to_current_threshold_is_noop() {
        let (mut controller, _events) = controller();
        assert_eq!(controller.apply(hint(10.0)), ControlAction::None);
    }

    #[tokio::test]
    async fn test_no_hint_means_no_change() {
        let (mut controller, _events) = controller();
        assert_eq!(controller.apply(SyncOutcome::delivered()), ControlAction::None);
    }

    #[tokio::test]
    async fn test_proximity_notifies_once_per_delivery() {
        let (mut controller, mut events) = controller();

        let proximity = SyncOutcome::Delivered {
            proximity_reached: true,
            suggested_displacement: None,
        };
        assert_eq!(controller.apply(proximity.clone()), ControlAction::None);
        assert_eq!(controller.apply(proximity), ControlAction::None);

        assert_eq!(
            events.try_recv().unwrap(),
            EngineEvent::ProximityReached(true)
        );
        assert_eq!(
            events.try_recv().unwrap(),
            EngineEvent::ProximityReached(true)
        );
        assert!(events.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_auth_rejection_stops_and_notifies() {
        let (mut controller, mut events) = controller();

        assert_eq!(
            controller.apply(SyncOutcome::AuthRejected),
            ControlAction::StopSampling
        );
        assert_eq!(
            events.try_recv().unwrap(),
            EngineEvent::ReauthenticationRequired
        );
    }

    #[tokio::test]
    async fn test_transport_failure_changes_nothing() {
        let (mut controller, mut events) = controller();

        let failure = SyncOutcome::TransportFailure {
            kind: contracts::FailureKind::Network,
            message: "connection refused".to_string(),
        };
        assert_eq!(controller.apply(failure), ControlAction::None);
        assert_eq!(controller.profile().min_displacement_m, 10.0);
        assert!(events.try_recv().is_err());
    }
}
