//! Engine metric recording
//!
//! Counters and gauges derived from report outcomes and lifecycle activity.

use contracts::{FailureKind, SyncOutcome};
use metrics::{counter, gauge};

/// Record the outcome of one report delivery
///
/// Call once per `SyncTransport::send` completion.
pub fn record_report_outcome(outcome: &SyncOutcome) {
    match outcome {
        SyncOutcome::Delivered {
            proximity_reached,
            suggested_displacement,
        } => {
            counter!("locstream_reports_delivered_total").increment(1);
            if *proximity_reached {
                counter!("locstream_proximity_signals_total").increment(1);
            }
            if let Some(d) = suggested_displacement {
                gauge!("locstream_suggested_displacement_m").set(*d);
            }
        }
        SyncOutcome::AuthRejected => {
            counter!("locstream_auth_rejections_total").increment(1);
        }
        SyncOutcome::TransportFailure { kind, .. } => {
            let kind_label = match kind {
                FailureKind::Network => "network",
                FailureKind::Protocol => "protocol",
            };
            counter!("locstream_reports_failed_total", "kind" => kind_label).increment(1);
        }
    }
}

/// Record a displacement-threshold change and the resubscription it forced
pub fn record_resubscription(old_displacement_m: f64, new_displacement_m: f64) {
    counter!("locstream_resubscriptions_total").increment(1);
    gauge!("locstream_displacement_threshold_m").set(new_displacement_m);
    tracing::debug!(
        old_m = old_displacement_m,
        new_m = new_displacement_m,
        "displacement threshold changed"
    );
}

/// Record a queued fix dropped in favor of a fresher one
pub fn record_fix_superseded() {
    counter!("locstream_fixes_superseded_total").increment(1);
}

/// Record the engine lifecycle state
pub fn record_engine_running(running: bool) {
    gauge!("locstream_engine_running").set(if running { 1.0 } else { 0.0 });
}
