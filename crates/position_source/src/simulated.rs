//! Simulated position source
//!
//! Random-walk provider for development and testing without a real platform
//! location service. Applies the sampling profile the way a platform
//! provider would: ticks at the fastest interval, emits on sufficient
//! displacement, and forces an emission once the target interval elapses.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use contracts::{EngineError, PositionFix, PositionSource, SamplingProfile, SourceConfig};
use metrics::counter;
use rand::Rng;
use tokio::sync::mpsc;
use tracing::{debug, trace};

use crate::geo;

const DEFAULT_CHANNEL_CAPACITY: usize = 32;

/// Simulated source configuration
#[derive(Debug, Clone, Copy)]
pub struct SimulatedConfig {
    /// Walk origin latitude (degrees)
    pub start_lat: f64,

    /// Walk origin longitude (degrees)
    pub start_lng: f64,

    /// Walking speed (meters per second)
    pub speed_mps: f64,

    /// Fix channel capacity; fixes are dropped when the consumer lags
    pub channel_capacity: usize,
}

impl Default for SimulatedConfig {
    fn default() -> Self {
        Self {
            start_lat: 47.918,
            start_lng: 106.917,
            speed_mps: 1.4,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

impl From<SourceConfig> for SimulatedConfig {
    fn from(config: SourceConfig) -> Self {
        Self {
            start_lat: config.start_lat,
            start_lng: config.start_lng,
            speed_mps: config.speed_mps,
            ..Default::default()
        }
    }
}

/// Random-walk position source
///
/// The walker's position persists across resubscriptions, so a threshold
/// change does not teleport the simulated device.
pub struct SimulatedPositionSource {
    config: SimulatedConfig,
    denied: bool,
    running: Arc<AtomicBool>,
    /// Walker position, shared with the active walk task
    position: Arc<Mutex<(f64, f64)>>,
}

impl SimulatedPositionSource {
    pub fn new(config: SimulatedConfig) -> Self {
        let position = Arc::new(Mutex::new((config.start_lat, config.start_lng)));
        Self {
            config,
            denied: false,
            running: Arc::new(AtomicBool::new(false)),
            position,
        }
    }

    /// Source that refuses every subscription, modeling missing location
    /// permission
    pub fn denied() -> Self {
        Self {
            denied: true,
            ..Self::new(SimulatedConfig::default())
        }
    }

    /// Whether a walk task is currently emitting
    pub fn is_subscribed(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }
}

impl PositionSource for SimulatedPositionSource {
    async fn subscribe(
        &mut self,
        profile: &SamplingProfile,
    ) -> Result<mpsc::Receiver<PositionFix>, EngineError> {
        if self.denied {
            return Err(EngineError::PermissionDenied);
        }

        // Replace any previous subscription
        self.running.store(false, Ordering::SeqCst);
        let running = Arc::new(AtomicBool::new(true));
        self.running = Arc::clone(&running);

        let (tx, rx) = mpsc::channel(self.config.channel_capacity);
        let profile = *profile;
        let config = self.config;
        let position = Arc::clone(&self.position);

        tokio::spawn(async move {
            walk_loop(config, profile, position, running, tx).await;
        });

        debug!(
            min_interval_ms = profile.min_interval_ms,
            max_interval_ms = profile.max_interval_ms,
            min_displacement_m = profile.min_displacement_m,
            "simulated source subscribed"
        );

        Ok(rx)
    }

    async fn unsubscribe(&mut self) {
        if self.running.swap(false, Ordering::SeqCst) {
            debug!("simulated source unsubscribed");
        }
    }

    fn current_fix(&self) -> Option<PositionFix> {
        let (lat, lng) = *self.position.lock().expect("position lock poisoned");
        Some(PositionFix::now(lat, lng))
    }
}

/// Walk task: advance the walker every tick, emit when the profile says so
async fn walk_loop(
    config: SimulatedConfig,
    profile: SamplingProfile,
    position: Arc<Mutex<(f64, f64)>>,
    running: Arc<AtomicBool>,
    tx: mpsc::Sender<PositionFix>,
) {
    let tick = Duration::from_millis(profile.min_interval_ms);
    let max_wait = Duration::from_millis(profile.max_interval_ms);
    let tick_secs = tick.as_secs_f64();

    let mut heading: f64 = rand::rng().random_range(0.0..std::f64::consts::TAU);
    let mut last_emit_pos = *position.lock().expect("position lock poisoned");
    let mut last_emit = tokio::time::Instant::now();

    // Initial fix, like a platform provider's prompt first report
    emit(&tx, last_emit_pos);

    while running.load(Ordering::Relaxed) {
        tokio::time::sleep(tick).await;
        if !running.load(Ordering::Relaxed) {
            break;
        }

        heading += rand::rng().random_range(-0.4..0.4);
        let current = {
            let mut pos = position.lock().expect("position lock poisoned");
            let stepped = geo::step(pos.0, pos.1, heading, config.speed_mps * tick_secs);
            *pos = stepped;
            stepped
        };

        let displacement = geo::haversine_m(last_emit_pos.0, last_emit_pos.1, current.0, current.1);
        let waited_long_enough = last_emit.elapsed() >= max_wait;

        if displacement >= profile.min_displacement_m || waited_long_enough {
            if !emit(&tx, current) {
                break;
            }
            trace!(
                lat = current.0,
                lng = current.1,
                displacement_m = displacement,
                forced = waited_long_enough,
                "fix emitted"
            );
            last_emit_pos = current;
            last_emit = tokio::time::Instant::now();
        }
    }

    debug!("simulated walk task stopped");
}

/// Non-blocking emit; drops the fix when the consumer lags
///
/// Returns false when the receiver is gone.
fn emit(tx: &mpsc::Sender<PositionFix>, (lat, lng): (f64, f64)) -> bool {
    match tx.try_send(PositionFix::now(lat, lng)) {
        Ok(()) => {
            counter!("locstream_fixes_emitted_total").increment(1);
            true
        }
        Err(mpsc::error::TrySendError::Full(_)) => {
            counter!("locstream_fixes_dropped_total").increment(1);
            true
        }
        Err(mpsc::error::TrySendError::Closed(_)) => false,
    }
}
