//! Scripted position source - test double
//!
//! Fixes are pushed by the test through a `ScriptedHandle`; the handle also
//! records subscription activity so tests can assert on resubscriptions and
//! the profile the source was last subscribed with.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use contracts::{EngineError, PositionFix, PositionSource, SamplingProfile};
use tokio::sync::mpsc;

const CHANNEL_CAPACITY: usize = 32;

#[derive(Default)]
struct Shared {
    tx: Mutex<Option<mpsc::Sender<PositionFix>>>,
    last_fix: Mutex<Option<PositionFix>>,
    last_profile: Mutex<Option<SamplingProfile>>,
    subscribe_count: AtomicU64,
}

/// Hand-driven position source
pub struct ScriptedPositionSource {
    shared: Arc<Shared>,
    denied: bool,
}

/// Test-side handle for driving and observing a `ScriptedPositionSource`
#[derive(Clone)]
pub struct ScriptedHandle {
    shared: Arc<Shared>,
}

impl ScriptedPositionSource {
    pub fn new() -> (Self, ScriptedHandle) {
        let shared = Arc::new(Shared::default());
        let handle = ScriptedHandle {
            shared: Arc::clone(&shared),
        };
        (
            Self {
                shared,
                denied: false,
            },
            handle,
        )
    }

    /// Source that refuses every subscription
    pub fn denied() -> Self {
        Self {
            shared: Arc::new(Shared::default()),
            denied: true,
        }
    }
}

impl PositionSource for ScriptedPositionSource {
    async fn subscribe(
        &mut self,
        profile: &SamplingProfile,
    ) -> Result<mpsc::Receiver<PositionFix>, EngineError> {
        if self.denied {
            return Err(EngineError::PermissionDenied);
        }
        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
        *self.shared.tx.lock().expect("tx lock poisoned") = Some(tx);
        *self.shared.last_profile.lock().expect("profile lock poisoned") = Some(*profile);
        self.shared.subscribe_count.fetch_add(1, Ordering::SeqCst);
        Ok(rx)
    }

    async fn unsubscribe(&mut self) {
        self.shared.tx.lock().expect("tx lock poisoned").take();
    }

    fn current_fix(&self) -> Option<PositionFix> {
        *self.shared.last_fix.lock().expect("last_fix lock poisoned")
    }
}

impl ScriptedHandle {
    /// Push a fix into the active subscription
    ///
    /// Returns false when no subscription is active or the stream is full.
    pub fn push(&self, fix: PositionFix) -> bool {
        *self.shared.last_fix.lock().expect("last_fix lock poisoned") = Some(fix);
        let tx = self.shared.tx.lock().expect("tx lock poisoned");
        match tx.as_ref() {
            Some(tx) => tx.try_send(fix).is_ok(),
            None => false,
        }
    }

    /// Record a last-known fix without emitting it
    pub fn set_last_fix(&self, fix: PositionFix) {
        *self.shared.last_fix.lock().expect("last_fix lock poisoned") = Some(fix);
    }

    /// How many times `subscribe` has been called
    pub fn subscribe_count(&self) -> u64 {
        self.shared.subscribe_count.load(Ordering::SeqCst)
    }

    /// Whether a subscription is currently active
    pub fn is_subscribed(&self) -> bool {
        self.shared.tx.lock().expect("tx lock poisoned").is_some()
    }

    /// Profile of the most recent subscription
    pub fn active_profile(&self) -> Option<SamplingProfile> {
        *self
            .shared
            .last_profile
            .lock()
            .expect("profile lock poisoned")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_push_reaches_subscriber() {
        let (mut source, handle) = ScriptedPositionSource::new();
        let mut rx = source.subscribe(&SamplingProfile::default()).await.unwrap();

        assert!(handle.push(PositionFix::at(47.9, 106.9, 1.0)));
        let fix = rx.recv().await.unwrap();
        assert_eq!(fix.latitude, 47.9);
        assert_eq!(handle.subscribe_count(), 1);
    }

    #[tokio::test]
    async fn test_push_without_subscription_is_rejected() {
        let (_source, handle) = ScriptedPositionSource::new();
        assert!(!handle.push(PositionFix::at(47.9, 106.9, 1.0)));
    }

    #[tokio::test]
    async fn test_unsubscribe_closes_stream() {
        let (mut source, handle) = ScriptedPositionSource::new();
        let mut rx = source.subscribe(&SamplingProfile::default()).await.unwrap();
        source.unsubscribe().await;
        assert!(!handle.is_subscribed());
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_current_fix_tracks_last_push() {
        let (mut source, handle) = ScriptedPositionSource::new();
        let _rx = source.subscribe(&SamplingProfile::default()).await.unwrap();
        assert!(source.current_fix().is_none());
        handle.push(PositionFix::at(1.0, 2.0, 3.0));
        assert_eq!(source.current_fix().unwrap().latitude, 1.0);
    }
}
