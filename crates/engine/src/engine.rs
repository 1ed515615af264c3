//! ReportingEngine - lifecycle state machine
//!
//! Wires a position source, a sync transport, the adaptation controller and
//! the event notifier together. One worker task per engine instance owns the
//! fix stream: fixes are processed serially, at most one send is outstanding
//! at any time, and outcomes are therefore applied in capture order by
//! construction.

use std::sync::Arc;

use contracts::{
    EngineError, EngineEvent, EngineState, LifetimeRegistrar, NoopRegistrar, PositionFix,
    PositionSource, SamplingProfile, SessionContext, SyncOutcome, SyncTransport,
};
use observability::{record_engine_running, record_fix_superseded, record_report_outcome};
use tokio::sync::{mpsc, watch, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument, warn};

use crate::adaptation::{AdaptationController, ControlAction};
use crate::notifier::EventNotifier;
use crate::shared::EngineShared;

/// Adaptive location-reporting engine
///
/// `S` is the platform position provider, `T` the delivery transport. Both
/// are owned by the engine; the external layer talks to the engine through
/// `start` / `stop` / `sample_now` / `set_session` and subscribes to events
/// via [`ReportingEngine::notifier`].
pub struct ReportingEngine<S, T> {
    shared: Arc<EngineShared>,
    source: Arc<Mutex<S>>,
    transport: Arc<T>,
    notifier: EventNotifier,
    registrar: Arc<dyn LifetimeRegistrar>,
    default_profile: SamplingProfile,
    shutdown: Option<watch::Sender<bool>>,
    worker: Option<JoinHandle<()>>,
}

impl<S, T> ReportingEngine<S, T>
where
    S: PositionSource + 'static,
    T: SyncTransport + Sync + 'static,
{
    pub fn new(source: S, transport: T, default_profile: SamplingProfile) -> Self {
        Self::with_registrar(source, transport, default_profile, Arc::new(NoopRegistrar))
    }

    /// Engine wired to a platform process-lifetime registrar
    pub fn with_registrar(
        source: S,
        transport: T,
        default_profile: SamplingProfile,
        registrar: Arc<dyn LifetimeRegistrar>,
    ) -> Self {
        Self {
            shared: Arc::new(EngineShared::default()),
            source: Arc::new(Mutex::new(source)),
            transport: Arc::new(transport),
            notifier: EventNotifier::new(),
            registrar,
            default_profile,
            shutdown: None,
            worker: None,
        }
    }

    /// Event hub for the external layer
    pub fn notifier(&self) -> &EventNotifier {
        &self.notifier
    }

    pub fn state(&self) -> EngineState {
        self.shared.state()
    }

    /// Reports accepted by the server since construction
    pub fn reports_delivered(&self) -> u64 {
        self.shared.delivered()
    }

    /// Reports that did not reach the server since construction
    pub fn reports_failed(&self) -> u64 {
        self.shared.failed()
    }

    /// Start sampling under `session`
    ///
    /// # Errors
    /// - `InvalidSession` when a session field is missing (precondition; the
    ///   engine stays Stopped)
    /// - `AlreadyRunning` when called while Running
    /// - `PermissionDenied` from the source; fatal for this attempt, no
    ///   automatic retry
    #[instrument(name = "engine_start", skip(self, session))]
    pub async fn start(&mut self, session: SessionContext) -> Result<(), EngineError> {
        if self.shared.state() == EngineState::Running {
            return Err(EngineError::AlreadyRunning);
        }
        session.validate()?;
        self.default_profile.validate()?;

        let profile = self.default_profile;
        let rx = {
            let mut source = self.source.lock().await;
            source.subscribe(&profile).await?
        };

        if let Err(e) = self.registrar.register() {
            let mut source = self.source.lock().await;
            source.unsubscribe().await;
            return Err(e);
        }

        self.shared.set_session(session);
        self.shared.transition_to_running();
        record_engine_running(true);

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let controller = AdaptationController::new(profile, self.notifier.clone());
        let worker = tokio::spawn(worker_loop(
            rx,
            controller,
            Arc::clone(&self.source),
            Arc::clone(&self.transport),
            Arc::clone(&self.shared),
            Arc::clone(&self.registrar),
            shutdown_rx,
        ));

        self.shutdown = Some(shutdown_tx);
        self.worker = Some(worker);

        info!(
            min_displacement_m = profile.min_displacement_m,
            "engine started"
        );
        Ok(())
    }

    /// Stop sampling; idempotent
    ///
    /// An in-flight send is abandoned: its outcome is discarded, not applied.
    #[instrument(name = "engine_stop", skip(self))]
    pub async fn stop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(true);
        }
        if let Some(worker) = self.worker.take() {
            if let Err(e) = worker.await {
                error!(error = ?e, "worker task panicked");
            }
        }

        {
            let mut source = self.source.lock().await;
            source.unsubscribe().await;
        }
        self.shared.clear_session();

        if self.shared.transition_to_stopped() {
            self.registrar.deregister();
            record_engine_running(false);
            info!("engine stopped");
        }
    }

    /// Force one immediate fix-and-send cycle
    ///
    /// Available in both states; when Stopped this performs a one-shot fix
    /// without establishing a subscription and does not transition engine
    /// state. The sampling profile is never mutated from this path. When no
    /// session is present the fix is returned without being sent.
    ///
    /// # Errors
    /// `FixUnavailable` when the source has no last-known position.
    #[instrument(name = "engine_sample_now", skip(self))]
    pub async fn sample_now(&self) -> Result<(f64, f64), EngineError> {
        let fix = {
            let source = self.source.lock().await;
            source.current_fix()
        }
        .ok_or(EngineError::FixUnavailable)?;

        match self.shared.session_snapshot() {
            Some(session) => {
                let outcome = self.transport.send(&fix, &session).await;
                record_report_outcome(&outcome);
                self.shared.count_outcome(&outcome);
                self.handle_oneshot_outcome(&outcome);
            }
            None => debug!("no session present, fix returned without sending"),
        }

        Ok((fix.latitude, fix.longitude))
    }

    /// Replace the session without restarting sampling
    pub fn set_session(&self, session: SessionContext) {
        debug!(?session, "session replaced");
        self.shared.set_session(session);
    }

    /// One-shot sends still surface server signals, but never touch the
    /// sampling profile. Auth rejection clears the session; a running worker
    /// then stops at its next fix when the snapshot comes back empty.
    fn handle_oneshot_outcome(&self, outcome: &SyncOutcome) {
        match outcome {
            SyncOutcome::Delivered {
                proximity_reached: true,
                ..
            } => {
                self.notifier.notify(EngineEvent::ProximityReached(true));
            }
            SyncOutcome::AuthRejected => {
                self.shared.clear_session();
                self.notifier.notify(EngineEvent::ReauthenticationRequired);
            }
            _ => {}
        }
    }
}

/// Worker task: consume fixes, deliver them, apply control decisions
async fn worker_loop<S, T>(
    mut rx: mpsc::Receiver<PositionFix>,
    mut controller: AdaptationController,
    source: Arc<Mutex<S>>,
    transport: Arc<T>,
    shared: Arc<EngineShared>,
    registrar: Arc<dyn LifetimeRegistrar>,
    mut shutdown: watch::Receiver<bool>,
) where
    S: PositionSource + 'static,
    T: SyncTransport + Sync + 'static,
{
    debug!("engine worker started");

    loop {
        let fix = tokio::select! {
            _ = shutdown.changed() => break,
            fix = rx.recv() => match fix {
                Some(fix) => fix,
                None => {
                    // Source dropped its stream without a control decision
                    warn!("position stream closed, stopping sampling");
                    stop_sampling(&source, &shared, &registrar, false).await;
                    return;
                }
            },
        };

        // Position is perishable: a fix queued behind a slow send is
        // superseded by a fresher one
        let mut fix = fix;
        while let Ok(newer) = rx.try_recv() {
            record_fix_superseded();
            fix = newer;
        }

        let Some(session) = shared.session_snapshot() else {
            info!("session cleared, stopping sampling");
            stop_sampling(&source, &shared, &registrar, true).await;
            return;
        };

        let outcome = tokio::select! {
            _ = shutdown.changed() => {
                debug!("shutdown during send, outcome discarded");
                break;
            }
            outcome = transport.send(&fix, &session) => outcome,
        };
        record_report_outcome(&outcome);
        shared.count_outcome(&outcome);

        match controller.apply(outcome) {
            ControlAction::None => {}
            ControlAction::Resubscribe(profile) => {
                // One logical step: the new profile is the value just written
                // by the controller, read exactly once here
                let mut src = source.lock().await;
                src.unsubscribe().await;
                match src.subscribe(&profile).await {
                    Ok(new_rx) => {
                        rx = new_rx;
                        debug!(
                            min_displacement_m = profile.min_displacement_m,
                            "resubscribed with new profile"
                        );
                    }
                    Err(e) => {
                        error!(error = %e, "resubscription failed, stopping sampling");
                        drop(src);
                        stop_sampling(&source, &shared, &registrar, true).await;
                        return;
                    }
                }
            }
            ControlAction::StopSampling => {
                info!("sampling stopped: authentication rejected");
                shared.clear_session();
                stop_sampling(&source, &shared, &registrar, false).await;
                return;
            }
        }
    }

    debug!("engine worker exited");
}

/// Internal teardown used when the worker stops itself
async fn stop_sampling<S: PositionSource>(
    source: &Arc<Mutex<S>>,
    shared: &Arc<EngineShared>,
    registrar: &Arc<dyn LifetimeRegistrar>,
    clear_session: bool,
) {
    if clear_session {
        shared.clear_session();
    }
    let mut src = source.lock().await;
    src.unsubscribe().await;
    if shared.transition_to_stopped() {
        registrar.deregister();
        record_engine_running(false);
    }
}
