//! LifetimeRegistrar - OS process-lifetime seam
//!
//! Models the platform mechanism that restarts the engine's host process
//! (sticky service / background-task registration). State is NOT preserved
//! across such a restart: the external layer must re-supply the session,
//! since credentials are never persisted by the engine.

use crate::EngineError;

/// Hook invoked on engine start/stop to (de)register with the platform's
/// process-restart mechanism
pub trait LifetimeRegistrar: Send + Sync {
    /// Register for restart-on-reclaim
    ///
    /// # Errors
    /// Registration failure aborts `start`.
    fn register(&self) -> Result<(), EngineError>;

    /// Deregister; idempotent
    fn deregister(&self);
}

/// Registrar for runtimes without a process-restart contract (tests, CLI)
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopRegistrar;

impl LifetimeRegistrar for NoopRegistrar {
    fn register(&self) -> Result<(), EngineError> {
        Ok(())
    }

    fn deregister(&self) {}
}
