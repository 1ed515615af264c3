//! EngineState - lifecycle state machine states

/// Engine lifecycle state
///
/// Single writer (the engine lifecycle); read by all components to gate
/// activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EngineState {
    /// Not sampling; no subscription, no session
    #[default]
    Stopped,
    /// Sampling and reporting
    Running,
}
