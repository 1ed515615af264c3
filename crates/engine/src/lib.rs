//! # Engine
//!
//! The adaptive location-reporting engine: lifecycle state machine, the
//! feedback loop that adapts the sampling profile from server hints, and the
//! out-of-band event notifier.
//!
//! ## Data flow
//!
//! ```text
//! PositionSource ──fix──▶ worker ──send──▶ SyncTransport
//!                          │                    │
//!                          ◀────SyncOutcome─────┘
//!                          │
//!                AdaptationController ──▶ resubscribe / stop
//!                          │
//!                    EventNotifier ──▶ external layer
//! ```

mod adaptation;
mod engine;
mod notifier;
mod shared;

pub use adaptation::{AdaptationController, ControlAction};
pub use engine::ReportingEngine;
pub use notifier::EventNotifier;
