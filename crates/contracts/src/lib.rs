//! # Contracts
//!
//! Frozen interface contracts (ICD), defining inter-crate data structures and traits.
//! All business crates can only depend on this crate, reverse dependencies are prohibited.
//!
//! ## Time Model
//! - `captured_at` is Unix time (seconds, f64), stamped when a fix is produced
//! - Fixes are delivered in monotonically non-decreasing `captured_at` order

mod config;
mod error;
mod event;
mod fix;
mod outcome;
mod profile;
mod registrar;
mod session;
mod source;
mod state;
mod transport;

pub use config::*;
pub use error::*;
pub use event::EngineEvent;
pub use fix::PositionFix;
pub use outcome::{FailureKind, SyncOutcome};
pub use profile::SamplingProfile;
pub use registrar::{LifetimeRegistrar, NoopRegistrar};
pub use session::SessionContext;
pub use source::PositionSource;
pub use state::EngineState;
pub use transport::SyncTransport;
