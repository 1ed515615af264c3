//! # Position Source
//!
//! Position-provider implementations behind the `PositionSource` contract.
//!
//! - `SimulatedPositionSource`: random-walk provider for development and the
//!   CLI, applying the sampling profile the way a platform provider would.
//! - `ScriptedPositionSource`: test double driven by a handle.

mod geo;
mod scripted;
mod simulated;

pub use geo::haversine_m;
pub use scripted::{ScriptedHandle, ScriptedPositionSource};
pub use simulated::{SimulatedConfig, SimulatedPositionSource};
