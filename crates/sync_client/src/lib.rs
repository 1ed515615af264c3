//! # Sync Client
//!
//! HTTP delivery of position fixes. Serializes a fix plus session context
//! into the wire request, sends it, and classifies the response into a
//! typed `SyncOutcome`. Pure request/response; no retained state between
//! sends.

mod client;
mod wire;

pub use client::{SyncClient, SyncClientConfig};
