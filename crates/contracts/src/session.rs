//! SessionContext - authentication token + room identifier
//!
//! Supplied by the external layer before the engine may start; cleared only
//! by explicit stop or by an authentication-failure signal.

use std::fmt;

use crate::EngineError;

/// Session scoping where location reports are attributed
///
/// Both fields are required - absence is a precondition failure, not a
/// recoverable error. The `Debug` impl redacts the token so a session can be
/// logged without leaking credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionContext {
    /// Bearer token attached to every report
    pub auth_token: String,

    /// Room / destination identifier the reports are attributed to
    pub room_id: String,
}

impl SessionContext {
    pub fn new(auth_token: impl Into<String>, room_id: impl Into<String>) -> Self {
        Self {
            auth_token: auth_token.into(),
            room_id: room_id.into(),
        }
    }

    /// Check the precondition that both fields are present
    ///
    /// # Errors
    /// `InvalidSession` naming the first missing field.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.auth_token.is_empty() {
            return Err(EngineError::invalid_session("auth_token"));
        }
        if self.room_id.is_empty() {
            return Err(EngineError::invalid_session("room_id"));
        }
        Ok(())
    }
}

impl fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionContext")
            .field("auth_token", &redact(&self.auth_token))
            .field("room_id", &self.room_id)
            .finish()
    }
}

/// Keep only a short prefix of the token for diagnostics
fn redact(token: &str) -> String {
    if token.len() <= 4 {
        "****".to_string()
    } else {
        format!("{}****", &token[..4])
    }
}
