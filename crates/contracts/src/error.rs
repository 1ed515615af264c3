//! Layered error definitions
//!
//! Categorized by source: config / session / source / engine

use thiserror::Error;

/// Unified error type
#[derive(Debug, Error)]
pub enum EngineError {
    // ===== Configuration Errors =====
    /// Configuration parse error
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    // ===== Session Errors =====
    /// Session precondition failure: a required field is absent
    #[error("invalid session: '{field}' is missing")]
    InvalidSession { field: String },

    // ===== Position Source Errors =====
    /// Platform denied location permission; fatal for the current attempt,
    /// requires user action before any retry
    #[error("location permission denied")]
    PermissionDenied,

    /// No fix is available from the source
    #[error("position fix not available")]
    FixUnavailable,

    /// The source's fix stream closed unexpectedly
    #[error("position source closed")]
    SourceClosed,

    // ===== Lifecycle Errors =====
    /// `start` called while already Running
    #[error("engine is already running")]
    AlreadyRunning,

    /// OS process-lifetime registration failed
    #[error("lifetime registrar error: {message}")]
    Registrar { message: String },

    // ===== General Errors =====
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl EngineError {
    /// Create configuration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create configuration validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create session precondition error
    pub fn invalid_session(field: impl Into<String>) -> Self {
        Self::InvalidSession {
            field: field.into(),
        }
    }

    /// Create registrar error
    pub fn registrar(message: impl Into<String>) -> Self {
        Self::Registrar {
            message: message.into(),
        }
    }
}
