//! SyncOutcome - Sync Client output
//!
//! Typed result of delivering one fix. Produced once per send, consumed
//! exactly once by the adaptation controller.

/// Why a delivery counted as a transport failure
///
/// Distinguished for observability only; the adaptation controller treats
/// both identically (silent absorb, next fix is the implicit retry).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Request never completed (DNS, connect, timeout, IO)
    Network,
    /// Request completed with an unexpected status
    Protocol,
}

/// Outcome of one fix delivery
#[derive(Debug, Clone, PartialEq)]
pub enum SyncOutcome {
    /// Server accepted the report (2xx)
    Delivered {
        /// Server-asserted arrival within the destination range
        proximity_reached: bool,
        /// Server hint for a new displacement threshold (meters, always > 0
        /// when present; non-positive hints are filtered at the client)
        suggested_displacement: Option<f64>,
    },

    /// 401/403 - terminal for the current session
    AuthRejected,

    /// Transient failure; no retry, position is perishable
    TransportFailure { kind: FailureKind, message: String },
}

impl SyncOutcome {
    /// Plain delivery with no server hints
    pub fn delivered() -> Self {
        Self::Delivered {
            proximity_reached: false,
            suggested_displacement: None,
        }
    }

    /// Whether the server accepted the report
    pub fn is_delivered(&self) -> bool {
        matches!(self, Self::Delivered { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_delivery_has_no_hints() {
        let outcome = SyncOutcome::delivered();
        assert!(outcome.is_delivered());
        assert_eq!(
            outcome,
            SyncOutcome::Delivered {
                proximity_reached: false,
                suggested_displacement: None,
            }
        );
    }
}
