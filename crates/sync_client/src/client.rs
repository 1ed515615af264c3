//! SyncClient - HTTP report delivery

use std::time::Duration;

use contracts::{
    EngineError, FailureKind, PositionFix, ServerConfig, SessionContext, SyncOutcome,
    SyncTransport,
};
use reqwest::StatusCode;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::wire::{ReportEnvelope, ReportRequest};

/// Configuration for `SyncClient`
#[derive(Debug, Clone)]
pub struct SyncClientConfig {
    /// Report endpoint
    pub endpoint: Url,

    /// Per-request timeout
    pub request_timeout: Duration,
}

impl SyncClientConfig {
    /// Build from the loaded server section
    ///
    /// # Errors
    /// Invalid endpoint URL.
    pub fn from_server_config(server: &ServerConfig) -> Result<Self, EngineError> {
        let endpoint = Url::parse(&server.endpoint).map_err(|e| {
            EngineError::config_validation(
                "server.endpoint",
                format!("invalid URL '{}': {e}", server.endpoint),
            )
        })?;
        Ok(Self {
            endpoint,
            request_timeout: Duration::from_secs(server.request_timeout_s),
        })
    }
}

/// HTTP sync client
pub struct SyncClient {
    config: SyncClientConfig,
    http: reqwest::Client,
}

impl SyncClient {
    /// Create a new client with a pooled connection
    ///
    /// # Errors
    /// HTTP client construction failure.
    pub fn new(config: SyncClientConfig) -> Result<Self, EngineError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| EngineError::Other(format!("http client build failed: {e}")))?;
        Ok(Self { config, http })
    }

    /// Classify a 2xx body into delivery hints
    ///
    /// Malformed JSON on a 2xx is non-fatal: the report was almost certainly
    /// persisted server-side, so degrade to a plain delivery and never retry.
    fn parse_success_body(body: &str) -> SyncOutcome {
        let envelope: ReportEnvelope = match serde_json::from_str(body) {
            Ok(envelope) => envelope,
            Err(e) => {
                warn!(error = %e, "unparseable 2xx response body, treating as plain delivery");
                return SyncOutcome::delivered();
            }
        };

        let data = envelope.data.unwrap_or_default();
        // Non-positive hints mean "no hint", not "reset to unfiltered"
        let suggested_displacement = data
            .distance
            .filter(|d| d.is_finite() && *d > 0.0);

        SyncOutcome::Delivered {
            proximity_reached: data.arrived_in_fifty,
            suggested_displacement,
        }
    }
}

impl SyncTransport for SyncClient {
    /// Deliver one fix
    ///
    /// Infallible by design: transport and protocol problems come back as
    /// `SyncOutcome::TransportFailure`, auth problems as `AuthRejected`.
    #[instrument(
        name = "sync_client_send",
        skip(self, fix, session),
        fields(lat = fix.latitude, lng = fix.longitude, room_id = %session.room_id)
    )]
    async fn send(&self, fix: &PositionFix, session: &SessionContext) -> SyncOutcome {
        let body = ReportRequest {
            lat: fix.latitude,
            lng: fix.longitude,
            room_id: &session.room_id,
        };

        let response = self
            .http
            .post(self.config.endpoint.clone())
            .bearer_auth(&session.auth_token)
            .json(&body)
            .send()
            .await;

        let response = match response {
            Ok(response) => response,
            Err(e) => {
                // Log the failure class, never the token
                warn!(error = %e, "report request failed");
                return SyncOutcome::TransportFailure {
                    kind: FailureKind::Network,
                    message: e.to_string(),
                };
            }
        };

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            warn!(status = %status, "report rejected: authentication expired");
            return SyncOutcome::AuthRejected;
        }

        if !status.is_success() {
            warn!(status = %status, "report rejected with unexpected status");
            return SyncOutcome::TransportFailure {
                kind: FailureKind::Protocol,
                message: format!("unexpected status {status}"),
            };
        }

        let body = response.text().await.unwrap_or_default();
        let outcome = Self::parse_success_body(&body);
        debug!(status = %status, ?outcome, "report delivered");
        outcome
    }
}
