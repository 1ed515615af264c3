//! # Integration Tests
//!
//! End-to-end tests over the full stack: scripted or simulated position
//! source, the real HTTP sync client, and a local mock report server.
//!
//! Covers:
//! - Wire format round trips
//! - Feedback-driven resubscription
//! - Auth-rejection teardown
//! - Lifecycle edge cases

#[cfg(test)]
mod contract_tests {
    #[test]
    fn test_contracts_compile() {
        let _ = contracts::ConfigVersion::V1;
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use axum::extract::State;
    use axum::http::HeaderMap;
    use axum::routing::post;
    use axum::Router;

    use contracts::{
        EngineEvent, EngineState, PositionFix, SamplingProfile, ServerConfig, SessionContext,
    };
    use engine::ReportingEngine;
    use position_source::{ScriptedHandle, ScriptedPositionSource, SimulatedConfig,
        SimulatedPositionSource};
    use sync_client::{SyncClient, SyncClientConfig};

    /// One received report
    #[derive(Clone, Debug)]
    struct ReceivedReport {
        auth: String,
        body: serde_json::Value,
    }

    /// Scriptable report server
    ///
    /// Responses are consumed from a queue; when the queue is empty every
    /// request gets a plain `{"data":{}}` delivery.
    #[derive(Clone, Default)]
    struct ReportServer {
        responses: Arc<Mutex<VecDeque<(u16, &'static str)>>>,
        received: Arc<Mutex<Vec<ReceivedReport>>>,
    }

    impl ReportServer {
        fn queue(&self, status: u16, body: &'static str) {
            self.responses.lock().unwrap().push_back((status, body));
        }

        fn received(&self) -> Vec<ReceivedReport> {
            self.received.lock().unwrap().clone()
        }

        async fn spawn(self) -> String {
            async fn handler(
                State(server): State<ReportServer>,
                headers: HeaderMap,
                body: String,
            ) -> (axum::http::StatusCode, &'static str) {
                let auth = headers
                    .get("authorization")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default()
                    .to_string();
                server.received.lock().unwrap().push(ReceivedReport {
                    auth,
                    body: serde_json::from_str(&body).unwrap_or(serde_json::Value::Null),
                });

                let (status, body) = server
                    .responses
                    .lock()
                    .unwrap()
                    .pop_front()
                    .unwrap_or((200, r#"{"data":{}}"#));
                (axum::http::StatusCode::from_u16(status).unwrap(), body)
            }

            let app = Router::new()
                .route("/api/location/save/patient", post(handler))
                .with_state(self.clone());
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
            let addr = listener.local_addr().unwrap();
            tokio::spawn(async move {
                axum::serve(listener, app).await.unwrap();
            });

            format!("http://{addr}/api/location/save/patient")
        }
    }

    fn client_for(endpoint: &str) -> SyncClient {
        let config = SyncClientConfig::from_server_config(&ServerConfig {
            endpoint: endpoint.to_string(),
            request_timeout_s: 5,
        })
        .unwrap();
        SyncClient::new(config).unwrap()
    }

    fn scripted_engine(
        endpoint: &str,
    ) -> (
        ReportingEngine<ScriptedPositionSource, SyncClient>,
        ScriptedHandle,
    ) {
        let (source, handle) = ScriptedPositionSource::new();
        let engine = ReportingEngine::new(source, client_for(endpoint), SamplingProfile::default());
        (engine, handle)
    }

    fn session() -> SessionContext {
        SessionContext::new("token-abc", "room-7")
    }

    async fn wait_until(mut condition: impl FnMut() -> bool) {
        for _ in 0..400 {
            if condition() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("condition not reached within 2s");
    }

    /// Fix reaches the server with the documented body and bearer header.
    #[tokio::test]
    async fn test_report_round_trip() {
        let server = ReportServer::default();
        let endpoint = server.clone().spawn().await;
        let (mut engine, handle) = scripted_engine(&endpoint);

        engine.start(session()).await.unwrap();
        handle.push(PositionFix::at(47.918, 106.917, 1.0));

        wait_until(|| engine.reports_delivered() == 1).await;

        let received = server.received();
        assert_eq!(received.len(), 1);
        assert_eq!(received[0].auth, "Bearer token-abc");
        assert_eq!(received[0].body["lat"], 47.918);
        assert_eq!(received[0].body["lng"], 106.917);
        assert_eq!(received[0].body["roomId"], "room-7");

        engine.stop().await;
    }

    /// A distance hint reshapes the subscription exactly once; the repeated
    /// identical hint is a no-op.
    #[tokio::test]
    async fn test_displacement_feedback_resubscribes_once() {
        let server = ReportServer::default();
        server.queue(200, r#"{"data":{"distance":25.004}}"#);
        server.queue(200, r#"{"data":{"distance":25.004}}"#);
        let endpoint = server.clone().spawn().await;
        let (mut engine, handle) = scripted_engine(&endpoint);

        engine.start(session()).await.unwrap();
        assert_eq!(handle.subscribe_count(), 1);

        handle.push(PositionFix::at(47.918, 106.917, 1.0));
        wait_until(|| handle.subscribe_count() == 2).await;
        assert_eq!(handle.active_profile().unwrap().min_displacement_m, 25.0);

        handle.push(PositionFix::at(47.919, 106.918, 2.0));
        wait_until(|| engine.reports_delivered() == 2).await;
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(handle.subscribe_count(), 2);

        engine.stop().await;
    }

    /// Every confirming delivery re-raises the proximity event.
    #[tokio::test]
    async fn test_proximity_event_per_confirming_delivery() {
        let server = ReportServer::default();
        server.queue(200, r#"{"data":{"arrivedInFifty":true}}"#);
        server.queue(200, r#"{"data":{"arrivedInFifty":true}}"#);
        let endpoint = server.clone().spawn().await;
        let (mut engine, handle) = scripted_engine(&endpoint);
        let mut events = engine.notifier().subscribe();

        engine.start(session()).await.unwrap();
        handle.push(PositionFix::at(47.918, 106.917, 1.0));
        handle.push(PositionFix::at(47.919, 106.918, 2.0));
        wait_until(|| engine.reports_delivered() == 2).await;

        assert_eq!(
            events.recv().await.unwrap(),
            EngineEvent::ProximityReached(true)
        );
        assert_eq!(
            events.recv().await.unwrap(),
            EngineEvent::ProximityReached(true)
        );

        engine.stop().await;
    }

    /// 401 tears sampling down: one reauthentication event, Stopped state,
    /// and no further reports until a fresh start.
    #[tokio::test]
    async fn test_auth_rejection_stops_reporting() {
        let server = ReportServer::default();
        server.queue(401, r#"{"error":"expired"}"#);
        let endpoint = server.clone().spawn().await;
        let (mut engine, handle) = scripted_engine(&endpoint);
        let mut events = engine.notifier().subscribe();

        engine.start(session()).await.unwrap();
        handle.push(PositionFix::at(47.918, 106.917, 1.0));

        wait_until(|| engine.state() == EngineState::Stopped).await;
        assert_eq!(
            events.recv().await.unwrap(),
            EngineEvent::ReauthenticationRequired
        );
        assert!(!handle.is_subscribed());
        assert_eq!(engine.reports_failed(), 1);

        // Pushed fixes go nowhere now
        handle.push(PositionFix::at(48.0, 107.0, 2.0));
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(server.received().len(), 1);

        // A fresh start with new credentials resumes reporting
        engine
            .start(SessionContext::new("token-new", "room-7"))
            .await
            .unwrap();
        handle.push(PositionFix::at(48.0, 107.0, 3.0));
        wait_until(|| server.received().len() == 2).await;
        assert_eq!(server.received()[1].auth, "Bearer token-new");

        engine.stop().await;
    }

    /// A malformed 2xx body counts as delivered and changes nothing.
    #[tokio::test]
    async fn test_malformed_body_is_still_delivery() {
        let server = ReportServer::default();
        server.queue(200, "<html>gateway error page</html>");
        let endpoint = server.clone().spawn().await;
        let (mut engine, handle) = scripted_engine(&endpoint);

        engine.start(session()).await.unwrap();
        handle.push(PositionFix::at(47.918, 106.917, 1.0));

        wait_until(|| engine.reports_delivered() == 1).await;
        assert_eq!(engine.state(), EngineState::Running);
        assert_eq!(handle.subscribe_count(), 1);

        engine.stop().await;
    }

    /// A 500 is absorbed; the engine keeps running and the next fix delivers.
    #[tokio::test]
    async fn test_server_error_does_not_stop_engine() {
        let server = ReportServer::default();
        server.queue(500, "oops");
        let endpoint = server.clone().spawn().await;
        let (mut engine, handle) = scripted_engine(&endpoint);

        engine.start(session()).await.unwrap();
        handle.push(PositionFix::at(47.918, 106.917, 1.0));
        wait_until(|| engine.reports_failed() == 1).await;
        assert_eq!(engine.state(), EngineState::Running);

        handle.push(PositionFix::at(47.919, 106.918, 2.0));
        wait_until(|| engine.reports_delivered() == 1).await;

        engine.stop().await;
    }

    /// Full simulated walk: the random walker produces fixes that actually
    /// arrive at the server in capture order.
    #[tokio::test]
    async fn test_simulated_walk_reports_in_order() {
        let server = ReportServer::default();
        let endpoint = server.clone().spawn().await;

        let source = SimulatedPositionSource::new(SimulatedConfig {
            speed_mps: 10.0,
            ..Default::default()
        });
        let profile = SamplingProfile {
            min_interval_ms: 5,
            max_interval_ms: 50,
            min_displacement_m: 0.0,
        };
        let mut engine = ReportingEngine::new(source, client_for(&endpoint), profile);

        engine.start(session()).await.unwrap();
        wait_until(|| engine.reports_delivered() >= 3).await;
        engine.stop().await;

        let received = server.received();
        assert!(received.len() >= 3);
        for report in &received {
            assert_eq!(report.auth, "Bearer token-abc");
            assert!(report.body["lat"].is_number());
            assert!(report.body["lng"].is_number());
        }
    }

    /// Loaded configuration drives the client end to end.
    #[tokio::test]
    async fn test_config_to_delivery() {
        let server = ReportServer::default();
        let endpoint = server.clone().spawn().await;

        let toml = format!(
            r#"
[server]
endpoint = "{endpoint}"
request_timeout_s = 5

[sampling]
min_interval_ms = 5
max_interval_ms = 50
min_displacement_m = 0.0
"#
        );
        let config =
            config_loader::ConfigLoader::load_from_str(&toml, config_loader::ConfigFormat::Toml)
                .unwrap();

        let (source, handle) = ScriptedPositionSource::new();
        let client =
            SyncClient::new(SyncClientConfig::from_server_config(&config.server).unwrap()).unwrap();
        let mut engine = ReportingEngine::new(source, client, config.sampling);

        engine.start(session()).await.unwrap();
        handle.push(PositionFix::at(47.918, 106.917, 1.0));
        wait_until(|| engine.reports_delivered() == 1).await;
        engine.stop().await;

        assert_eq!(server.received().len(), 1);
    }
}
