//! `run` command implementation.

use anyhow::{Context, Result};
use std::time::Duration;
use tracing::{info, warn};

use contracts::{EngineEvent, ReporterConfig, SessionContext};
use engine::ReportingEngine;
use position_source::{SimulatedConfig, SimulatedPositionSource};
use sync_client::{SyncClient, SyncClientConfig};
use tokio::sync::broadcast;

use crate::cli::RunArgs;

/// Execute the `run` command
pub async fn run_reporter(args: &RunArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading configuration");

    // Validate config path
    if !args.config.exists() {
        anyhow::bail!("Configuration file not found: {}", args.config.display());
    }

    // Load and parse configuration
    let mut config = config_loader::ConfigLoader::load_from_path(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    // Apply CLI overrides
    if let Some(ref endpoint) = args.endpoint {
        info!(endpoint = %endpoint, "Overriding report endpoint from CLI");
        config.server.endpoint = endpoint.clone();
    }

    info!(
        endpoint = %config.server.endpoint,
        min_interval_ms = config.sampling.min_interval_ms,
        max_interval_ms = config.sampling.max_interval_ms,
        min_displacement_m = config.sampling.min_displacement_m,
        "Configuration loaded"
    );

    // Dry run - just validate and exit
    if args.dry_run {
        info!("Dry run mode - configuration is valid, exiting");
        print_config_summary(&config);
        return Ok(());
    }

    let token = args
        .token
        .clone()
        .context("Missing bearer token (--token or LOCSTREAM_TOKEN)")?;
    let room = args
        .room
        .clone()
        .context("Missing room identifier (--room or LOCSTREAM_ROOM)")?;
    let session = SessionContext::new(token, room);

    // Initialize Metrics (optional)
    let metrics_port = if args.metrics_port != 0 {
        Some(args.metrics_port)
    } else {
        config.metrics.map(|m| m.port)
    };
    if let Some(port) = metrics_port {
        observability::init_metrics_only(port)?;
        info!("Metrics endpoint available on port {}", port);
    }

    // Wire up engine
    let source = SimulatedPositionSource::new(SimulatedConfig::from(config.source));
    let client = SyncClient::new(SyncClientConfig::from_server_config(&config.server)?)?;
    let mut engine = ReportingEngine::new(source, client, config.sampling);

    // Surface engine events as log lines
    let mut events = engine.notifier().subscribe();
    let event_task = tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(EngineEvent::ProximityReached(true)) => {
                    info!("Within arrival range of the destination");
                }
                Ok(EngineEvent::ProximityReached(false)) => {}
                Ok(EngineEvent::ReauthenticationRequired) => {
                    warn!("Session rejected by server - reauthentication required");
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Event stream lagged");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    });

    info!("Starting reporting engine...");
    engine
        .start(session)
        .await
        .context("Failed to start reporting engine")?;

    // Run until signal or optional deadline
    let shutdown_signal = setup_shutdown_signal();
    if args.duration > 0 {
        tokio::select! {
            _ = tokio::time::sleep(Duration::from_secs(args.duration)) => {
                info!(duration_secs = args.duration, "Run deadline reached, stopping...");
            }
            _ = shutdown_signal => {
                warn!("Received shutdown signal, stopping...");
            }
        }
    } else {
        shutdown_signal.await;
        warn!("Received shutdown signal, stopping...");
    }

    engine.stop().await;
    event_task.abort();

    print_run_summary(engine.reports_delivered(), engine.reports_failed());
    info!("locstream finished");
    Ok(())
}

/// Setup Ctrl+C and SIGTERM signal handlers
async fn setup_shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// Print configuration summary for dry-run mode
fn print_config_summary(config: &ReporterConfig) {
    println!("\n=== Configuration Summary ===\n");
    println!("Server:");
    println!("  Endpoint: {}", config.server.endpoint);
    println!("  Request timeout: {}s", config.server.request_timeout_s);

    println!("\nSampling:");
    println!("  Interval: {}..{} ms", config.sampling.min_interval_ms, config.sampling.max_interval_ms);
    println!("  Displacement threshold: {} m", config.sampling.min_displacement_m);

    println!("\nSimulated source:");
    println!(
        "  Origin: ({}, {})",
        config.source.start_lat, config.source.start_lng
    );
    println!("  Speed: {} m/s", config.source.speed_mps);

    match config.metrics {
        Some(metrics) => println!("\nMetrics: port {}", metrics.port),
        None => println!("\nMetrics: disabled"),
    }

    println!();
}

/// Print delivery statistics after a run
fn print_run_summary(delivered: u64, failed: u64) {
    let total = delivered + failed;
    println!("\n=== Run Summary ===\n");
    println!("  Reports delivered: {delivered}");
    println!("  Reports failed: {failed}");
    if total > 0 {
        println!(
            "  Delivery rate: {:.1}%",
            (delivered as f64 / total as f64) * 100.0
        );
    }
    println!();
}
