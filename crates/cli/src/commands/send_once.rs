//! `send-once` command implementation.

use anyhow::{Context, Result};
use tracing::info;

use contracts::SessionContext;
use engine::ReportingEngine;
use position_source::{SimulatedConfig, SimulatedPositionSource};
use sync_client::{SyncClient, SyncClientConfig};

use crate::cli::SendOnceArgs;

/// Execute the `send-once` command
///
/// One-shot report from the source's current position, no subscription, no
/// lifecycle transition.
pub async fn run_send_once(args: &SendOnceArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading configuration");

    if !args.config.exists() {
        anyhow::bail!("Configuration file not found: {}", args.config.display());
    }

    let config = config_loader::ConfigLoader::load_from_path(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    let source = SimulatedPositionSource::new(SimulatedConfig::from(config.source));
    let client = SyncClient::new(SyncClientConfig::from_server_config(&config.server)?)?;
    let engine = ReportingEngine::new(source, client, config.sampling);

    engine.set_session(SessionContext::new(args.token.clone(), args.room.clone()));

    let (lat, lng) = engine
        .sample_now()
        .await
        .context("Failed to capture a position fix")?;

    if engine.reports_delivered() == 1 {
        println!("✓ Report delivered from ({lat}, {lng})");
        Ok(())
    } else {
        println!("✗ Report from ({lat}, {lng}) was not delivered");
        anyhow::bail!("Report delivery failed")
    }
}
