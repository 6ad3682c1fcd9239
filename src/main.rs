use anyhow::Result;
use log::{error, info};
use std::sync::Arc;

use locator_bridge::cli::{build_cli, handle_subcommands};
use locator_bridge::config::Config;
use locator_bridge::devices::control::CommandChannel;
use locator_bridge::devices::gps::GpsService;
use locator_bridge::services::api_service::{ApiService, ApiServiceState};
use locator_bridge::VERSION;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let matches = build_cli().get_matches();

    let config = match Config::from_matches(&matches) {
        Ok(config) => config,
        Err(e) => {
            error!("❌ Invalid configuration: {}", e);
            return Err(anyhow::anyhow!("{}", e));
        }
    };

    match handle_subcommands(&matches, &config).await {
        Ok(true) => return Ok(()),
        Ok(false) => {}
        Err(e) => {
            error!("❌ Command failed: {}", e);
            return Err(anyhow::anyhow!("{}", e));
        }
    }

    info!("🛰  {} v{}", config.bridge_name, VERSION);
    info!(
        "   📡 GPS in: {} @ {} baud | 🎛  Control out: {} @ {} baud | 🌐 HTTP: {}",
        config.gps.port,
        config.gps.baud_rate,
        config.control.port,
        config.control.baud_rate,
        config.http.port
    );

    // GPS ingest channel: starts streaming immediately, independent of any
    // HTTP request. An unopenable port is logged, not fatal; the GET
    // endpoint simply keeps answering 404 until a fix arrives.
    let gps = GpsService::new(
        config.gps.port.clone(),
        config.gps.baud_rate,
        config.gps.timeout_ms,
    );
    gps.start().await?;

    // Command channel: the port opens lazily on the first POST /api/control.
    let control = Arc::new(CommandChannel::new(
        &config.control.port,
        config.control.baud_rate,
        config.control.timeout_ms,
    ));

    let state = ApiServiceState::new(gps.clone(), control, config.http.surface_send_errors);
    let mut api = ApiService::new(state);
    api.start(config.http.port).await?;

    tokio::signal::ctrl_c().await?;
    info!("🛑 Shutting down...");

    api.stop().await?;
    gps.stop().await?;

    Ok(())
}
