//! Irrigation Dashboard CLI
//!
//! Serves the operator console for an irrigation monitoring backend.

use std::path::PathBuf;

use clap::Parser;
use irrigation_dashboard::{load_config, Config, DashboardBuilder};
use tracing::Level;

#[derive(Parser)]
#[command(name = "irrigation-dashboard")]
#[command(about = "Operator dashboard for an irrigation monitoring backend")]
#[command(version)]
struct Args {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Dashboard port (overrides config file)
    #[arg(short, long)]
    port: Option<u16>,

    /// Backend API base URL (overrides config file)
    #[arg(long)]
    backend_url: Option<String>,

    /// Log level
    #[arg(short, long, default_value = "info")]
    log_level: Level,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(args.log_level)
        .init();

    tracing::debug!(
        "Parsed command line arguments: config={:?}, port={:?}, backend_url={:?}, log_level={:?}",
        args.config,
        args.port,
        args.backend_url,
        args.log_level
    );

    let mut config = if let Some(config_path) = &args.config {
        tracing::debug!("Loading configuration from {:?}", config_path);
        load_config(config_path)?
    } else {
        tracing::debug!("Using default configuration");
        Config::default()
    };

    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(backend_url) = args.backend_url {
        config.backend.base_url = backend_url;
    }

    tracing::info!("Starting irrigation dashboard");

    DashboardBuilder::new(config).build().await?.start().await?;

    Ok(())
}
