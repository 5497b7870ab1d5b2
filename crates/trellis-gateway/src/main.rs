//! Trellis Gateway — entry point.
//!
//! Starts the HTTP façade with configuration from a TOML file or defaults.

mod api;
mod config;
mod extract;
mod state;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use trellis_agent::AgentResolver;
use trellis_registry::RegistryClient;

use config::GatewayConfig;
use state::AppState;

/// Trellis Gateway
#[derive(Parser, Debug)]
#[command(name = "trellis-gateway", version, about = "Trellis Gateway")]
struct Args {
    /// Path to the configuration file (TOML).
    #[arg(short, long, default_value = "trellis.toml")]
    config: PathBuf,

    /// Override the API port.
    #[arg(long)]
    port: Option<u16>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Generate a default config file and exit.
    #[arg(long)]
    init: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize tracing
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    // Handle --init flag
    if args.init {
        let config = GatewayConfig::default();
        config.save(&args.config)?;
        tracing::info!(path = %args.config.display(), "wrote default config");
        return Ok(());
    }

    // Load configuration
    let mut config = GatewayConfig::load(&args.config)?;

    // Apply CLI overrides
    if let Some(port) = args.port {
        config.api.port = port;
    }
    config.logging.level = args.log_level;

    tracing::info!("Trellis Gateway v{}", env!("CARGO_PKG_VERSION"));

    let resolver = AgentResolver::new(config.agent.clone());
    let registry = RegistryClient::new(&config.registry)?;
    let state = Arc::new(AppState { resolver, registry });

    let listen_addr = config.api.socket_addr().parse()?;
    api::start_api_server(listen_addr, state).await?;

    tracing::info!("Trellis gateway exited cleanly");
    Ok(())
}
