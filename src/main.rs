//! Bridge server entry point.
//!
//! Loads configuration, runs the one-time tool registration phase, and
//! serves the HTTP transport until shutdown.

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

use supercommerce_mcp_server::core::transport::HttpTransport;
use supercommerce_mcp_server::core::{BridgeServer, Config};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env();
    init_logging(&config.logging.level);

    info!("Starting {} v{}", config.server.name, config.server.version);

    // Registration phase completes before the transport accepts requests.
    let server = BridgeServer::new(config.clone());

    let transport = HttpTransport::new(config.transport);
    transport.run(server).await?;

    info!("Server shutting down");
    Ok(())
}

/// Logs go to stderr so stdout stays free for protocol traffic.
/// `MCP_LOG_LEVEL` seeds the filter; explicit `RUST_LOG` directives win.
fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}
