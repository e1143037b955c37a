//! MCP Server Entry Point
//!
//! Reads configuration from the environment, sets up logging on stderr and
//! serves JSON-RPC over STDIO until stdin is closed.
//!
//! Environment Variables:
//! - SERVER_NAME: Name of the server (default: "rave")
//! - SERVER_VERSION: Version string (default: "1.0.0")
//! - RAVE_API_KEY: Shared secret for the physician map tool
//! - RAVE_MAP_API_URL: Map generation endpoint
//! - RAVE_MAP_TIMEOUT_SECS: Timeout for map requests (default: 30)
//! - RUST_LOG: Log filter (default: "info")

use rave_mcp::core::config::{self, Config};
use rave_mcp::core::error::ServerError;
use rave_mcp::core::server;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), ServerError> {
    // stdout carries the protocol, so logs must go to stderr
    let filter = EnvFilter::new(config::get_env_var("RUST_LOG", "info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false)
        .compact()
        .init();

    let config = Config::from_env();
    if let Err(e) = server::run_server_stdio(config).await {
        tracing::error!(error = %e, "server stopped");
        return Err(e);
    }
    Ok(())
}
