//! Binary entry point for the Toolhouse MCP server.

use toolhouse_mcp::config::ServerConfig;
use toolhouse_mcp::{logging, server};

const LOG_FILE: &str = "mcp-toolhouse.log";

#[tokio::main]
async fn main() {
    let _log_guard = logging::init(LOG_FILE);

    // Configuration is validated before the stream is opened; a missing
    // secret aborts here with no network activity.
    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "invalid configuration");
            std::process::exit(1);
        }
    };

    if let Err(e) = server::run(config).await {
        tracing::error!(error = %e, "server exited with error");
        std::process::exit(1);
    }
}
