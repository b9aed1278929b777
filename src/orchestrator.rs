//! The call-tool flow: two completion calls around one platform execution.

use serde_json::Value;
use tracing::{debug, error};

use crate::completion::CompletionClient;
use crate::config::ServerConfig;
use crate::conversation::{initial_message, sanitize_turns};
use crate::error::{Result, ServerError};
use crate::toolhouse::Toolhouse;

/// Identity tag attached to every platform request made on behalf of a
/// call-tool invocation.
const METADATA_ID: &str = "mcp-toolhouse";

/// call-tool operation entry point. Clients are rebuilt from configuration
/// on every invocation; nothing is reused or cached across calls.
pub async fn call_tool(
    config: &ServerConfig,
    tool: &str,
    arguments: Option<&Value>,
) -> Result<String> {
    let mut platform = Toolhouse::new(&config.toolhouse_api_key, &config.llm_provider);
    platform.set_metadata("id", METADATA_ID);
    let completions = CompletionClient::new(config);

    execute(&platform, &completions, &config.bundle_name, tool, arguments).await
}

/// Run the flow with the given clients. Any failure is logged and
/// re-signaled as a tool-execution error with the cause chained; there is
/// no partial result.
pub async fn execute(
    platform: &Toolhouse,
    completions: &CompletionClient,
    bundle: &str,
    tool: &str,
    arguments: Option<&Value>,
) -> Result<String> {
    match run_flow(platform, completions, bundle, tool, arguments).await {
        Ok(answer) => Ok(answer),
        Err(e) => {
            error!(error = %e, tool, "tool execution failed");
            Err(ServerError::tool_execution(e))
        }
    }
}

/// Exactly two completion requests per call; the platform runner is
/// invoked at most once, strictly between them.
async fn run_flow(
    platform: &Toolhouse,
    completions: &CompletionClient,
    bundle: &str,
    tool: &str,
    arguments: Option<&Value>,
) -> Result<String> {
    let mut turns = vec![initial_message(tool, arguments)?];
    let tools = platform.get_tools(bundle).await?;
    debug!(tool, bundle, tools = tools.len(), "starting tool flow");

    let first = completions.complete(&turns, &tools).await?;
    turns.extend(platform.run_tools(&first).await?);
    sanitize_turns(&mut turns);

    let second = completions.complete(&turns, &tools).await?;
    let answer = second
        .first_message()
        .map(|message| message.get("content").cloned().unwrap_or(Value::Null))
        .ok_or_else(|| ServerError::api(200, "no choices in completion response"))?;

    Ok(serde_json::to_string_pretty(&answer)?)
}
