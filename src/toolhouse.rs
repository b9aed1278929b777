//! Client for the Toolhouse tool-execution platform.

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::completion::ChatCompletion;
use crate::conversation::JsonObject;
use crate::error::Result;
use crate::http::{bearer_headers, shared_client, status_to_error};

const DEFAULT_BASE_URL: &str = "https://api.toolhouse.ai/v1";

/// Platform client, re-created on every request. The provider selects the
/// wire format of the tool catalog ("anthropic" for the list-tools path,
/// "openai" for the completion flow).
pub struct Toolhouse {
    api_key: String,
    provider: String,
    base_url: String,
    metadata: JsonObject,
}

impl Toolhouse {
    pub fn new(api_key: impl Into<String>, provider: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            provider: provider.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            metadata: JsonObject::new(),
        }
    }

    /// Override the platform endpoint (tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Tag subsequent requests with a caller-identity metadata entry.
    pub fn set_metadata(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.metadata.insert(key.into(), value.into());
    }

    /// Fetch the tool catalog for a bundle, preserved verbatim in this
    /// client's provider format and in platform order.
    pub async fn get_tools(&self, bundle: &str) -> Result<Vec<Value>> {
        let body = serde_json::json!({
            "bundle": bundle,
            "provider": self.provider,
            "metadata": self.metadata,
        });
        debug!(bundle, provider = %self.provider, "fetching tool catalog");

        let resp = shared_client()
            .post(format!("{}/get_tools", self.base_url))
            .headers(bearer_headers(&self.api_key))
            .json(&body)
            .send()
            .await?;

        let status = resp.status().as_u16();
        if status != 200 {
            let body_text = resp.text().await.unwrap_or_default();
            return Err(status_to_error(status, &body_text));
        }

        Ok(resp.json().await?)
    }

    /// Execute the tool calls proposed by a completion. Returns the turns
    /// to append to the conversation: the proposing assistant message
    /// first, then one tool-result turn per call. A completion that
    /// proposes no calls yields no turns and touches no network.
    pub async fn run_tools(&self, completion: &ChatCompletion) -> Result<Vec<JsonObject>> {
        let Some(message) = completion.first_message() else {
            return Ok(Vec::new());
        };
        let calls = match message.get("tool_calls").and_then(Value::as_array) {
            Some(calls) if !calls.is_empty() => calls,
            _ => return Ok(Vec::new()),
        };

        let mut turns = vec![message.clone()];
        for call in calls {
            turns.push(self.run_tool_call(call).await?);
        }
        Ok(turns)
    }

    async fn run_tool_call(&self, call: &Value) -> Result<JsonObject> {
        let body = serde_json::json!({
            "content": call,
            "provider": self.provider,
            "metadata": self.metadata,
        });
        debug!(provider = %self.provider, "running proposed tool call");

        let resp = shared_client()
            .post(format!("{}/run_tools", self.base_url))
            .headers(bearer_headers(&self.api_key))
            .json(&body)
            .send()
            .await?;

        let status = resp.status().as_u16();
        if status != 200 {
            let body_text = resp.text().await.unwrap_or_default();
            return Err(status_to_error(status, &body_text));
        }

        let run: RunToolsResponse = resp.json().await?;
        Ok(run.content)
    }
}

#[derive(Deserialize)]
struct RunToolsResponse {
    content: JsonObject,
}
