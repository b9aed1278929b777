//! Client for the hosted chat-completions endpoint (OpenAI-compatible).

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::config::ServerConfig;
use crate::conversation::JsonObject;
use crate::error::Result;
use crate::http::{bearer_headers, shared_client, status_to_error};

/// One completion endpoint, bound to a model and token budget. Re-created
/// from configuration on every call-tool invocation.
pub struct CompletionClient {
    api_key: String,
    base_url: String,
    model: String,
    max_tokens: u32,
}

impl CompletionClient {
    pub fn new(config: &ServerConfig) -> Self {
        Self {
            api_key: config.llm_api_key.clone(),
            base_url: config.base_url.clone(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
        }
    }

    /// Override the endpoint (tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Issue one completion request with the given conversation and tool
    /// set. Tools are passed through in the platform's wire format.
    pub async fn complete(
        &self,
        messages: &[JsonObject],
        tools: &[Value],
    ) -> Result<ChatCompletion> {
        let mut body = serde_json::json!({
            "model": self.model,
            "max_tokens": self.max_tokens,
            "messages": messages,
        });
        if !tools.is_empty() {
            body["tools"] = Value::Array(tools.to_vec());
        }

        let url = format!("{}/chat/completions", self.base_url);
        debug!(model = %self.model, turns = messages.len(), "chat completion request");

        let resp = shared_client()
            .post(&url)
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
}

/// Decoded chat-completion response. Choice messages are kept as the raw
/// JSON objects the endpoint returned.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletion {
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoice {
    pub message: JsonObject,
}

impl ChatCompletion {
    /// Message object of the first choice, if any.
    pub fn first_message(&self) -> Option<&JsonObject> {
        self.choices.first().map(|choice| &choice.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn response_decoding_keeps_unknown_message_fields() {
        let completion: ChatCompletion = serde_json::from_value(json!({
            "id": "cmpl-1",
            "choices": [{
                "index": 0,
                "finish_reason": "stop",
                "message": {
                    "role": "assistant",
                    "content": "hi",
                    "refusal": null,
                }
            }],
            "usage": {"total_tokens": 12},
        }))
        .unwrap();

        let message = completion.first_message().unwrap();
        assert_eq!(message["content"], "hi");
        assert!(message.contains_key("refusal"));
    }

    #[test]
    fn first_message_is_none_without_choices() {
        let completion: ChatCompletion = serde_json::from_value(json!({"choices": []})).unwrap();
        assert!(completion.first_message().is_none());
    }
}
