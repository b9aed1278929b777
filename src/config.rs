//! Environment-backed server configuration.

use crate::error::{Result, ServerError};

/// Bundle served when `TOOLHOUSE_BUNDLE_NAME` is unset.
pub const DEFAULT_BUNDLE: &str = "mcp-toolhouse";
/// Model used for both completion calls.
pub const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";
/// Output token bound per completion call.
pub const DEFAULT_MAX_TOKENS: u32 = 1024;
/// Completion endpoint (Groq's OpenAI-compatible API).
pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";

const LLM_PROVIDER: &str = "openai";
const TOOL_PROVIDER: &str = "anthropic";

/// Immutable configuration, constructed once at process start and passed by
/// reference into every component.
///
/// Only the two secrets and the bundle name come from the environment; the
/// remaining fields are fixed in this deployment.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Secret for the Toolhouse platform.
    pub toolhouse_api_key: String,
    /// Bundle whose tools this server exposes.
    pub bundle_name: String,
    /// Secret for the completion endpoint.
    pub llm_api_key: String,
    /// Model identifier sent with every completion request.
    pub model: String,
    /// Maximum output tokens per completion request.
    pub max_tokens: u32,
    /// Platform tool format used for the completion flow.
    pub llm_provider: String,
    /// Platform tool format used for the list-tools catalog.
    pub tool_provider: String,
    /// Base URL of the completion endpoint.
    pub base_url: String,
}

impl ServerConfig {
    /// Read configuration from the process environment (loading `.env`
    /// first if present). Fails before any network activity when a
    /// mandatory secret is absent or empty.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable source. Empty values
    /// are treated as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let lookup = |name: &str| lookup(name).filter(|value| !value.is_empty());

        let toolhouse_api_key = lookup("TOOLHOUSE_API_KEY").ok_or_else(|| {
            ServerError::Configuration("Missing TOOLHOUSE_API_KEY environment variable".into())
        })?;
        let llm_api_key = lookup("GROQ_API_KEY").ok_or_else(|| {
            ServerError::Configuration("Missing GROQ_API_KEY environment variable".into())
        })?;
        let bundle_name =
            lookup("TOOLHOUSE_BUNDLE_NAME").unwrap_or_else(|| DEFAULT_BUNDLE.to_string());

        Ok(Self {
            toolhouse_api_key,
            bundle_name,
            llm_api_key,
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            llm_provider: LLM_PROVIDER.to_string(),
            tool_provider: TOOL_PROVIDER.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars<'a>(pairs: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |name| {
            pairs
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| value.to_string())
        }
    }

    #[test]
    fn missing_toolhouse_secret_is_rejected() {
        let err = ServerConfig::from_lookup(vars(&[("GROQ_API_KEY", "gk")])).unwrap_err();
        assert!(matches!(err, ServerError::Configuration(_)));
        assert!(err.to_string().contains("TOOLHOUSE_API_KEY"));
    }

    #[test]
    fn missing_llm_secret_is_rejected() {
        let err = ServerConfig::from_lookup(vars(&[("TOOLHOUSE_API_KEY", "tk")])).unwrap_err();
        assert!(matches!(err, ServerError::Configuration(_)));
        assert!(err.to_string().contains("GROQ_API_KEY"));
    }

    #[test]
    fn empty_secret_counts_as_missing() {
        let err = ServerConfig::from_lookup(vars(&[
            ("TOOLHOUSE_API_KEY", ""),
            ("GROQ_API_KEY", "gk"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("TOOLHOUSE_API_KEY"));
    }

    #[test]
    fn defaults_fill_non_secret_fields() {
        let config = ServerConfig::from_lookup(vars(&[
            ("TOOLHOUSE_API_KEY", "tk"),
            ("GROQ_API_KEY", "gk"),
        ]))
        .unwrap();

        assert_eq!(config.bundle_name, DEFAULT_BUNDLE);
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.max_tokens, 1024);
        assert_eq!(config.llm_provider, "openai");
        assert_eq!(config.tool_provider, "anthropic");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn bundle_name_is_overridable() {
        let config = ServerConfig::from_lookup(vars(&[
            ("TOOLHOUSE_API_KEY", "tk"),
            ("GROQ_API_KEY", "gk"),
            ("TOOLHOUSE_BUNDLE_NAME", "search-tools"),
        ]))
        .unwrap();

        assert_eq!(config.bundle_name, "search-tools");
    }
}
