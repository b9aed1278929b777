//! Error types for the Toolhouse MCP server.

use thiserror::Error;

type BoxedCause = Box<dyn std::error::Error + Send + Sync>;

/// Primary error type for all server operations.
///
/// `Configuration` and `Startup` are fatal and abort the process before or
/// during stream setup. `ToolFetch` and `ToolExecution` are the only kinds
/// that cross an operation boundary into the transport shim; everything
/// else is internal and gets re-wrapped at the boundary with the original
/// cause chained.
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Failed to list tools: {message}")]
    ToolFetch {
        message: String,
        #[source]
        source: Option<BoxedCause>,
    },

    #[error("Failed to execute tool: {message}")]
    ToolExecution {
        message: String,
        #[source]
        source: Option<BoxedCause>,
    },

    #[error("Server startup failed: {0}")]
    Startup(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Malformed catalog entry: {0}")]
    MalformedCatalog(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl ServerError {
    /// Create an API error from a non-success response.
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Wrap a list-tools failure, keeping the cause's message and chaining
    /// the cause itself.
    pub fn tool_fetch(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::ToolFetch {
            message: source.to_string(),
            source: Some(Box::new(source)),
        }
    }

    /// Wrap a call-tool failure, keeping the cause's message and chaining
    /// the cause itself.
    pub fn tool_execution(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::ToolExecution {
            message: source.to_string(),
            source: Some(Box::new(source)),
        }
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, ServerError>;
