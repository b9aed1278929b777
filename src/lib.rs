//! MCP server for a Toolhouse tool bundle.
//!
//! Exposes exactly two server-side capabilities: list-tools mirrors the
//! bundle's catalog as MCP tool descriptors, and call-tool asks an
//! OpenAI-compatible model to drive the requested tool, executes whatever
//! calls the model proposes through the Toolhouse platform, and returns the
//! model's final answer as a single text content item.

pub mod bridge;
pub mod completion;
pub mod config;
pub mod conversation;
pub mod error;
pub mod http;
pub mod logging;
pub mod orchestrator;
pub mod server;
pub mod toolhouse;
