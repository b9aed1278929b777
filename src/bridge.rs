//! Converts the platform's tool catalog into MCP tool descriptors.

use std::borrow::Cow;
use std::sync::Arc;

use rmcp::model::Tool;
use serde_json::Value;
use tracing::error;

use crate::error::{Result, ServerError};
use crate::toolhouse::Toolhouse;

/// list-tools operation: fetch the catalog for `bundle` and map each entry
/// 1:1 into the protocol descriptor shape, order preserved. Any failure is
/// logged and re-signaled as a tool-fetch error; no platform error type
/// crosses into the transport shim.
pub async fn list_bundle_tools(platform: &Toolhouse, bundle: &str) -> Result<Vec<Tool>> {
    match fetch_descriptors(platform, bundle).await {
        Ok(tools) => Ok(tools),
        Err(e) => {
            error!(error = %e, bundle, "tool listing failed");
            Err(ServerError::tool_fetch(e))
        }
    }
}

async fn fetch_descriptors(platform: &Toolhouse, bundle: &str) -> Result<Vec<Tool>> {
    let catalog = platform.get_tools(bundle).await?;
    catalog.into_iter().map(parse_descriptor).collect()
}

/// Map one catalog entry's `{name, description, input_schema}` triple into
/// an MCP descriptor, parameter schema preserved verbatim.
fn parse_descriptor(entry: Value) -> Result<Tool> {
    let name = entry
        .get("name")
        .and_then(Value::as_str)
        .ok_or_else(|| missing_field(&entry, "name"))?
        .to_string();
    let description = entry
        .get("description")
        .and_then(Value::as_str)
        .ok_or_else(|| missing_field(&entry, "description"))?
        .to_string();
    let input_schema = match entry.get("input_schema") {
        Some(Value::Object(schema)) => schema.clone(),
        _ => return Err(missing_field(&entry, "input_schema")),
    };

    Ok(Tool::new(
        Cow::Owned(name),
        Cow::Owned(description),
        Arc::new(input_schema),
    ))
}

fn missing_field(entry: &Value, field: &str) -> ServerError {
    let name = entry.get("name").and_then(Value::as_str).unwrap_or("?");
    ServerError::MalformedCatalog(format!("tool '{name}' has no usable '{field}' field"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parse_descriptor_preserves_the_schema_verbatim() {
        let tool = parse_descriptor(json!({
            "name": "web_search",
            "description": "Search the web",
            "input_schema": {
                "type": "object",
                "properties": {"query": {"type": "string"}},
                "required": ["query"],
            },
        }))
        .unwrap();

        assert_eq!(tool.name, "web_search");
        assert_eq!(tool.description.as_deref(), Some("Search the web"));
        assert_eq!(tool.input_schema["required"], json!(["query"]));
    }

    #[test]
    fn parse_descriptor_rejects_entries_missing_a_field() {
        let err = parse_descriptor(json!({
            "name": "broken",
            "input_schema": {"type": "object"},
        }))
        .unwrap_err();

        assert!(matches!(err, ServerError::MalformedCatalog(_)));
        assert!(err.to_string().contains("description"));
    }

    #[test]
    fn parse_descriptor_rejects_non_object_schemas() {
        let err = parse_descriptor(json!({
            "name": "broken",
            "description": "schema is a string",
            "input_schema": "not-a-schema",
        }))
        .unwrap_err();

        assert!(err.to_string().contains("input_schema"));
    }
}
