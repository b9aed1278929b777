//! Per-request conversation assembly and turn sanitization.

use serde_json::Value;

use crate::error::{Result, ServerError};

/// A conversation turn kept as a raw JSON object so that fields added by
/// the platform or the completion endpoint survive verbatim.
pub type JsonObject = serde_json::Map<String, Value>;

/// Upper bound on the rendered argument payload embedded in the prompt.
pub const MAX_ARGUMENT_BYTES: usize = 64 * 1024;

/// Keys stripped from every turn before the final completion call; the
/// completion endpoint rejects them on inbound messages.
const STRIPPED_KEYS: [&str; 2] = ["audio", "refusal"];

/// Render caller arguments as canonical JSON. Absent arguments render as
/// `null`; payloads over [`MAX_ARGUMENT_BYTES`] are rejected.
pub fn render_arguments(arguments: Option<&Value>) -> Result<String> {
    let rendered = match arguments {
        Some(value) => serde_json::to_string(value)?,
        None => "null".to_string(),
    };
    if rendered.len() > MAX_ARGUMENT_BYTES {
        return Err(ServerError::InvalidArgument(format!(
            "argument payload is {} bytes, limit is {MAX_ARGUMENT_BYTES}",
            rendered.len()
        )));
    }
    Ok(rendered)
}

/// Build the single user turn that opens every call-tool conversation.
/// There is no system message and no history.
pub fn initial_message(tool: &str, arguments: Option<&Value>) -> Result<JsonObject> {
    let rendered = render_arguments(arguments)?;
    let mut turn = JsonObject::new();
    turn.insert("role".into(), Value::String("user".into()));
    turn.insert(
        "content".into(),
        Value::String(format!(
            "Can you use the tool {tool}? Here is some more information \
             that I give you to complete your task: {rendered}"
        )),
    );
    Ok(turn)
}

/// Strip non-portable keys from every turn, in place. All other fields and
/// the turn ordering are untouched.
pub fn sanitize_turns(turns: &mut [JsonObject]) {
    for turn in turns.iter_mut() {
        for key in STRIPPED_KEYS {
            turn.remove(key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn turn(value: Value) -> JsonObject {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn render_arguments_is_compact_canonical_json() {
        let args = json!({"msg": {"text": "hi"}});
        assert_eq!(
            render_arguments(Some(&args)).unwrap(),
            r#"{"msg":{"text":"hi"}}"#
        );
    }

    #[test]
    fn render_arguments_without_value_is_null() {
        assert_eq!(render_arguments(None).unwrap(), "null");
    }

    #[test]
    fn render_arguments_rejects_oversized_payloads() {
        let big = json!({"blob": "x".repeat(MAX_ARGUMENT_BYTES)});
        let err = render_arguments(Some(&big)).unwrap_err();
        assert!(matches!(err, ServerError::InvalidArgument(_)));
    }

    #[test]
    fn initial_message_embeds_tool_name_and_arguments() {
        let message = initial_message("echo", Some(&json!({"msg": "hi"}))).unwrap();

        assert_eq!(message["role"], "user");
        let content = message["content"].as_str().unwrap();
        assert!(content.contains("the tool echo"));
        assert!(content.contains(r#"{"msg":"hi"}"#));
    }

    #[test]
    fn sanitize_strips_audio_and_refusal_only() {
        let mut turns = vec![turn(json!({
            "role": "assistant",
            "content": "ok",
            "audio": {"id": "a1"},
            "refusal": null,
            "tool_calls": [{"id": "call_1"}],
        }))];

        sanitize_turns(&mut turns);

        assert_eq!(
            turns[0],
            turn(json!({
                "role": "assistant",
                "content": "ok",
                "tool_calls": [{"id": "call_1"}],
            }))
        );
    }

    #[test]
    fn sanitize_is_idempotent_and_keeps_ordering() {
        let mut turns = vec![
            turn(json!({"role": "user", "content": "first", "audio": 1})),
            turn(json!({"role": "tool", "content": "second", "refusal": "no"})),
        ];

        sanitize_turns(&mut turns);
        let once = turns.clone();
        sanitize_turns(&mut turns);

        assert_eq!(turns, once);
        assert_eq!(turns[0]["content"], "first");
        assert_eq!(turns[1]["content"], "second");
    }
}
