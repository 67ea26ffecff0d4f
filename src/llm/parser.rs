//! Turn natural language commands into structured commands
//!
//! The model is not guaranteed to follow the schema. The only local defence
//! is `validate_output`: a syntactic JSON check plus the presence of an
//! `action` key. Semantic correctness is left to the verification stage.

use crate::core::error::{GatewayError, Result};
use crate::llm::client::LlmClient;
use crate::llm::schema::{render_prompt, Priority, StructuredCommand, INNOVATION_MODE};
use serde_json::{Map, Value};

/// Structure a natural language command through the language model
///
/// # Arguments
/// * `client` - The LLM client to use for structuring
/// * `command` - The caller's raw command; must not be blank
pub async fn structure_command(client: &LlmClient, command: &str) -> Result<StructuredCommand> {
    if command.trim().is_empty() {
        return Err(GatewayError::InvalidInput("command is empty".into()));
    }

    let prompt = render_prompt(command);
    let response = client.complete(&prompt).await?;
    let structured = validate_output(&response)?;

    tracing::debug!(
        action = %structured.action,
        features = structured.features.len(),
        constraints = structured.constraints.len(),
        innovation = structured.has_constraint(INNOVATION_MODE),
        "structured command"
    );
    Ok(structured)
}

/// Validate raw model output as a structured command
///
/// Accepts the text bare or wrapped in a single Markdown code fence.
pub fn validate_output(text: &str) -> Result<StructuredCommand> {
    let body = strip_code_fence(text.trim());

    let value: Value = serde_json::from_str(body).map_err(|e| {
        GatewayError::MalformedOutput(format!("response is not valid JSON: {}", e))
    })?;

    let object = value.as_object().ok_or_else(|| {
        GatewayError::MalformedOutput("expected a JSON object at the top level".into())
    })?;

    let action = match object.get("action") {
        Some(Value::String(action)) => action.clone(),
        Some(_) => {
            return Err(GatewayError::MalformedOutput(
                "field `action` must be a string".into(),
            ))
        }
        None => {
            return Err(GatewayError::MalformedOutput(
                "missing required field `action`".into(),
            ))
        }
    };

    Ok(StructuredCommand {
        action,
        features: string_list(object, "features")?,
        constraints: string_list(object, "constraints")?,
        priority: priority(object)?,
        raw: body.to_string(),
    })
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // Drop the info string ("json") on the opening fence line.
    let rest = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => rest,
    };
    rest.trim_end()
        .strip_suffix("```")
        .unwrap_or(rest)
        .trim()
}

fn string_list(object: &Map<String, Value>, key: &str) -> Result<Vec<String>> {
    match object.get(key) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| {
                item.as_str().map(str::to_string).ok_or_else(|| {
                    GatewayError::MalformedOutput(format!(
                        "field `{}` must contain only strings",
                        key
                    ))
                })
            })
            .collect(),
        Some(_) => Err(GatewayError::MalformedOutput(format!(
            "field `{}` must be an array",
            key
        ))),
    }
}

fn priority(object: &Map<String, Value>) -> Result<Option<Priority>> {
    match object.get("priority") {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(level)) => {
            let parsed = Priority::parse(level);
            if parsed.is_none() {
                tracing::warn!(priority = %level, "unrecognised priority, ignoring");
            }
            Ok(parsed)
        }
        Some(_) => Err(GatewayError::MalformedOutput(
            "field `priority` must be a string".into(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::ErrorKind;

    const PAYMENT_APP: &str = r#"{"action":"CREATE_APP","features":["PAYMENT"],"constraints":["LOW_COST","HIGH_SPEED"],"priority":"HIGH"}"#;

    #[test]
    fn test_validate_full_command() {
        let cmd = validate_output(PAYMENT_APP).unwrap();
        assert_eq!(cmd.action, "CREATE_APP");
        assert_eq!(cmd.features, vec!["PAYMENT".to_string()]);
        assert_eq!(
            cmd.constraints,
            vec!["LOW_COST".to_string(), "HIGH_SPEED".to_string()]
        );
        assert_eq!(cmd.priority, Some(Priority::High));
        assert_eq!(cmd.raw, PAYMENT_APP);
    }

    #[test]
    fn test_validate_fenced_output() {
        let fenced = format!("```json\n{}\n```", PAYMENT_APP);
        let cmd = validate_output(&fenced).unwrap();
        assert_eq!(cmd.action, "CREATE_APP");
        assert_eq!(cmd.raw, PAYMENT_APP);
    }

    #[test]
    fn test_validate_rejects_prose() {
        let err = validate_output("Sure! Here is your app plan.").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedOutput);
        assert!(err.to_string().contains("not valid JSON"));
    }

    #[test]
    fn test_validate_rejects_missing_action() {
        let err = validate_output(r#"{"features":["PAYMENT"]}"#).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedOutput);
        assert!(err.to_string().contains("action"));
    }

    #[test]
    fn test_validate_rejects_non_object() {
        let err = validate_output(r#"["CREATE_APP"]"#).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedOutput);
    }

    #[test]
    fn test_validate_minimal_command() {
        let cmd = validate_output(r#"{"action":"UPDATE_LOGIC"}"#).unwrap();
        assert!(cmd.features.is_empty());
        assert!(cmd.constraints.is_empty());
        assert_eq!(cmd.priority, None);
    }

    #[test]
    fn test_validate_unknown_priority_is_dropped() {
        let cmd = validate_output(r#"{"action":"CREATE_APP","priority":"ASAP"}"#).unwrap();
        assert_eq!(cmd.priority, None);
    }

    #[test]
    fn test_validate_rejects_wrongly_typed_features() {
        let err = validate_output(r#"{"action":"CREATE_APP","features":"PAYMENT"}"#).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedOutput);
    }

    #[test]
    fn test_innovation_constraint_lookup() {
        let cmd = validate_output(
            r#"{"action":"CREATE_APP","constraints":["INNOVATION_MODE"]}"#,
        )
        .unwrap();
        assert!(cmd.has_constraint(crate::llm::schema::INNOVATION_MODE));
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn validate_never_panics(text in ".*") {
                let _ = validate_output(&text);
            }

            #[test]
            fn non_object_json_is_malformed(n in any::<i64>(), s in "[a-zA-Z ]{0,20}") {
                for text in [n.to_string(), serde_json::to_string(&s).unwrap()] {
                    let err = validate_output(&text).unwrap_err();
                    prop_assert_eq!(err.kind(), ErrorKind::MalformedOutput);
                }
            }

            #[test]
            fn any_string_action_is_accepted(action in "[A-Z_]{1,24}") {
                let text = serde_json::json!({ "action": action.clone() }).to_string();
                let cmd = validate_output(&text).unwrap();
                prop_assert_eq!(cmd.action, action);
            }
        }
    }
}
