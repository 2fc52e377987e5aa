//! Parser A (spec.md §4.3): the `message`/`tool_use`/`tool_result`/
//! `usage`/`error` dialect.

use serde_json::Value;

use super::{as_object, str_field};
use crate::error::ParseError;
use crate::event::{Event, Role, ToolPhase};
use crate::registry::VendorParser;

const NAME: &str = "A";

/// USD per input token, used for `type: usage` cost accounting.
const PRICE_PER_INPUT_TOKEN: f64 = 3e-6;
/// USD per output token.
const PRICE_PER_OUTPUT_TOKEN: f64 = 15e-6;

pub struct MessageDialectParser;

impl VendorParser for MessageDialectParser {
    fn name(&self) -> &str {
        NAME
    }

    fn detect(&self, line: &str) -> bool {
        let Some(map) = as_object(line) else {
            return false;
        };
        matches!(
            str_field(&map, "type"),
            Some("message") | Some("tool_use") | Some("tool_result") | Some("usage") | Some("error")
        )
    }

    fn parse(&self, line: &str) -> Result<Vec<Event>, ParseError> {
        let value: Value =
            serde_json::from_str(line).map_err(|e| ParseError::new(NAME, truncate(line), e.to_string()))?;
        let Value::Object(map) = &value else {
            return Ok(vec![Event::Debug { raw: value }]);
        };

        match str_field(map, "type") {
            Some("message") => {
                let role = map
                    .get("role")
                    .and_then(|v| v.as_str())
                    .map(Role::normalize)
                    .unwrap_or(Role::Assistant);
                let text = map
                    .get("content")
                    .and_then(|v| v.as_str())
                    .unwrap_or("")
                    .to_string();
                Ok(vec![Event::Message { role, text }])
            }

            Some("tool_use") => {
                let name = str_field(map, "name").unwrap_or("unknown").to_string();
                let text = map
                    .get("input")
                    .filter(|v| !v.is_null())
                    .map(|v| serde_json::to_string_pretty(v).unwrap_or_default());
                Ok(vec![Event::Tool {
                    name,
                    phase: ToolPhase::Start,
                    text,
                    exit_code: None,
                }])
            }

            Some("tool_result") => {
                let name = str_field(map, "tool_use_id").unwrap_or("unknown").to_string();
                let mut events = Vec::with_capacity(2);

                let has_content = map.get("content").is_some();
                let output = map.get("output").and_then(|v| v.as_str());
                if has_content {
                    if let Some(output) = output {
                        events.push(Event::Tool {
                            name: name.clone(),
                            phase: ToolPhase::Stdout,
                            text: Some(output.to_string()),
                            exit_code: None,
                        });
                    }
                }

                let error = map.get("error");
                if let Some(err) = error {
                    let text = match err {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    };
                    events.push(Event::Tool {
                        name: name.clone(),
                        phase: ToolPhase::Stderr,
                        text: Some(text),
                        exit_code: None,
                    });
                }

                events.push(Event::Tool {
                    name,
                    phase: ToolPhase::End,
                    text: None,
                    exit_code: Some(if error.is_some() { 1 } else { 0 }),
                });

                Ok(events)
            }

            Some("usage") => {
                let input_tokens = map.get("input_tokens").and_then(Value::as_f64).unwrap_or(0.0);
                let output_tokens = map.get("output_tokens").and_then(Value::as_f64).unwrap_or(0.0);
                if input_tokens + output_tokens > 0.0 {
                    let delta_usd =
                        input_tokens * PRICE_PER_INPUT_TOKEN + output_tokens * PRICE_PER_OUTPUT_TOKEN;
                    Ok(vec![Event::Cost { delta_usd }])
                } else {
                    Ok(vec![])
                }
            }

            Some("error") => {
                let message = str_field(map, "message")
                    .or_else(|| str_field(map, "error"))
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| value.to_string());
                Ok(vec![Event::Error { message }])
            }

            _ => Ok(vec![Event::Debug { raw: value.clone() }]),
        }
    }
}

fn truncate(line: &str) -> String {
    const MAX: usize = 500;
    if line.len() <= MAX {
        line.to_string()
    } else {
        line.chars().take(MAX).collect::<String>() + "…"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_known_types_only() {
        let p = MessageDialectParser;
        assert!(p.detect(r#"{"type":"message","role":"user","content":"hi"}"#));
        assert!(p.detect(r#"{"type":"usage","input_tokens":1,"output_tokens":2}"#));
        assert!(!p.detect(r#"{"type":"user","content":"hi"}"#));
        assert!(!p.detect("not json"));
    }

    #[test]
    fn parses_message_with_unknown_role_as_assistant() {
        let p = MessageDialectParser;
        let events = p
            .parse(r#"{"type":"message","role":"alien","content":"hi"}"#)
            .unwrap();
        assert_eq!(
            events,
            vec![Event::Message {
                role: Role::Assistant,
                text: "hi".into()
            }]
        );
    }

    #[test]
    fn tool_lifecycle_matches_scenario_s2() {
        let p = MessageDialectParser;
        let start = p
            .parse(r#"{"type":"tool_use","id":"t1","name":"bash","input":{"command":"ls"}}"#)
            .unwrap();
        assert_eq!(start.len(), 1);
        match &start[0] {
            Event::Tool {
                name,
                phase,
                text,
                exit_code,
            } => {
                assert_eq!(name, "bash");
                assert_eq!(*phase, ToolPhase::Start);
                assert!(text.as_ref().unwrap().contains("ls"));
                assert!(exit_code.is_none());
            }
            _ => panic!("expected tool start"),
        }

        let result = p
            .parse(r#"{"type":"tool_result","tool_use_id":"t1","content":"stdout","output":"a\nb"}"#)
            .unwrap();
        assert_eq!(
            result,
            vec![
                Event::Tool {
                    name: "t1".into(),
                    phase: ToolPhase::Stdout,
                    text: Some("a\nb".into()),
                    exit_code: None
                },
                Event::Tool {
                    name: "t1".into(),
                    phase: ToolPhase::End,
                    text: None,
                    exit_code: Some(0)
                }
            ]
        );
    }

    #[test]
    fn tool_result_with_error_emits_stderr_then_end_exit_1() {
        let p = MessageDialectParser;
        let result = p
            .parse(r#"{"type":"tool_result","tool_use_id":"t1","error":"boom"}"#)
            .unwrap();
        assert_eq!(
            result,
            vec![
                Event::Tool {
                    name: "t1".into(),
                    phase: ToolPhase::Stderr,
                    text: Some("boom".into()),
                    exit_code: None
                },
                Event::Tool {
                    name: "t1".into(),
                    phase: ToolPhase::End,
                    text: None,
                    exit_code: Some(1)
                }
            ]
        );
    }

    #[test]
    fn usage_emits_cost_only_when_tokens_present() {
        let p = MessageDialectParser;
        let zero = p
            .parse(r#"{"type":"usage","input_tokens":0,"output_tokens":0}"#)
            .unwrap();
        assert!(zero.is_empty());

        let some = p
            .parse(r#"{"type":"usage","input_tokens":1000,"output_tokens":500}"#)
            .unwrap();
        match &some[0] {
            Event::Cost { delta_usd } => {
                assert!((*delta_usd - (1000.0 * 3e-6 + 500.0 * 15e-6)).abs() < 1e-12);
            }
            _ => panic!("expected cost event"),
        }
    }

    #[test]
    fn unknown_shape_is_debug_not_error() {
        let p = MessageDialectParser;
        let events = p.parse(r#"{"type":"tool_use"}"#).unwrap();
        // `name` absent, defaults to "unknown"; this is still a valid, known type.
        assert_eq!(events.len(), 1);

        let events = p.parse(r#"{"type":"totally_unknown","x":1}"#).unwrap();
        assert!(matches!(events[0], Event::Debug { .. }));
    }

    #[test]
    fn invalid_json_is_a_parse_error() {
        let p = MessageDialectParser;
        assert!(p.parse("not json").is_err());
    }
}
