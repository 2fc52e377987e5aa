//! Parser C (spec.md §4.3): the `phase`/`task` dialect.
//!
//! Disjoint from both the message and turn dialects (neither uses a
//! `phase` field), but must still outrank the turn dialect in case a line
//! happens to carry both a `type` and a `phase` key.

use serde_json::Value;

use super::{as_object, str_field};
use crate::error::ParseError;
use crate::event::{Event, ToolPhase};
use crate::registry::VendorParser;

const NAME: &str = "C";

pub struct PhaseDialectParser;

impl VendorParser for PhaseDialectParser {
    fn name(&self) -> &str {
        NAME
    }

    fn detect(&self, line: &str) -> bool {
        let Some(map) = as_object(line) else {
            return false;
        };
        let has_task = map.get("task").and_then(Value::as_str).is_some();
        has_task
            && matches!(
                str_field(&map, "phase"),
                Some("start") | Some("output") | Some("end")
            )
    }

    fn parse(&self, line: &str) -> Result<Vec<Event>, ParseError> {
        let value: Value =
            serde_json::from_str(line).map_err(|e| ParseError::new(NAME, truncate(line), e.to_string()))?;
        let Value::Object(map) = &value else {
            return Ok(vec![Event::Debug { raw: value }]);
        };

        let name = str_field(map, "task").unwrap_or("unknown").to_string();

        match str_field(map, "phase") {
            Some("start") => Ok(vec![Event::Tool {
                name,
                phase: ToolPhase::Start,
                text: None,
                exit_code: None,
            }]),

            Some("output") => {
                let phase = match str_field(map, "type") {
                    Some("stderr") => ToolPhase::Stderr,
                    _ => ToolPhase::Stdout,
                };
                let text = map.get("content").and_then(|v| v.as_str()).map(str::to_string);
                Ok(vec![Event::Tool {
                    name,
                    phase,
                    text,
                    exit_code: None,
                }])
            }

            Some("end") => {
                let exit_code = map
                    .get("exitCode")
                    .and_then(Value::as_i64)
                    .map(|n| n as i32)
                    .unwrap_or(0);
                Ok(vec![Event::Tool {
                    name,
                    phase: ToolPhase::End,
                    text: None,
                    exit_code: Some(exit_code),
                }])
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
