//! Parser B (spec.md §4.3): the `user`/`assistant`/`metadata` turn dialect.
//!
//! Its discriminator is a subset of the message dialect's possible shapes
//! (both use a top-level `type` string), so this parser must always be
//! registered at a lower priority than [`super::MessageDialectParser`].

use serde_json::Value;

use super::{as_object, str_field};
use crate::error::ParseError;
use crate::event::{Event, Role};
use crate::registry::VendorParser;

const NAME: &str = "B";

const PRICE_PER_INPUT_TOKEN: f64 = 1e-6;
const PRICE_PER_OUTPUT_TOKEN: f64 = 3e-6;

pub struct TurnDialectParser;

impl VendorParser for TurnDialectParser {
    fn name(&self) -> &str {
        NAME
    }

    fn detect(&self, line: &str) -> bool {
        let Some(map) = as_object(line) else {
            return false;
        };
        matches!(
            str_field(&map, "type"),
            Some("user") | Some("assistant") | Some("metadata")
        )
    }

    fn parse(&self, line: &str) -> Result<Vec<Event>, ParseError> {
        let value: Value =
            serde_json::from_str(line).map_err(|e| ParseError::new(NAME, truncate(line), e.to_string()))?;
        let Value::Object(map) = &value else {
            return Ok(vec![Event::Debug { raw: value }]);
        };

        match str_field(map, "type") {
            Some(t @ "user") | Some(t @ "assistant") => {
                let role = Role::normalize(t);
                let text = map
                    .get("content")
                    .and_then(|v| v.as_str())
                    .unwrap_or("")
                    .to_string();
                Ok(vec![Event::Message { role, text }])
            }

            Some("metadata") => {
                let usage = map.get("usage").and_then(Value::as_object);
                let input_tokens = usage
                    .and_then(|u| u.get("input_tokens"))
                    .and_then(Value::as_f64)
                    .unwrap_or(0.0);
                let output_tokens = usage
                    .and_then(|u| u.get("output_tokens"))
                    .and_then(Value::as_f64)
                    .unwrap_or(0.0);
                if input_tokens + output_tokens > 0.0 {
                    let delta_usd =
                        input_tokens * PRICE_PER_INPUT_TOKEN + output_tokens * PRICE_PER_OUTPUT_TOKEN;
                    Ok(vec![Event::Cost { delta_usd }])
                } else {
                    Ok(vec![])
                }
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
