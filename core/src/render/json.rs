//! The JSON passthrough renderer (spec.md §4.5.3): stateless per event.

use super::Renderer;
use crate::event::Event;
use crate::options::FormatOptions;

pub struct JsonRenderer {
    opts: FormatOptions,
}

impl JsonRenderer {
    pub fn new(opts: FormatOptions) -> Self {
        Self { opts }
    }

    fn to_value(&self, event: &Event) -> serde_json::Value {
        let mut value = event_to_value(event);
        if self.opts.show_timestamps {
            if let Some(obj) = value.as_object_mut() {
                obj.insert(
                    "timestamp".to_string(),
                    serde_json::Value::String(crate::render::now_rfc3339()),
                );
            }
        }
        value
    }
}

/// Record-tag values for the `t` discriminant field. `msg` is spec.md
/// §8 scenario S1's literal tag for a Message record; the others follow
/// the same abbreviated-tag convention.
fn event_to_value(event: &Event) -> serde_json::Value {
    match event {
        Event::Message { role, text } => serde_json::json!({"t": "msg", "role": role.as_str(), "text": text}),
        Event::Tool {
            name,
            phase,
            text,
            exit_code,
        } => serde_json::json!({
            "t": "tool",
            "name": name,
            "phase": phase.as_str(),
            "text": text,
            "exit_code": exit_code,
        }),
        Event::Cost { delta_usd } => {
            serde_json::json!({"t": "cost", "delta_usd": crate::event::finite_or_zero(*delta_usd)})
        }
        Event::Error { message } => serde_json::json!({"t": "error", "message": message}),
        Event::Debug { raw } => serde_json::json!({"t": "debug", "raw": raw}),
    }
}

impl Renderer for JsonRenderer {
    fn render(&mut self, event: &Event) -> String {
        if self.opts.suppresses(event.kind()) {
            return String::new();
        }
        let value = self.to_value(event);
        let mut line = if self.opts.compact_mode {
            serde_json::to_string(&value).unwrap_or_default()
        } else {
            serde_json::to_string_pretty(&value).unwrap_or_default()
        };
        line.push('\n');
        line
    }

    fn flush(&mut self) -> String {
        String::new()
    }
}
