//! The HTML-fragment renderer (spec.md §4.5.2).

use std::collections::HashMap;

use super::escape::html_escape;
use super::markup::{is_fence_delimiter, tokenize, Token};
use super::tool_state::{truncate_chars, ToolState};
use super::Renderer;
use crate::event::{finite_or_zero, Event, EventKind, ToolPhase};
use crate::options::FormatOptions;

const DEBUG_FALLBACK: &str = "<!-- unrenderable debug payload -->";

pub struct HtmlRenderer {
    opts: FormatOptions,
    tools: HashMap<String, ToolState>,
}

impl HtmlRenderer {
    pub fn new(opts: FormatOptions) -> Self {
        Self {
            opts,
            tools: HashMap::new(),
        }
    }

    fn resolve_name(name: &str) -> String {
        if name.is_empty() {
            "unknown-tool".to_string()
        } else {
            name.to_string()
        }
    }

    fn render_message(&self, role: &str, text: &str) -> String {
        let role_class = if role.is_empty() { "unknown" } else { role };
        let icon = match role_class {
            "user" => "👤",
            "assistant" => "🤖",
            "system" => "⚙",
            _ => "❔",
        };
        let content = self.render_content(text);
        format!(
            "<div class=\"message message-{role_class}\"><div class=\"message-header\">{icon} {role_class}</div><div class=\"message-content\">{content}</div></div>"
        )
    }

    fn render_content(&self, text: &str) -> String {
        let mut lines_out = Vec::new();
        let mut in_fence = false;
        for line in text.split('\n') {
            if is_fence_delimiter(line) {
                in_fence = !in_fence;
                lines_out.push(html_escape(line));
                continue;
            }
            if in_fence {
                lines_out.push(html_escape(line));
            } else {
                lines_out.push(self.render_inline(line));
            }
        }
        lines_out.join("<br>")
    }

    fn render_inline(&self, line: &str) -> String {
        let escaped = html_escape(line);
        tokenize(&escaped, true)
            .into_iter()
            .map(Self::render_token)
            .collect()
    }

    fn render_token(token: Token) -> String {
        match token {
            Token::Text(t) => t,
            Token::Code(t) => format!("<code>{t}</code>"),
            Token::Italic(t) => format!("<em>{t}</em>"),
            Token::Bold(inner) => {
                let rendered: String = inner.into_iter().map(Self::render_token).collect();
                format!("<strong>{rendered}</strong>")
            }
        }
    }

    fn param_summary(&self, name: &str, text: Option<&str>) -> Option<String> {
        let text = text?;
        let value: serde_json::Value = serde_json::from_str(text).ok()?;
        let obj = value.as_object()?;
        let lname = name.to_lowercase();
        if lname.contains("write") {
            obj.get("file_path").and_then(|v| v.as_str()).map(|p| p.to_string())
        } else if lname.contains("bash") {
            obj.get("command")
                .and_then(|v| v.as_str())
                .map(|c| truncate_chars(c, 60))
        } else {
            None
        }
    }

    fn render_tool(&mut self, name: &str, phase: ToolPhase, text: Option<&str>, exit_code: Option<i32>) -> String {
        let name = Self::resolve_name(name);
        let escaped_name = html_escape(&name);
        match phase {
            ToolPhase::Start => {
                self.tools.insert(name.clone(), ToolState::new(self.opts.collapse_tools));
                let summary = self
                    .param_summary(&name, text)
                    .map(|s| format!("<span class=\"tool-params\">{}</span>", html_escape(&s)))
                    .unwrap_or_default();
                format!(
                    "<div class=\"tool-execution\" data-tool=\"{escaped_name}\"><div class=\"tool-header\">{escaped_name}{summary}</div><div class=\"tool-output\">"
                )
            }
            ToolPhase::Stdout | ToolPhase::Stderr => {
                let Some(state) = self.tools.get_mut(&name) else {
                    return String::new();
                };
                let text = text.unwrap_or_default();
                if state.collapsed {
                    for line in text.split('\n') {
                        state.push_line(line);
                    }
                    return String::new();
                }
                let class = if phase == ToolPhase::Stderr { "tool-stderr" } else { "tool-stdout" };
                format!("<div class=\"{class}\">{}</div>", html_escape(text))
            }
            ToolPhase::End => {
                let Some(state) = self.tools.remove(&name) else {
                    return format!("<div class=\"tool-end unknown\">{escaped_name} (unknown duration)</div>");
                };
                let mut out = String::new();
                if state.collapsed && !state.buffer.is_empty() {
                    let mut summary = truncate_chars(&state.buffer.replace('\n', " "), 100);
                    if state.truncated {
                        summary.push_str(" (truncated)");
                    }
                    out.push_str(&format!("<div class=\"tool-summary\">{}</div>", html_escape(&summary)));
                }
                out.push_str("</div>");
                let ok = exit_code.unwrap_or(0) == 0;
                let status_class = if ok { "success" } else { "error" };
                let duration = state.duration_ms();
                out.push_str(&format!(
                    "<div class=\"tool-end {status_class}\">{escaped_name} finished in {duration}ms</div></div>"
                ));
                out
            }
        }
    }
}

impl Renderer for HtmlRenderer {
    fn render(&mut self, event: &Event) -> String {
        if self.opts.suppresses(event.kind()) {
            return String::new();
        }
        match event {
            Event::Message { role, text } => self.render_message(role.as_str(), text),
            Event::Tool {
                name,
                phase,
                text,
                exit_code,
            } => self.render_tool(name, *phase, text.as_deref(), *exit_code),
            Event::Cost { delta_usd } => {
                let v = finite_or_zero(*delta_usd);
                let sign = if v < 0.0 { "-" } else { "" };
                format!("<div class=\"cost\">{sign}${:.4}</div>", v.abs())
            }
            Event::Error { message } => {
                format!("<div class=\"error-message\">{}</div>", html_escape(message))
            }
            Event::Debug { raw } => {
                let pretty = serde_json::to_string_pretty(raw).unwrap_or_else(|_| DEBUG_FALLBACK.to_string());
                format!("<pre class=\"debug-content\">{}</pre>", html_escape(&pretty))
            }
        }
    }

    fn flush(&mut self) -> String {
        if self.opts.suppresses(EventKind::Tool) {
            self.tools.clear();
            return String::new();
        }
        let mut out = String::new();
        for name in self.tools.keys() {
            out.push_str(&format!(
                "<div class=\"tool-interrupted\" data-tool=\"{}\">interrupted</div></div>",
                html_escape(name)
            ));
        }
        self.tools.clear();
        out
    }
}
