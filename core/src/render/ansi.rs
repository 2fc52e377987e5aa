//! The ANSI-terminal renderer (spec.md §4.5.1).

use std::collections::HashMap;

use super::escape::ansi_sanitize;
use super::markup::{is_fence_delimiter, tokenize, Token};
use super::tool_state::{truncate_chars, ToolState};
use super::Renderer;
use crate::event::{finite_or_zero, Event, EventKind, ToolPhase};
use crate::options::FormatOptions;

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const ITALIC: &str = "\x1b[3m";
const RED: &str = "\x1b[31m";
const REVERSE: &str = "\x1b[7m";

pub struct AnsiRenderer {
    opts: FormatOptions,
    tools: HashMap<String, ToolState>,
}

impl AnsiRenderer {
    pub fn new(opts: FormatOptions) -> Self {
        Self {
            opts,
            tools: HashMap::new(),
        }
    }

    fn color(&self) -> bool {
        !self.opts.color_disabled
    }

    fn style(&self, code: &str, text: &str) -> String {
        if self.color() {
            format!("{code}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    fn render_message(&self, role: &str, text: &str) -> String {
        let icon = match role {
            "user" => "👤",
            "assistant" => "🤖",
            "system" => "⚙",
            _ => "❔",
        };
        let mut out = format!("{icon} {role}:\n");
        let mut in_fence = false;
        for line in ansi_sanitize(text).split('\n') {
            if is_fence_delimiter(line) {
                in_fence = !in_fence;
                out.push_str("  ");
                out.push_str(&self.style(DIM, line));
                out.push('\n');
                continue;
            }
            if in_fence {
                out.push_str("  ");
                out.push_str(&self.style(DIM, line));
                out.push('\n');
            } else {
                out.push_str("  ");
                out.push_str(&self.render_inline(line));
                out.push('\n');
            }
        }
        let blanks = if self.opts.compact_mode { 1 } else { 2 };
        for _ in 0..blanks {
            out.push('\n');
        }
        out
    }

    fn render_inline(&self, line: &str) -> String {
        tokenize(line, false)
            .into_iter()
            .map(|t| self.render_token(t))
            .collect()
    }

    fn render_token(&self, token: Token) -> String {
        match token {
            Token::Text(t) => t,
            Token::Code(t) => self.style(REVERSE, &t),
            Token::Italic(t) => self.style(ITALIC, &t),
            Token::Bold(inner) => {
                let rendered: String = inner.into_iter().map(|t| self.render_token(t)).collect();
                self.style(BOLD, &rendered)
            }
        }
    }

    fn param_summary(&self, name: &str, text: Option<&str>) -> Option<String> {
        let text = text?;
        let value: serde_json::Value = serde_json::from_str(text).ok()?;
        let obj = value.as_object()?;
        let lname = name.to_lowercase();

        if lname.contains("write") {
            obj.get("file_path")
                .and_then(|v| v.as_str())
                .map(|p| format!("→ {p}"))
        } else if lname.contains("bash") {
            obj.get("command")
                .and_then(|v| v.as_str())
                .map(|c| format!("→ {}", truncate_chars(c, 60)))
        } else if lname.contains("read") {
            let path = obj.get("file_path").and_then(|v| v.as_str())?;
            match obj.get("limit").and_then(|v| v.as_i64()) {
                Some(n) => Some(format!("→ {path} ({n} lines)")),
                None => Some(format!("→ {path}")),
            }
        } else if lname.contains("grep") {
            let pattern = obj.get("pattern").and_then(|v| v.as_str())?;
            let path = obj.get("path").and_then(|v| v.as_str()).unwrap_or(".");
            Some(format!("→ \"{pattern}\" in {path}"))
        } else {
            None
        }
    }

    fn render_tool(&mut self, name: &str, phase: ToolPhase, text: Option<&str>, exit_code: Option<i32>) -> String {
        let name = ansi_sanitize(name);
        match phase {
            ToolPhase::Start => {
                let state = ToolState::new(self.opts.collapse_tools);
                self.tools.insert(name.clone(), state);
                let summary = self.param_summary(&name, text);
                match summary {
                    Some(s) => format!("🔧 {name} [{s}]\n"),
                    None => format!("🔧 {name}\n"),
                }
            }
            ToolPhase::Stdout | ToolPhase::Stderr => {
                let Some(state) = self.tools.get_mut(&name) else {
                    return String::new();
                };
                let text = text.map(|t| ansi_sanitize(t)).unwrap_or_default();
                if state.collapsed {
                    for line in text.split('\n') {
                        state.push_line(line);
                    }
                    return String::new();
                }
                let prefix = if phase == ToolPhase::Stderr {
                    self.style(RED, "  │ ")
                } else {
                    "  │ ".to_string()
                };
                text.split('\n')
                    .map(|line| format!("{prefix}{line}\n"))
                    .collect()
            }
            ToolPhase::End => {
                let Some(state) = self.tools.remove(&name) else {
                    return format!("🔧 {name} (unknown duration)\n");
                };
                let duration = state.duration_ms();
                let mut out = String::new();
                if state.collapsed && !state.buffer.is_empty() {
                    let mut summary = truncate_chars(&state.buffer.replace('\n', " "), 100);
                    if state.truncated {
                        summary.push_str(" (truncated)");
                    }
                    out.push_str(&format!("  └─ {summary}\n"));
                }
                let ok = exit_code.unwrap_or(0) == 0;
                if ok {
                    out.push_str(&format!("✅ {name} ({duration}ms)\n"));
                } else {
                    out.push_str(&format!(
                        "❌ {name} failed (exit {}) ({duration}ms)\n",
                        exit_code.unwrap_or(1)
                    ));
                }
                out
            }
        }
    }
}

impl Renderer for AnsiRenderer {
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
                format!("💰 {sign}${:.4}\n", v.abs())
            }
            Event::Error { message } => {
                let text = ansi_sanitize(message);
                if self.color() {
                    format!("{BOLD}{RED}❌ {text}{RESET}\n")
                } else {
                    format!("❌ {text}\n")
                }
            }
            Event::Debug { raw } => {
                format!("🐛 {}\n", serde_json::to_string(raw).unwrap_or_default())
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
            out.push_str(&format!("⚠ tool still running: {name}\n"));
        }
        self.tools.clear();
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::OutputFormat;

    fn renderer() -> AnsiRenderer {
        AnsiRenderer::new(FormatOptions::new(OutputFormat::Ansi))
    }

    #[test]
    fn message_renders_header_and_indented_content() {
        let mut r = renderer();
        let out = r.render(&Event::Message {
            role: crate::event::Role::User,
            text: "hi there".into(),
        });
        assert!(out.starts_with("👤 user:\n"));
        assert!(out.contains("  hi there\n"));
    }

    #[test]
    fn tool_lifecycle_emits_start_and_success_status() {
        let mut r = renderer();
        let start = r.render(&Event::Tool {
            name: "bash".into(),
            phase: ToolPhase::Start,
            text: Some(r#"{"command":"ls -la"}"#.into()),
            exit_code: None,
        });
        assert!(start.contains("bash"));
        assert!(start.contains("ls -la"));

        let end = r.render(&Event::Tool {
            name: "bash".into(),
            phase: ToolPhase::End,
            text: None,
            exit_code: Some(0),
        });
        assert!(end.contains("✅ bash"));
    }

    #[test]
    fn tool_end_without_start_tolerates_missing_state() {
        let mut r = renderer();
        let out = r.render(&Event::Tool {
            name: "ghost".into(),
            phase: ToolPhase::End,
            text: None,
            exit_code: Some(0),
        });
        assert!(out.contains("unknown duration"));
    }

    #[test]
    fn collapsed_tool_buffers_output_until_end() {
        let mut opts = FormatOptions::new(OutputFormat::Ansi);
        opts.collapse_tools = true;
        let mut r = AnsiRenderer::new(opts);
        r.render(&Event::Tool {
            name: "t".into(),
            phase: ToolPhase::Start,
            text: None,
            exit_code: None,
        });
        let mid = r.render(&Event::Tool {
            name: "t".into(),
            phase: ToolPhase::Stdout,
            text: Some("line one".into()),
            exit_code: None,
        });
        assert_eq!(mid, "");
        let end = r.render(&Event::Tool {
            name: "t".into(),
            phase: ToolPhase::End,
            text: None,
            exit_code: Some(0),
        });
        assert!(end.contains("line one"));
        assert!(end.contains("└─"));
    }

    #[test]
    fn cost_formats_four_decimals_with_sign() {
        let mut r = renderer();
        assert_eq!(r.render(&Event::Cost { delta_usd: 1.5 }), "💰 $1.5000\n");
        assert_eq!(r.render(&Event::Cost { delta_usd: -0.25 }), "💰 -$0.2500\n");
        assert_eq!(
            r.render(&Event::Cost {
                delta_usd: f64::NAN
            }),
            "💰 $0.0000\n"
        );
    }

    #[test]
    fn esc_bytes_in_error_message_are_neutralized() {
        let mut r = renderer();
        let out = r.render(&Event::Error {
            message: "boom\x1b[31m".into(),
        });
        assert!(!out.contains('\x1b'));
        assert!(out.contains("\\x1b[31m"));
    }

    #[test]
    fn suppressed_kind_renders_empty_string() {
        let mut opts = FormatOptions::new(OutputFormat::Ansi);
        opts.hide_cost = true;
        let mut r = AnsiRenderer::new(opts);
        assert_eq!(r.render(&Event::Cost { delta_usd: 1.0 }), "");
    }

    #[test]
    fn flush_warns_about_unterminated_tools() {
        let mut r = renderer();
        r.render(&Event::Tool {
            name: "orphan".into(),
            phase: ToolPhase::Start,
            text: None,
            exit_code: None,
        });
        let out = r.flush();
        assert!(out.contains("tool still running: orphan"));
        assert!(r.flush().is_empty());
    }

    #[test]
    fn color_disabled_emits_no_escape_bytes() {
        let mut opts = FormatOptions::new(OutputFormat::Ansi);
        opts.color_disabled = true;
        let mut r = AnsiRenderer::new(opts);
        let out = r.render(&Event::Message {
            role: crate::event::Role::Assistant,
            text: "**bold** `code` *italic*".into(),
        });
        assert!(!out.contains('\x1b'));
    }
}
