//! Renderers (spec.md §4.5): three independent event sinks sharing one
//! contract. ANSI and HTML are stateful (per-tool execution contexts);
//! JSON is stateless per event.

mod ansi;
mod escape;
mod html;
mod json;
mod markup;
mod tool_state;

pub use ansi::AnsiRenderer;
pub use html::HtmlRenderer;
pub use json::JsonRenderer;

use crate::event::Event;

/// Shared renderer contract (spec.md §4.5 "Common contract"). A renderer
/// instance is per-stream and must not be shared across pipelines
/// (spec.md §5).
pub trait Renderer {
    /// Renders one event, possibly mutating internal per-tool state.
    /// Returns the empty string for suppressed kinds or no-op transitions.
    fn render(&mut self, event: &Event) -> String;

    /// Equals the concatenation of `render` calls in order.
    fn render_batch(&mut self, events: &[Event]) -> String {
        events.iter().map(|e| self.render(e)).collect()
    }

    /// Emits any closing/residual content (unclosed tool blocks,
    /// interruption markers) and clears internal state. Only called when
    /// the caller explicitly asks for it; cancellation does not imply
    /// flush (spec.md §5).
    fn flush(&mut self) -> String;
}

pub(crate) fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339()
}
