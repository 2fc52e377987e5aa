//! Configuration enumerated in spec.md §3: `StreamOptions` and
//! `FormatOptions`, plus the small enums they're built from.

use std::collections::HashSet;

use crate::event::EventKind;

/// Vendor selection: an explicit registered name, or `auto` (spec.md §2,
/// "the reserved vendor name `auto` is not a parser but a selection mode").
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Vendor {
    Auto,
    Named(String),
}

impl Vendor {
    pub fn named(name: impl Into<String>) -> Self {
        Vendor::Named(name.into())
    }
}

/// Text encoding for the line reader. Invalid byte sequences are replaced
/// with U+FFFD regardless of which encoding is selected (spec.md §6); only
/// UTF-8 is implemented, since none of the three in-scope vendor dialects
/// emit anything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Encoding {
    #[default]
    Utf8,
}

#[derive(Debug, Clone)]
pub struct LineReaderOptions {
    pub max_line_length: usize,
    pub encoding: Encoding,
}

impl Default for LineReaderOptions {
    fn default() -> Self {
        Self {
            // 1 MiB, per spec.md §4.1's default.
            max_line_length: 1024 * 1024,
            encoding: Encoding::Utf8,
        }
    }
}

/// Configuration for the stream engine (spec.md §3).
///
/// `detect_ensemble` (spec.md §4.2) is a [`crate::ParserRegistry`] capability
/// for callers who hold several candidate lines up front; the Stream Engine
/// itself follows spec.md §4.4's literal per-line algorithm, which resolves
/// `auto` via single-line `detect` only, so there is no lookahead window to
/// configure here.
#[derive(Debug, Clone)]
pub struct StreamOptions {
    pub vendor: Vendor,
    pub continue_on_error: bool,
    pub emit_debug_events: bool,
    pub max_consecutive_errors: usize,
    pub line_reader_options: LineReaderOptions,
}

impl Default for StreamOptions {
    fn default() -> Self {
        Self {
            vendor: Vendor::Auto,
            continue_on_error: true,
            emit_debug_events: false,
            max_consecutive_errors: 100,
            line_reader_options: LineReaderOptions::default(),
        }
    }
}

/// One of the three rendering targets (spec.md §2/§4.5).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Ansi,
    Html,
    Json,
}

/// Configuration for a renderer / the format engine (spec.md §3).
#[derive(Debug, Clone)]
pub struct FormatOptions {
    pub format: OutputFormat,
    pub collapse_tools: bool,
    pub hide_tools: bool,
    pub hide_cost: bool,
    pub hide_debug: bool,
    pub color_disabled: bool,
    pub compact_mode: bool,
    pub show_timestamps: bool,
    pub event_filter: HashSet<EventKind>,
}

impl FormatOptions {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            collapse_tools: false,
            hide_tools: false,
            hide_cost: false,
            hide_debug: false,
            color_disabled: false,
            compact_mode: matches!(format, OutputFormat::Json),
            show_timestamps: false,
            event_filter: HashSet::new(),
        }
    }

    /// Whether a given event kind should be suppressed by the `hide_*`
    /// flags and `event_filter`, independent of which renderer is active.
    pub fn suppresses(&self, kind: EventKind) -> bool {
        if !self.event_filter.is_empty() && !self.event_filter.contains(&kind) {
            return true;
        }
        match kind {
            EventKind::Tool => self.hide_tools,
            EventKind::Cost => self.hide_cost,
            EventKind::Debug => self.hide_debug,
            EventKind::Message | EventKind::Error => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suppresses_respects_hide_flags() {
        let mut opts = FormatOptions::new(OutputFormat::Ansi);
        opts.hide_tools = true;
        assert!(opts.suppresses(EventKind::Tool));
        assert!(!opts.suppresses(EventKind::Message));
    }

    #[test]
    fn suppresses_respects_event_filter() {
        let mut opts = FormatOptions::new(OutputFormat::Ansi);
        opts.event_filter.insert(EventKind::Cost);
        assert!(opts.suppresses(EventKind::Message));
        assert!(!opts.suppresses(EventKind::Cost));
    }

    #[test]
    fn json_format_defaults_to_compact() {
        assert!(FormatOptions::new(OutputFormat::Json).compact_mode);
        assert!(!FormatOptions::new(OutputFormat::Ansi).compact_mode);
    }
}
