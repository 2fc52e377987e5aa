//! Error taxonomy (spec.md §7).
//!
//! Recoverable conditions never reach here — they become `Event::Error`/
//! `Event::Debug` values inside the stream engine. What lands in
//! `StreamError` are the conditions spec.md §7 calls fatal: detection
//! failure with `continue_on_error = false`, the consecutive-error policy
//! tripping, an unknown explicit vendor, or an I/O failure from the
//! underlying source.

use thiserror::Error;

/// Carried by a vendor parser when a line cannot be decoded at all.
///
/// Mirrors the "Parser ParseError record" of spec.md §6. `line` may be
/// truncated by the parser before this is constructed; `to_json` below
/// drops it entirely, since spec.md §6 recommends excluding raw input
/// from any serialized projection to avoid leaking potentially sensitive
/// content.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ParseError {
    pub message: String,
    pub vendor: String,
    pub line: String,
    pub cause: String,
    pub line_number: Option<usize>,
    pub char_pos: Option<usize>,
    pub expected_format: Option<String>,
}

impl ParseError {
    pub fn new(vendor: impl Into<String>, line: impl Into<String>, cause: impl Into<String>) -> Self {
        let cause = cause.into();
        Self {
            message: format!("Invalid JSON: {cause}"),
            vendor: vendor.into(),
            line: line.into(),
            cause,
            line_number: None,
            char_pos: None,
            expected_format: None,
        }
    }

    /// Attaches a line number and, per spec.md §4.4 step 3d, prefixes the
    /// message with `line N: ` unless it already names a line.
    pub fn with_line_number(mut self, n: usize) -> Self {
        self.line_number = Some(n);
        if !self.message.to_lowercase().starts_with("line ") {
            self.message = format!("line {n}: {}", self.message);
        }
        self
    }

    pub fn with_expected_format(mut self, fmt: impl Into<String>) -> Self {
        self.expected_format = Some(fmt.into());
        self
    }

    /// JSON projection that deliberately omits `line` (spec.md §6).
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "message": self.message,
            "vendor": self.vendor,
            "cause": self.cause,
            "line_number": self.line_number,
            "char_pos": self.char_pos,
            "expected_format": self.expected_format,
        })
    }
}

/// A fatal, stream-terminating error (spec.md §7, items 4-7).
#[derive(Debug, Error)]
pub enum StreamError {
    #[error("no registered vendor parser matched the first line")]
    DetectionFailed,

    #[error("unknown vendor: {0}")]
    UnknownVendor(String),

    #[error("auto vendor selection requires a first line")]
    AutoRequiresFirstLine,

    #[error("{0}")]
    Parse(#[from] ParseError),

    #[error("stream terminated: {message}")]
    Fatal { message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_line_number_prefixes_message_once() {
        let err = ParseError::new("A", "{bad", "expected value").with_line_number(7);
        assert_eq!(err.message, "line 7: Invalid JSON: expected value");
        assert_eq!(err.line_number, Some(7));
    }

    #[test]
    fn with_line_number_does_not_double_prefix_an_already_prefixed_message() {
        let mut err = ParseError::new("A", "{bad", "expected value");
        err.message = "Line 3: trailing comma".to_string();
        let err = err.with_line_number(3);
        assert_eq!(err.message, "Line 3: trailing comma");
    }
}
