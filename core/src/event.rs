//! The normalized event model every vendor parser and renderer speaks.
//!
//! `Event` is the sole output of a vendor parser and the sole input of a
//! renderer. Each variant corresponds to exactly one row of the table in
//! the data model: at most one kind is ever active for a given value, which
//! an enum gives us for free instead of the "exactly one field set" struct
//! the original format uses on the wire.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A chat turn's speaker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

impl Role {
    /// Parses a vendor-supplied role string, defaulting unknown values to
    /// `Assistant`. Every parser and renderer in this crate applies this
    /// same normalization, resolving the open question in spec.md §9 in
    /// favor of a single consistent policy.
    pub fn normalize(raw: &str) -> Role {
        match raw {
            "user" => Role::User,
            "system" => Role::System,
            _ => Role::Assistant,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::System => "system",
        }
    }
}

/// One phase of a named tool execution's lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolPhase {
    Start,
    Stdout,
    Stderr,
    End,
}

impl ToolPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolPhase::Start => "start",
            ToolPhase::Stdout => "stdout",
            ToolPhase::Stderr => "stderr",
            ToolPhase::End => "end",
        }
    }
}

/// The sole normalized output of a vendor parser.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Message {
        role: Role,
        text: String,
    },
    Tool {
        name: String,
        phase: ToolPhase,
        text: Option<String>,
        exit_code: Option<i32>,
    },
    /// Incremental spend in USD since the previous `Cost` event. May be
    /// negative or zero; renderers treat non-finite values as zero.
    Cost {
        delta_usd: f64,
    },
    /// A pipeline-visible error: a parse failure or stream-level failure
    /// that was recovered from rather than allowed to unwind the stream.
    Error {
        message: String,
    },
    /// A non-normalized payload: an unknown vendor shape, a detection
    /// outcome, or an end-of-stream summary.
    Debug {
        raw: Value,
    },
}

/// The discriminant of an [`Event`], used by `event_filter` and the
/// `hide_*` format options without having to match on the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Message,
    Tool,
    Cost,
    Error,
    Debug,
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Event::Message { .. } => EventKind::Message,
            Event::Tool { .. } => EventKind::Tool,
            Event::Cost { .. } => EventKind::Cost,
            Event::Error { .. } => EventKind::Error,
            Event::Debug { .. } => EventKind::Debug,
        }
    }
}

/// Non-finite `delta_usd`/progress values render as zero rather than
/// `NaN`/`inf`, per spec.md §9's numeric-semantics note.
pub fn finite_or_zero(v: f64) -> f64 {
    if v.is_finite() {
        v
    } else {
        0.0
    }
}
