//! The three vendor dialects (spec.md §4.3).
//!
//! Each parser only recognizes one vendor's line shape and is otherwise
//! blind to the others. Naming follows the JSON field that distinguishes
//! the dialect rather than any vendor's brand, since spec.md deliberately
//! describes them as anonymous "Parser A/B/C".

mod dialect_message;
mod dialect_phase;
mod dialect_turn;

pub use dialect_message::MessageDialectParser;
pub use dialect_phase::PhaseDialectParser;
pub use dialect_turn::TurnDialectParser;

use crate::registry::ParserRegistry;
use std::sync::Arc;

/// Default priority ordering: A > C > B (spec.md §4.3's "Priority
/// ordering (default)"), registered under the vendor names `spec.md`
/// §6 exposes on the CLI (`-v, --vendor <auto|A|B|C>`). Dialect B's
/// discriminator (`type: user|assistant`) is a subset of dialect A's
/// potential shapes, so it must never shadow it; dialect C's `phase` key
/// is disjoint from both, so its position relative to A doesn't matter,
/// but it must outrank B for the same subset reasoning in the event of
/// ambiguous input.
pub fn register_default_parsers(registry: &mut ParserRegistry) {
    registry
        .register(Arc::new(MessageDialectParser), 30.0)
        .expect("built-in parser name is valid");
    registry
        .register(Arc::new(PhaseDialectParser), 20.0)
        .expect("built-in parser name is valid");
    registry
        .register(Arc::new(TurnDialectParser), 10.0)
        .expect("built-in parser name is valid");
}

/// Parses a line as a JSON object, returning `None` (rather than an error)
/// for anything that isn't a JSON object at all — callers use this for
/// fast, allocation-light `detect` implementations.
pub(crate) fn as_object(line: &str) -> Option<serde_json::Map<String, serde_json::Value>> {
    let trimmed = line.trim_start();
    if !trimmed.starts_with('{') {
        return None;
    }
    match serde_json::from_str::<serde_json::Value>(line) {
        Ok(serde_json::Value::Object(map)) => Some(map),
        _ => None,
    }
}

pub(crate) fn str_field<'a>(
    map: &'a serde_json::Map<String, serde_json::Value>,
    key: &str,
) -> Option<&'a str> {
    map.get(key).and_then(|v| v.as_str())
}
