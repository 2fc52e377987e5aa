//! The Parser Registry (spec.md §4.2): holds a priority-ordered set of
//! vendor parsers and resolves which one applies to a stream.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use crate::error::ParseError;
use crate::event::Event;

/// Reserved vendor name: a selection mode, not a parser (spec.md §2).
pub const AUTO_VENDOR: &str = "auto";

/// One concrete vendor dialect (spec.md §4.3). Implementations are pure:
/// no I/O, no shared mutable state, safe to hold behind an `Arc` and reuse
/// across streams (spec.md §5's "a parser instance is immutable").
pub trait VendorParser: Send + Sync {
    fn name(&self) -> &str;

    /// O(line length) with a tiny constant; must not allocate unbounded
    /// structures and must not panic on malformed input (panics are
    /// caught and treated as "did not match" by the registry, but a
    /// well-behaved parser should simply return `false`).
    fn detect(&self, line: &str) -> bool;

    /// Fully decodes `line`. Returns a `ParseError` if `line` is not valid
    /// JSON; an unknown-but-valid-JSON shape is not an error (see each
    /// parser's own handling), it yields a `Debug` event instead.
    fn parse(&self, line: &str) -> Result<Vec<Event>, ParseError>;

    /// A parser-provided detection strength in `[0, 1]`. Defaults to 1.0
    /// for any line `detect` matches, 0.0 otherwise (spec.md §4.2).
    fn confidence(&self, line: &str) -> f64 {
        if self.detect(line) {
            1.0
        } else {
            0.0
        }
    }
}

/// The outcome of [`ParserRegistry::detect_with_confidence`].
pub struct Detection {
    pub parser: Arc<dyn VendorParser>,
    pub confidence: f64,
    pub reason: String,
}

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("cannot register the reserved vendor name 'auto'")]
    ReservedName,
    #[error("cannot register a parser with an empty name")]
    EmptyName,
    #[error("priority must be finite")]
    NonFinitePriority,
}

struct Entry {
    parser: Arc<dyn VendorParser>,
    priority: f64,
    /// Monotonic insertion index, used only to break priority ties the
    /// same way registration order would (spec.md §4.2).
    order: usize,
}

/// Insertion-ordered, name-unique mapping from vendor name to parser
/// entry (spec.md §3's "Parser registry entry").
#[derive(Default)]
pub struct ParserRegistry {
    entries: Vec<Entry>,
    next_order: usize,
}

impl ParserRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        parser: Arc<dyn VendorParser>,
        priority: f64,
    ) -> Result<(), RegistryError> {
        let name = parser.name();
        if name.is_empty() {
            return Err(RegistryError::EmptyName);
        }
        if name == AUTO_VENDOR {
            return Err(RegistryError::ReservedName);
        }
        if !priority.is_finite() {
            return Err(RegistryError::NonFinitePriority);
        }

        if let Some(existing) = self.entries.iter_mut().find(|e| e.parser.name() == name) {
            existing.parser = parser;
            existing.priority = priority;
            // Registration order is intentionally left unchanged: the
            // registry idempotence property only promises that the name
            // now resolves to the new parser, not that it moves in the
            // tie-break ordering.
        } else {
            let order = self.next_order;
            self.next_order += 1;
            self.entries.push(Entry {
                parser,
                priority,
                order,
            });
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn VendorParser>> {
        self.entries
            .iter()
            .find(|e| e.parser.name() == name)
            .map(|e| e.parser.clone())
    }

    fn ranked(&self) -> Vec<&Entry> {
        let mut v: Vec<&Entry> = self.entries.iter().collect();
        v.sort_by(|a, b| {
            b.priority
                .partial_cmp(&a.priority)
                .unwrap()
                .then(a.order.cmp(&b.order))
        });
        v
    }

    /// Tries registered parsers in descending priority; the first whose
    /// `detect` returns true wins. Never panics: a parser whose `detect`
    /// panics is treated as not matching and skipped.
    pub fn detect(&self, line: &str) -> Option<Arc<dyn VendorParser>> {
        for entry in self.ranked() {
            let parser = entry.parser.clone();
            let matched = catch_unwind(AssertUnwindSafe(|| parser.detect(line))).unwrap_or(false);
            if matched {
                return Some(parser);
            }
        }
        None
    }

    pub fn detect_with_confidence(&self, line: &str) -> Option<Detection> {
        let parser = self.detect(line)?;
        let confidence = catch_unwind(AssertUnwindSafe(|| parser.confidence(line))).unwrap_or(1.0);
        let reason = format!("line matched vendor '{}'", parser.name());
        Some(Detection {
            parser,
            confidence,
            reason,
        })
    }

    /// Runs `detect` over up to `lines.len()` candidate lines and returns
    /// the parser with the most positive detections, tie-breaking by
    /// priority then registration order (spec.md §4.2).
    pub fn detect_ensemble(&self, lines: &[String]) -> Option<Arc<dyn VendorParser>> {
        let ranked = self.ranked();
        if ranked.is_empty() {
            return None;
        }

        let mut counts: Vec<usize> = vec![0; ranked.len()];
        for line in lines {
            for (i, entry) in ranked.iter().enumerate() {
                let parser = entry.parser.clone();
                let matched =
                    catch_unwind(AssertUnwindSafe(|| parser.detect(line))).unwrap_or(false);
                if matched {
                    counts[i] += 1;
                }
            }
        }

        ranked
            .iter()
            .zip(counts.iter())
            .max_by(|(ea, ca), (eb, cb)| {
                ca.cmp(cb)
                    .then(
                        ea.priority
                            .partial_cmp(&eb.priority)
                            .unwrap(),
                    )
                    .then(eb.order.cmp(&ea.order))
            })
            .filter(|(_, count)| **count > 0)
            .map(|(e, _)| e.parser.clone())
    }
}
