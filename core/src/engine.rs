//! The Stream Engine (spec.md §4.4): resolves a vendor, drives the
//! [`LineReader`], and turns raw lines into a pull-based sequence of
//! [`Event`]s.

use std::collections::VecDeque;
use std::io::Read;
use std::sync::Arc;

use crate::error::StreamError;
use crate::event::Event;
use crate::line_reader::LineReader;
use crate::options::{StreamOptions, Vendor};
use crate::registry::{ParserRegistry, VendorParser};

/// Drives a byte source through line splitting, vendor detection, and
/// parsing, yielding normalized [`Event`]s one at a time.
///
/// A `StreamEngine` is a single-pass iterator: once `next_event()` returns
/// `None` or a fatal error, later calls keep returning the same terminal
/// state rather than restarting the source.
pub struct StreamEngine<'r, R> {
    reader: LineReader<R>,
    registry: &'r ParserRegistry,
    opts: StreamOptions,
    parser: Option<Arc<dyn VendorParser>>,
    pending: VecDeque<Event>,
    consecutive_errors: usize,
    /// spec.md §4.4 step 2's `total`/`successful` counters, plus the
    /// recoverable-error count the end-of-stream summary (step 4) reports
    /// alongside them.
    total_lines: usize,
    successful_lines: usize,
    error_lines: usize,
    fatal: Option<StreamError>,
    done: bool,
}

/// First `max` characters of `s`, used to cap the raw-line excerpt carried
/// in a parse-error Debug payload (spec.md §4.4 step 3d: `line[:200]`).
fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

impl<'r, R: Read> StreamEngine<'r, R> {
    pub fn new(source: R, registry: &'r ParserRegistry, opts: StreamOptions) -> Result<Self, StreamError> {
        let parser = match &opts.vendor {
            Vendor::Auto => None,
            Vendor::Named(name) => {
                Some(registry.get(name).ok_or_else(|| StreamError::UnknownVendor(name.clone()))?)
            }
        };

        let line_reader = LineReader::new(source, opts.line_reader_options.clone());
        Ok(Self {
            reader: line_reader,
            registry,
            opts,
            parser,
            pending: VecDeque::new(),
            consecutive_errors: 0,
            total_lines: 0,
            successful_lines: 0,
            error_lines: 0,
            fatal: None,
            done: false,
        })
    }

    /// Pulls the next normalized event, or `Ok(None)` at a clean end of
    /// stream. A fatal condition (spec.md §7) is surfaced exactly once as
    /// `Err`; subsequent calls return `Ok(None)`.
    pub fn next_event(&mut self) -> Result<Option<Event>, StreamError> {
        loop {
            if let Some(event) = self.pending.pop_front() {
                return Ok(Some(event));
            }

            if self.done {
                return Ok(None);
            }

            if let Some(err) = self.fatal.take() {
                self.done = true;
                return Err(err);
            }

            let record = match self.reader.next_record() {
                Ok(Some(r)) => r,
                Ok(None) => {
                    self.done = true;
                    if self.opts.emit_debug_events && self.total_lines > 0 {
                        let success_rate = self.successful_lines as f64 / self.total_lines as f64;
                        self.pending.push_back(Event::Debug {
                            raw: serde_json::json!({
                                "totalLines": self.total_lines,
                                "successfulLines": self.successful_lines,
                                "errorLines": self.error_lines,
                                "successRate": success_rate,
                            }),
                        });
                        continue;
                    }
                    return Ok(None);
                }
                Err(io_err) => {
                    self.done = true;
                    return Err(StreamError::Io(io_err));
                }
            };

            self.total_lines += 1;

            if record.overflowed {
                self.pending.push_back(Event::Error {
                    message: format!(
                        "line {} exceeded the maximum line length and was split",
                        record.line_number
                    ),
                });
            }

            if self.parser.is_none() {
                match self.registry.detect(&record.text) {
                    Some(parser) => {
                        tracing::debug!(vendor = parser.name(), line = record.line_number, "vendor detected");
                        if self.opts.emit_debug_events {
                            self.pending.push_back(Event::Debug {
                                raw: serde_json::json!({
                                    "detected": parser.name(),
                                    "line_number": record.line_number,
                                }),
                            });
                        }
                        self.parser = Some(parser);
                    }
                    None => {
                        // Detection failure (spec.md §7 item 4): recoverable
                        // under `continue_on_error`, counted against the same
                        // consecutive-error budget as parse failures (item 5).
                        tracing::warn!(line = record.line_number, "no vendor parser matched line");
                        self.record_recoverable_error(
                            format!("no vendor parser matched line {}", record.line_number),
                            None,
                        );
                        continue;
                    }
                }
            }

            let parser = self.parser.clone().expect("resolved above");
            match parser.parse(&record.text) {
                Ok(events) => {
                    self.consecutive_errors = 0;
                    self.successful_lines += 1;
                    self.pending.extend(events);
                }
                Err(parse_err) => {
                    let parse_err = parse_err.with_line_number(record.line_number);
                    tracing::warn!(line = record.line_number, error = %parse_err.message, "parse error");
                    let debug_payload = serde_json::json!({
                        "line_number": record.line_number,
                        "line": truncate_chars(&record.text, 200),
                        "error": parse_err.message,
                    });
                    self.record_recoverable_error(parse_err.message.clone(), Some(debug_payload));
                }
            }
        }
    }

    /// Common handling for any spec.md §7 "recoverable" condition
    /// (detection failure or JSON decode error): emit an Error event,
    /// bump the consecutive-error counter, and go fatal if the policy
    /// (item 5) says to.
    fn record_recoverable_error(&mut self, message: String, debug_payload: Option<serde_json::Value>) {
        self.consecutive_errors += 1;
        self.error_lines += 1;
        self.pending.push_back(Event::Error { message });
        if self.opts.emit_debug_events {
            if let Some(payload) = debug_payload {
                self.pending.push_back(Event::Debug { raw: payload });
            }
        }

        if !self.opts.continue_on_error {
            tracing::error!("stopping: continue_on_error is disabled");
            self.fatal = Some(StreamError::Fatal {
                message: "stopping: continue_on_error is disabled".to_string(),
            });
        } else if self.consecutive_errors >= self.opts.max_consecutive_errors {
            tracing::error!(count = self.consecutive_errors, "stopping after consecutive recoverable errors");
            self.fatal = Some(StreamError::Fatal {
                message: format!(
                    "stopping after {} consecutive recoverable errors",
                    self.consecutive_errors
                ),
            });
        }
    }
}

/// Collects every event from a `StreamEngine`, test-only convenience that
/// mirrors spec.md §8's scenario tables (each scenario is phrased as "the
/// full sequence of events is ...").
#[cfg(test)]
pub(crate) fn collect_all<R: Read>(
    source: R,
    registry: &ParserRegistry,
    opts: StreamOptions,
) -> Result<Vec<Event>, StreamError> {
    let mut engine = StreamEngine::new(source, registry, opts)?;
    let mut out = Vec::new();
    while let Some(event) = engine.next_event()? {
        out.push(event);
    }
    Ok(out)
}
