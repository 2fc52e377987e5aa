//! Vendor-agnostic normalizer and renderer for line-delimited JSON event
//! streams emitted by AI-agent command-line tools.
//!
//! The pipeline is pull-based and single-threaded end to end: a
//! [`LineReader`] turns bytes into logical lines, a [`ParserRegistry`]
//! picks a vendor dialect and turns lines into [`Event`]s via a
//! [`StreamEngine`], and a [`format::FormatEngine`] drives one of the
//! three renderers in `render` to produce output chunks. None of this
//! needs a scheduler; suspension points are exactly the reads the line
//! reader performs.

pub mod engine;
pub mod error;
pub mod event;
pub mod format;
pub mod line_reader;
pub mod options;
pub mod parsers;
pub mod registry;
pub mod render;

pub use engine::StreamEngine;
pub use error::{ParseError, StreamError};
pub use event::{Event, EventKind, Role, ToolPhase};
pub use format::FormatEngine;
pub use line_reader::{LineReader, LineRecord};
pub use options::{Encoding, FormatOptions, LineReaderOptions, OutputFormat, StreamOptions, Vendor};
pub use parsers::register_default_parsers;
pub use registry::{Detection, ParserRegistry, RegistryError, VendorParser, AUTO_VENDOR};
pub use render::Renderer;

/// Builds a [`ParserRegistry`] pre-populated with the three built-in
/// vendor dialects, the configuration most callers want.
pub fn default_registry() -> ParserRegistry {
    let mut registry = ParserRegistry::new();
    register_default_parsers(&mut registry);
    registry
}
