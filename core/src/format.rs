//! The Format Engine (spec.md §4.6): wires a [`StreamEngine`] to a
//! [`Renderer`] and yields string chunks.

use std::io::Read;

use crate::engine::StreamEngine;
use crate::error::StreamError;
use crate::options::{FormatOptions, OutputFormat, StreamOptions};
use crate::registry::ParserRegistry;
use crate::render::{AnsiRenderer, HtmlRenderer, JsonRenderer, Renderer};

fn new_renderer(opts: &FormatOptions) -> Box<dyn Renderer> {
    match opts.format {
        OutputFormat::Ansi => Box::new(AnsiRenderer::new(opts.clone())),
        OutputFormat::Html => Box::new(HtmlRenderer::new(opts.clone())),
        OutputFormat::Json => Box::new(JsonRenderer::new(opts.clone())),
    }
}

/// Drives a byte source through the stream engine and a renderer,
/// yielding non-empty string chunks in strict input-line order. On
/// exhaustion or a fatal error, `flush()` output is yielded once before
/// the terminal state (spec.md §4.6, step 4: "on normal completion or
/// exception: yield `renderer.flush()` if non-empty; re-raise any
/// exception").
pub struct FormatEngine<'r, R> {
    engine: StreamEngine<'r, R>,
    renderer: Box<dyn Renderer>,
    flushed: bool,
    fatal: Option<StreamError>,
}

impl<'r, R: Read> FormatEngine<'r, R> {
    pub fn new(
        source: R,
        registry: &'r ParserRegistry,
        stream_opts: StreamOptions,
        format_opts: FormatOptions,
    ) -> Result<Self, StreamError> {
        let engine = StreamEngine::new(source, registry, stream_opts)?;
        Ok(Self {
            engine,
            renderer: new_renderer(&format_opts),
            flushed: false,
            fatal: None,
        })
    }

    /// Pulls the next non-empty rendered chunk. Returns `Ok(None)` once
    /// the stream and the trailing flush are both exhausted.
    pub fn next_chunk(&mut self) -> Result<Option<String>, StreamError> {
        loop {
            if let Some(err) = self.fatal.take() {
                if !self.flushed {
                    self.flushed = true;
                    let out = self.renderer.flush();
                    if !out.is_empty() {
                        self.fatal = Some(err);
                        return Ok(Some(out));
                    }
                }
                return Err(err);
            }

            match self.engine.next_event() {
                Ok(Some(event)) => {
                    let chunk = self.renderer.render(&event);
                    if !chunk.is_empty() {
                        return Ok(Some(chunk));
                    }
                }
                Ok(None) => {
                    if self.flushed {
                        return Ok(None);
                    }
                    self.flushed = true;
                    let out = self.renderer.flush();
                    if !out.is_empty() {
                        return Ok(Some(out));
                    }
                    return Ok(None);
                }
                Err(err) => {
                    self.fatal = Some(err);
                }
            }
        }
    }

    /// Materializes every remaining chunk, concatenated.
    pub fn collect_string(&mut self) -> Result<String, StreamError> {
        let mut out = String::new();
        while let Some(chunk) = self.next_chunk()? {
            out.push_str(&chunk);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::register_default_parsers;
    use std::io::Cursor;

    fn registry() -> ParserRegistry {
        let mut r = ParserRegistry::new();
        register_default_parsers(&mut r);
        r
    }

    #[test]
    fn formats_a_simple_message_as_json() {
        let r = registry();
        let input = "{\"type\":\"message\",\"role\":\"user\",\"content\":\"hi\"}\n";
        let mut engine = FormatEngine::new(
            Cursor::new(input),
            &r,
            StreamOptions::default(),
            FormatOptions::new(OutputFormat::Json),
        )
        .unwrap();
        let out = engine.collect_string().unwrap();
        assert!(out.contains("\"kind\":\"message\""));
    }

    #[test]
    fn flush_runs_once_on_normal_completion() {
        let r = registry();
        let input = concat!(
            "{\"type\":\"tool_use\",\"name\":\"bash\",\"input\":{}}\n",
        );
        let mut engine = FormatEngine::new(
            Cursor::new(input),
            &r,
            StreamOptions::default(),
            FormatOptions::new(OutputFormat::Ansi),
        )
        .unwrap();
        let out = engine.collect_string().unwrap();
        assert!(out.contains("tool still running: bash"));
    }

    #[test]
    fn fatal_error_still_yields_flush_before_propagating() {
        let r = registry();
        let input = "not json at all, detection will fail\n";
        let opts = StreamOptions {
            continue_on_error: false,
            ..StreamOptions::default()
        };
        let mut engine = FormatEngine::new(Cursor::new(input), &r, opts, FormatOptions::new(OutputFormat::Ansi))
            .unwrap();
        let err = engine.collect_string().unwrap_err();
        assert!(matches!(err, StreamError::Fatal { .. }));
    }
}
