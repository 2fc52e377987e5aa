//! Wires parsed CLI arguments + optional config defaults into a
//! [`FormatEngine`] run, writing chunks to stdout or the requested file.

use std::collections::HashSet;
use std::fs::File;
use std::io::{self, BufWriter, Read, Write};

use agent_stream_core::{
    default_registry, EventKind, FormatEngine, FormatOptions, LineReaderOptions, OutputFormat, StreamOptions, Vendor,
};

use crate::cli::{Cli, FormatArg};
use crate::config::CliDefaults;
use crate::error::CliError;

/// `$XDG_CONFIG_HOME/agent-stream/config.toml` (or the platform
/// equivalent dirs crate resolves), checked when `--config` is absent.
fn default_config_path() -> Option<std::path::PathBuf> {
    dirs::config_dir().map(|dir| dir.join("agent-stream").join("config.toml"))
}

pub fn run(cli: &Cli) -> Result<(), CliError> {
    let defaults = match &cli.config {
        // An explicit --config must exist and parse; a failure here is a
        // configuration error, not a silent fallback.
        Some(path) => CliDefaults::load(path)?,
        // The discovered default path is best-effort: a missing or
        // unreadable file there just means "no defaults", not an error.
        None => default_config_path()
            .filter(|path| path.exists())
            .and_then(|path| CliDefaults::load(&path).ok())
            .unwrap_or_default(),
    };

    let stream_opts = build_stream_options(cli, &defaults);
    let format_opts = build_format_options(cli, &defaults);

    let registry = default_registry();
    let input: Box<dyn Read> = match &cli.input {
        Some(path) => Box::new(File::open(path)?),
        None => Box::new(io::stdin()),
    };

    let mut engine = FormatEngine::new(input, &registry, stream_opts, format_opts)?;

    let mut sink: Box<dyn Write> = match &cli.output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(BufWriter::new(io::stdout())),
    };

    loop {
        match engine.next_chunk() {
            Ok(Some(chunk)) => sink.write_all(chunk.as_bytes())?,
            Ok(None) => break,
            Err(err) => {
                sink.flush()?;
                return Err(CliError::Stream(err));
            }
        }
    }
    sink.flush()?;
    Ok(())
}

fn build_stream_options(cli: &Cli, defaults: &CliDefaults) -> StreamOptions {
    let vendor_str = if cli.vendor != "auto" {
        cli.vendor.clone()
    } else {
        defaults.vendor.clone().unwrap_or_else(|| "auto".to_string())
    };
    let vendor = if vendor_str == "auto" {
        Vendor::Auto
    } else {
        Vendor::named(vendor_str)
    };

    let mut opts = StreamOptions {
        vendor,
        ..StreamOptions::default()
    };
    if let Some(max) = defaults.max_line_length {
        opts.line_reader_options = LineReaderOptions {
            max_line_length: max,
            ..opts.line_reader_options
        };
    }
    if let Some(continue_on_error) = defaults.continue_on_error {
        opts.continue_on_error = continue_on_error;
    }
    if let Some(max) = defaults.max_consecutive_errors {
        opts.max_consecutive_errors = max;
    }
    opts
}

fn build_format_options(cli: &Cli, defaults: &CliDefaults) -> FormatOptions {
    let default_format = match defaults.format.as_deref() {
        Some("html") => FormatArg::Html,
        Some("json") => FormatArg::Json,
        _ => FormatArg::Ansi,
    };
    let format = match cli.resolve_format(default_format) {
        FormatArg::Ansi => OutputFormat::Ansi,
        FormatArg::Html => OutputFormat::Html,
        FormatArg::Json => OutputFormat::Json,
    };

    let mut opts = FormatOptions::new(format);
    opts.collapse_tools = cli.collapse_tools || defaults.collapse_tools.unwrap_or(false);
    opts.hide_tools = cli.hide_tools;
    opts.hide_cost = cli.hide_cost;
    opts.hide_debug = cli.hide_debug;
    opts.event_filter = parse_event_filter(&cli.only);
    opts
}

fn parse_event_filter(only: &[String]) -> HashSet<EventKind> {
    only.iter()
        .filter_map(|s| match s.trim().to_lowercase().as_str() {
            "message" => Some(EventKind::Message),
            "tool" => Some(EventKind::Tool),
            "cost" => Some(EventKind::Cost),
            "error" => Some(EventKind::Error),
            "debug" => Some(EventKind::Debug),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_event_filter_ignores_unknown_kinds() {
        let filter = parse_event_filter(&["message".to_string(), "bogus".to_string(), "cost".to_string()]);
        assert_eq!(filter.len(), 2);
        assert!(filter.contains(&EventKind::Message));
        assert!(filter.contains(&EventKind::Cost));
    }

    #[test]
    fn parse_event_filter_of_empty_list_is_empty_set() {
        assert!(parse_event_filter(&[]).is_empty());
    }
}
