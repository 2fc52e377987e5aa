//! Argument parsing (spec.md §6's "Optional CLI surface").

use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum FormatArg {
    Ansi,
    Html,
    Json,
}

/// Normalizes a JSONL event stream from an AI-agent CLI and renders it as
/// ANSI terminal text, HTML, or pass-through JSON.
#[derive(Debug, Parser)]
#[command(name = "agent-stream", version, about)]
pub struct Cli {
    /// Input file. Absent means standard input.
    pub input: Option<PathBuf>,

    /// Vendor dialect to parse: `auto`, `A`, `B`, or `C`.
    #[arg(short, long, default_value = "auto")]
    pub vendor: String,

    /// Output encoding.
    #[arg(short, long, value_enum)]
    pub format: Option<FormatArg>,

    /// Shorthand for `--format html`.
    #[arg(long, conflicts_with_all = ["format", "json"])]
    pub html: bool,

    /// Shorthand for `--format json`.
    #[arg(long, conflicts_with_all = ["format", "html"])]
    pub json: bool,

    /// Buffer tool stdout/stderr and replace it with a one-line summary
    /// on completion.
    #[arg(long)]
    pub collapse_tools: bool,

    #[arg(long)]
    pub hide_tools: bool,

    #[arg(long)]
    pub hide_cost: bool,

    #[arg(long)]
    pub hide_debug: bool,

    /// Comma-separated list of event kinds to keep; all others are
    /// suppressed. Example: `--only message,tool`.
    #[arg(long, value_delimiter = ',')]
    pub only: Vec<String>,

    /// Redirect rendered output to a file instead of standard output.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Load default values for the flags above from a TOML file.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Suppress stderr logging entirely.
    #[arg(long)]
    pub quiet: bool,
}

impl Cli {
    pub fn resolve_format(&self, default: FormatArg) -> FormatArg {
        if self.html {
            FormatArg::Html
        } else if self.json {
            FormatArg::Json
        } else {
            self.format.unwrap_or(default)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn html_shorthand_overrides_default_format() {
        let cli = Cli::parse_from(["agent-stream", "--html"]);
        assert_eq!(cli.resolve_format(FormatArg::Ansi), FormatArg::Html);
    }

    #[test]
    fn explicit_format_flag_is_honored() {
        let cli = Cli::parse_from(["agent-stream", "--format", "json"]);
        assert_eq!(cli.resolve_format(FormatArg::Ansi), FormatArg::Json);
    }

    #[test]
    fn default_vendor_is_auto() {
        let cli = Cli::parse_from(["agent-stream"]);
        assert_eq!(cli.vendor, "auto");
    }

    #[test]
    fn only_flag_splits_on_commas() {
        let cli = Cli::parse_from(["agent-stream", "--only", "message,tool,cost"]);
        assert_eq!(cli.only, vec!["message", "tool", "cost"]);
    }
}
