//! CLI-level error taxonomy (SPEC_FULL.md §B.1), mapped to the process
//! exit codes spec.md §6 specifies.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Stream(#[from] agent_stream_core::StreamError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// `0` on success (including streams that contained recoverable parse
    /// errors); `1` on fatal I/O error or invalid configuration (spec.md
    /// §6's exit-code table).
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Config(_) => 1,
            CliError::Io(_) => 1,
            CliError::Stream(agent_stream_core::StreamError::UnknownVendor(_)) => 1,
            CliError::Stream(_) => 1,
        }
    }
}
