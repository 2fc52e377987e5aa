//! Optional TOML config file (SPEC_FULL.md §B.3): supplies defaults the
//! CLI flags override. No field is mandatory; the core itself takes no
//! configuration from the environment (spec.md §6).

use std::path::Path;

use serde::Deserialize;

use crate::error::CliError;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CliDefaults {
    pub vendor: Option<String>,
    pub format: Option<String>,
    pub max_line_length: Option<usize>,
    pub continue_on_error: Option<bool>,
    pub max_consecutive_errors: Option<usize>,
    pub collapse_tools: Option<bool>,
}

impl CliDefaults {
    pub fn load(path: &Path) -> Result<Self, CliError> {
        let text = std::fs::read_to_string(path).map_err(|e| CliError::Config(format!("{}: {e}", path.display())))?;
        toml::from_str(&text).map_err(|e| CliError::Config(format!("{}: {e}", path.display())))
    }
}
