use std::collections::HashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Decoded values of one access-log line, keyed by format variable (`$status`, ...).
///
/// Owned by the worker that tokenized the line; never shared.
pub type FieldMap = HashMap<String, String>;

/// How the variables of a log format are separated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Delimiter {
    /// `$a | $b | $c` (nginx `log_format` with explicit pipes)
    Pipe,
    /// `$a $b "$c"` with quoted/bracketed segments kept whole
    Space,
}

impl Delimiter {
    pub fn as_str(&self) -> &'static str {
        match self {
            Delimiter::Pipe => "pipe",
            Delimiter::Space => "space",
        }
    }

    /// Log format used for origin hosts that have no configured source.
    pub fn default_format(&self) -> &'static str {
        match self {
            Delimiter::Pipe => super::PIPED_LOG_FORMAT,
            Delimiter::Space => super::SPACED_LOG_FORMAT,
        }
    }
}

impl Default for Delimiter {
    fn default() -> Self {
        Delimiter::Pipe
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Format and content are inconsistent: {variables} variables, {values} values")]
    FormatMismatch { variables: usize, values: usize },
}
