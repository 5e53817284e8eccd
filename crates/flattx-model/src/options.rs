//! Options controlling line processing.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::ModelError;
use crate::record::Delimiter;

/// What happens to a data line whose field count differs from the header.
///
/// Parsed case-insensitively; `passthrough` is accepted as a spelling of
/// `pass_through`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum MismatchPolicy {
    /// Drop the line from the output.
    #[default]
    Skip,
    /// Write the line verbatim, without applying any rule.
    PassThrough,
}

impl FromStr for MismatchPolicy {
    type Err = ModelError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "skip" => Ok(Self::Skip),
            "pass_through" | "passthrough" => Ok(Self::PassThrough),
            _ => Err(ModelError::InvalidMismatchPolicy(value.to_string())),
        }
    }
}

impl TryFrom<String> for MismatchPolicy {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl MismatchPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Skip => "skip",
            Self::PassThrough => "pass_through",
        }
    }
}

impl fmt::Display for MismatchPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Options for the parallel line processor.
#[derive(Debug, Clone, Default)]
pub struct ProcessingOptions {
    /// Field separator for both input and output.
    pub delimiter: Delimiter,

    /// Handling of lines that do not match the header width.
    pub mismatch_policy: MismatchPolicy,

    /// Worker count. `None` uses the host's available parallelism.
    pub workers: Option<usize>,
}

impl ProcessingOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delimiter(mut self, delimiter: Delimiter) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_mismatch_policy(mut self, policy: MismatchPolicy) -> Self {
        self.mismatch_policy = policy;
        self
    }

    pub fn with_workers(mut self, workers: Option<usize>) -> Self {
        self.workers = workers;
        self
    }
}
