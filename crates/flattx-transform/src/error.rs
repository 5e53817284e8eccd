//! Error types for rule parsing and record transformation.

use flattx_model::ModelError;
use thiserror::Error;

/// Configuration-time failure while parsing rule configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RuleSpecError {
    #[error("invalid transformation entry '{entry}': {source}")]
    UnknownKind {
        entry: String,
        #[source]
        source: ModelError,
    },
    #[error("default_value rule for field '{field}' has no value")]
    MissingDefault { field: String },
}

/// Per-record failure raised by the engine.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransformError {
    #[error("field count mismatch: header has {expected} fields, record has {found}")]
    FieldCountMismatch { expected: usize, found: usize },
}
