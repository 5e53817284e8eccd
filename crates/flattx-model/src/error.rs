use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("invalid delimiter '{0}': use ',' or '|'")]
    InvalidDelimiter(String),
    #[error("unknown transformation kind '{0}'")]
    UnknownRuleKind(String),
    #[error("invalid field-count mismatch policy '{0}': use 'skip' or 'pass_through'")]
    InvalidMismatchPolicy(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
