//! Data model for delimited flat-file transformation.
//!
//! - **record**: header, record and delimiter types for `|`/`,` separated lines
//! - **rules**: per-field transformation rules and unique-id strategies
//! - **table**: the group-keyed translation table used by value lookups
//! - **options**: processing options shared by the line processor and CLI

pub mod error;
pub mod options;
pub mod record;
pub mod rules;
pub mod table;

pub use error::{ModelError, Result};
pub use options::{MismatchPolicy, ProcessingOptions};
pub use record::{Delimiter, Header, Record};
pub use rules::{FieldRule, RuleKind, UniqueIdStrategy};
pub use table::TranslationTable;
