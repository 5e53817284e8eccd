//! Field-level transformation of delimited records.
//!
//! This crate turns rule configuration into an immutable context and applies
//! it to records:
//!
//! - **registry**: parses `field:kind[:param]` rules, `field:group` shared
//!   groups and the plain list of translated fields into one rule map
//! - **context**: the immutable registry + translation table pair shared by workers
//! - **engine**: per-record rule dispatch behind the [`RecordTransform`] seam
//! - **unique_id**: identifier generation for `unique_id` fields
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use flattx_model::{Delimiter, Header, Record, TranslationTable};
//! use flattx_transform::{RecordTransform, RegistryBuilder, TransformContext, TransformEngine};
//!
//! let (registry, _report) = RegistryBuilder::new()
//!     .with_field_transformations("status:value_translation")
//!     .unwrap()
//!     .build();
//! let mut table = TranslationTable::new();
//! table.insert("status", "A", "Active");
//!
//! let engine = TransformEngine::new(Arc::new(TransformContext::new(registry, table)));
//! let header = Header::parse("id|status|country", Delimiter::Pipe);
//! let record = Record::parse("7|A|US", Delimiter::Pipe);
//!
//! let out = engine.transform(&header, record).unwrap();
//! assert_eq!(out.join(Delimiter::Pipe), "7|Active|US");
//! ```

pub mod context;
pub mod engine;
pub mod error;
pub mod registry;
pub mod unique_id;

pub use context::{LookupResult, TransformContext};
pub use engine::{RecordTransform, TransformEngine};
pub use error::{RuleSpecError, TransformError};
pub use registry::{FieldRuleRegistry, RegistryBuilder, RegistryReport};
pub use unique_id::generate_unique_id;
