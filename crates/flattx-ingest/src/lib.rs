//! Flat-file ingestion utilities.
//!
//! This crate reads the two inputs of a transformation run:
//!
//! - **Translation tables**: `group,source,target` rows loaded into a
//!   [`TranslationTable`](flattx_model::TranslationTable), skipping malformed rows
//! - **Input files**: the header line and the stream of data lines that follow
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use flattx_ingest::{load_translation_table, open_input, LineReader};
//! use flattx_model::Delimiter;
//!
//! let (table, report) = load_translation_table(Path::new("translations.csv"))?;
//! let mut lines = LineReader::new(open_input(Path::new("input.txt"))?);
//! let header = lines.read_header(Delimiter::Pipe)?;
//! ```

mod error;
mod input;
mod table;

// === Error Types ===
pub use error::{IngestError, Result};

// === Input Reading ===
pub use input::{HeaderLine, InputLine, LineReader, open_input};

// === Translation Tables ===
pub use table::{TableLoadReport, load_translation_table, read_translation_table};
