//! Translation table loading.
//!
//! Each row is `group,source_value,target_value`. Rows with any other number
//! of fields are skipped and counted; they never abort the load.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use flattx_model::TranslationTable;
use tracing::{debug, warn};

use crate::error::{IngestError, Result};

/// Counts gathered while loading a translation table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TableLoadReport {
    /// Rows with exactly three fields.
    pub rows_loaded: usize,
    /// Rows skipped for having the wrong number of fields or invalid UTF-8.
    pub rows_skipped: usize,
    /// Distinct groups after loading.
    pub groups: usize,
}

/// Load a translation table from a CSV file.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or a read fails mid-way.
pub fn load_translation_table(path: &Path) -> Result<(TranslationTable, TableLoadReport)> {
    let file = File::open(path).map_err(|e| IngestError::open(path, e))?;
    let loaded = read_translation_table(file).map_err(|source| IngestError::TableRead {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(
        path = %path.display(),
        rows_loaded = loaded.1.rows_loaded,
        rows_skipped = loaded.1.rows_skipped,
        groups = loaded.1.groups,
        "translation table loaded"
    );
    Ok(loaded)
}

/// Read translation rows from any reader.
///
/// Only I/O failures are returned as errors; malformed rows are skipped.
pub fn read_translation_table<R: Read>(
    reader: R,
) -> std::result::Result<(TranslationTable, TableLoadReport), csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut table = TranslationTable::new();
    let mut report = TableLoadReport::default();

    for result in reader.records() {
        let row = match result {
            Ok(row) => row,
            Err(err) if err.is_io_error() => return Err(err),
            Err(err) => {
                warn!(error = %err, "skipping unreadable translation row");
                report.rows_skipped += 1;
                continue;
            }
        };
        if row.len() != 3 {
            report.rows_skipped += 1;
            continue;
        }
        table.insert(&row[0], &row[1], &row[2]);
        report.rows_loaded += 1;
    }

    report.groups = table.group_count();
    Ok((table, report))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read(contents: &str) -> (TranslationTable, TableLoadReport) {
        read_translation_table(contents.as_bytes()).expect("read table")
    }

    #[test]
    fn loads_three_field_rows() {
        let (table, report) =
            read("status,A,Active\nstatus,I,Inactive\ncountry,US,United States\n");
        assert_eq!(table.get("status", "A"), Some("Active"));
        assert_eq!(table.get("country", "US"), Some("United States"));
        assert_eq!(
            report,
            TableLoadReport {
                rows_loaded: 3,
                rows_skipped: 0,
                groups: 2,
            }
        );
    }

    #[test]
    fn skips_rows_with_wrong_width() {
        let (table, report) = read("grpOnly,valueOnly\nstatus,A,Active\na,b,c,d\n");
        assert_eq!(report.rows_loaded, 1);
        assert_eq!(report.rows_skipped, 2);
        assert!(!table.contains_group("grpOnly"));
        assert!(!table.contains_group("a"));
    }

    #[test]
    fn duplicate_pairs_keep_last_target() {
        let (table, report) = read("status,A,Active\nstatus,A,Archived\n");
        assert_eq!(table.get("status", "A"), Some("Archived"));
        assert_eq!(report.rows_loaded, 2);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn quoted_targets_may_contain_commas() {
        let (table, _) = read("city,NYC,\"New York, NY\"\n");
        assert_eq!(table.get("city", "NYC"), Some("New York, NY"));
    }

    #[test]
    fn empty_source_yields_empty_table() {
        let (table, report) = read("");
        assert!(table.is_empty());
        assert_eq!(report, TableLoadReport::default());
    }
}
