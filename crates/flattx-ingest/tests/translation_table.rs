//! Tests for loading translation tables from disk.

use std::fs;

use flattx_ingest::{IngestError, TableLoadReport, load_translation_table};

#[test]
fn loads_table_file_and_reports_counts() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("translations.csv");
    fs::write(
        &path,
        "status,A,Active\ngrpOnly,valueOnly\nstatus,I,Inactive\nregion,N,North\n",
    )
    .expect("write table");

    let (table, report) = load_translation_table(&path).expect("load table");

    assert_eq!(
        report,
        TableLoadReport {
            rows_loaded: 3,
            rows_skipped: 1,
            groups: 2,
        }
    );
    assert_eq!(table.get("status", "I"), Some("Inactive"));
    assert_eq!(table.get("region", "N"), Some("North"));
    assert!(!table.contains_group("grpOnly"));
}

#[test]
fn missing_file_is_reported() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("absent.csv");

    let err = load_translation_table(&path).unwrap_err();

    assert!(matches!(err, IngestError::FileNotFound { .. }));
    assert!(err.to_string().contains("absent.csv"));
}
