//! Error types for flat-file ingestion.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading inputs.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// File not found.
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to open or read a file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to read a line from an input stream.
    #[error("failed to read line {line_number}: {source}")]
    LineRead {
        line_number: usize,
        #[source]
        source: std::io::Error,
    },

    /// The header line is not valid UTF-8.
    #[error("header line is not valid UTF-8 (invalid byte at offset {valid_up_to})")]
    HeaderEncoding { valid_up_to: usize },

    // === Translation Table Errors ===
    /// The translation source could not be read as CSV.
    #[error("failed to read translation table {path}: {source}")]
    TableRead {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

impl IngestError {
    pub(crate) fn open(path: &std::path::Path, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            Self::FileRead {
                path: path.to_path_buf(),
                source,
            }
        }
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = IngestError::FileNotFound {
            path: PathBuf::from("/path/to/table.csv"),
        };
        assert_eq!(err.to_string(), "file not found: /path/to/table.csv");
    }

    #[test]
    fn test_open_maps_not_found() {
        let path = std::path::Path::new("missing.csv");
        let not_found = std::io::Error::from(std::io::ErrorKind::NotFound);
        assert!(matches!(
            IngestError::open(path, not_found),
            IngestError::FileNotFound { .. }
        ));
        let denied = std::io::Error::from(std::io::ErrorKind::PermissionDenied);
        assert!(matches!(
            IngestError::open(path, denied),
            IngestError::FileRead { .. }
        ));
    }
}
