//! Durable append-only log of per-record problems.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use chrono::Local;
use tracing::error;

/// Default diagnostics file name.
pub const DEFAULT_ERROR_LOG: &str = "translation_error.log";

/// Tracing target of mirrored diagnostics entries.
pub const DIAGNOSTICS_TARGET: &str = "flattx::diagnostics";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Appends timestamped messages to a log file and mirrors them to tracing.
///
/// The file is opened lazily on the first entry, so a clean run leaves no
/// file behind. Appends are serialized; each entry is written as one whole
/// line. Failures to write are reported on the tracing stream and swallowed.
#[derive(Debug)]
pub struct DiagnosticsSink {
    path: Option<PathBuf>,
    file: Mutex<Option<File>>,
    entries: AtomicUsize,
}

impl DiagnosticsSink {
    /// Sink appending to `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            file: Mutex::new(None),
            entries: AtomicUsize::new(0),
        }
    }

    /// Sink that only reports on the tracing stream.
    pub fn stream_only() -> Self {
        Self {
            path: None,
            file: Mutex::new(None),
            entries: AtomicUsize::new(0),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Number of entries recorded so far.
    pub fn count(&self) -> usize {
        self.entries.load(Ordering::Relaxed)
    }

    /// Record one message. Never fails.
    pub fn record(&self, message: &str) {
        self.entries.fetch_add(1, Ordering::Relaxed);
        error!(target: DIAGNOSTICS_TARGET, "{message}");

        let Some(path) = self.path.as_deref() else {
            return;
        };
        let entry = format!(
            "[{}] {}\n",
            Local::now().format(TIMESTAMP_FORMAT),
            message.replace(['\r', '\n'], " ")
        );

        let mut guard = self.file.lock().unwrap_or_else(PoisonError::into_inner);
        if guard.is_none() {
            match OpenOptions::new().create(true).append(true).open(path) {
                Ok(file) => *guard = Some(file),
                Err(err) => {
                    error!(path = %path.display(), %err, "cannot open diagnostics log");
                    return;
                }
            }
        }
        if let Some(file) = guard.as_mut()
            && let Err(err) = file.write_all(entry.as_bytes())
        {
            error!(path = %path.display(), %err, "cannot write diagnostics log");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appends_timestamped_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("errors.log");
        std::fs::write(&path, "earlier\n").unwrap();

        let sink = DiagnosticsSink::new(&path);
        sink.record("first");
        sink.record("second\nline");

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "earlier");
        assert!(lines[1].starts_with('[') && lines[1].ends_with("] first"));
        assert!(lines[2].ends_with("] second line"));
        assert_eq!(sink.count(), 2);
    }

    #[test]
    fn clean_run_creates_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("errors.log");
        let sink = DiagnosticsSink::new(&path);
        assert_eq!(sink.count(), 0);
        assert!(!path.exists());
    }

    #[test]
    fn unwritable_path_is_swallowed() {
        let dir = tempfile::tempdir().unwrap();
        let sink = DiagnosticsSink::new(dir.path().join("missing").join("errors.log"));
        sink.record("still counted");
        assert_eq!(sink.count(), 1);
    }

    #[test]
    fn stream_only_counts() {
        let sink = DiagnosticsSink::stream_only();
        sink.record("x");
        assert_eq!(sink.count(), 1);
        assert!(sink.path().is_none());
    }
}
