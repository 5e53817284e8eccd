use std::path::PathBuf;

use flattx_core::ProcessSummary;
use flattx_ingest::TableLoadReport;
use flattx_transform::RegistryReport;

/// Outcome of a `translate` run.
#[derive(Debug, Clone)]
pub struct TranslateResult {
    pub input: PathBuf,
    pub output: PathBuf,
    pub error_log: PathBuf,
    pub registry: RegistryReport,
    /// `None` when no table was configured or it could not be read.
    pub table: Option<TableLoadReport>,
    /// Lookup groups referenced by rules but absent from the table.
    pub missing_groups: Vec<String>,
    pub summary: ProcessSummary,
}

impl TranslateResult {
    pub fn has_diagnostics(&self) -> bool {
        self.summary.diagnostics > 0
    }
}
