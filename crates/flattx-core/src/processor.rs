//! Parallel, order-preserving line processor.
//!
//! The driving thread reads the header, echoes it, then submits every data
//! line to the worker pool without waiting. Once input is exhausted it awaits
//! the pending results in submission order and writes them out, so output
//! order always matches input order.

use std::fs::File;
use std::io::{self, BufRead, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use flattx_ingest::{IngestError, InputLine, LineReader, open_input};
use flattx_model::{Delimiter, Header, MismatchPolicy, ProcessingOptions, Record};
use flattx_transform::RecordTransform;
use thiserror::Error;
use tracing::{debug, info};

use crate::diagnostics::DiagnosticsSink;
use crate::pool::{PendingResult, WorkerPool, available_parallelism};

/// Unrecoverable failures that abort a run.
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("cannot open input: {source}")]
    OpenInput {
        #[source]
        source: IngestError,
    },
    #[error("cannot create output file {path}: {source}")]
    CreateOutput {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot read input: {source}")]
    Read {
        #[source]
        source: IngestError,
    },
    #[error("cannot write output: {source}")]
    Write {
        #[source]
        source: io::Error,
    },
}

/// Result type for processing operations.
pub type Result<T> = std::result::Result<T, ProcessError>;

/// Lifecycle of a single run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProcessorState {
    #[default]
    Idle,
    HeaderRead,
    Dispatching,
    Draining,
    Done,
    Failed,
}

/// Counts from a completed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProcessSummary {
    /// Data lines read after the header.
    pub data_lines: usize,
    /// Data lines written to the output, transformed or passed through.
    pub written: usize,
    /// Data lines dropped.
    pub skipped: usize,
    /// Data lines written verbatim after a field count mismatch or a decode failure.
    pub passed_through: usize,
    /// Diagnostics entries recorded during the run.
    pub diagnostics: usize,
    pub elapsed: Duration,
}

/// What a unit of work produced for one line.
#[derive(Debug)]
enum LineOutcome {
    Transformed(String),
    PassedThrough(Vec<u8>),
    Skipped,
}

impl LineOutcome {
    /// Outcome for a line that could not be transformed.
    fn rejected(policy: MismatchPolicy, raw: Vec<u8>) -> Self {
        match policy {
            MismatchPolicy::Skip => Self::Skipped,
            MismatchPolicy::PassThrough => Self::PassedThrough(raw),
        }
    }
}

/// A line's place in the output: still with a worker, or already settled.
enum Slot {
    Queued(PendingResult<LineOutcome>),
    Ready(LineOutcome),
}

fn rejection_action(policy: MismatchPolicy) -> &'static str {
    match policy {
        MismatchPolicy::Skip => "line dropped",
        MismatchPolicy::PassThrough => "line written unchanged",
    }
}

/// Drives a [`RecordTransform`] over a delimited file.
pub struct LineProcessor<T> {
    transform: Arc<T>,
    options: ProcessingOptions,
    diagnostics: Arc<DiagnosticsSink>,
    state: ProcessorState,
}

impl<T: RecordTransform + 'static> LineProcessor<T> {
    pub fn new(
        transform: Arc<T>,
        options: ProcessingOptions,
        diagnostics: Arc<DiagnosticsSink>,
    ) -> Self {
        Self {
            transform,
            options,
            diagnostics,
            state: ProcessorState::Idle,
        }
    }

    pub fn state(&self) -> ProcessorState {
        self.state
    }

    pub fn options(&self) -> &ProcessingOptions {
        &self.options
    }

    /// Transform `input` into `output`.
    ///
    /// # Errors
    ///
    /// Fails when either file cannot be opened, or on any read or write error.
    /// Per-line problems go to the diagnostics sink instead.
    pub fn process_file(&mut self, input: &Path, output: &Path) -> Result<ProcessSummary> {
        let reader = open_input(input).map_err(|source| {
            self.state = ProcessorState::Failed;
            ProcessError::OpenInput { source }
        })?;
        let file = File::create(output).map_err(|source| {
            self.state = ProcessorState::Failed;
            ProcessError::CreateOutput {
                path: output.to_path_buf(),
                source,
            }
        })?;
        info!(
            input = %input.display(),
            output = %output.display(),
            "processing file"
        );
        self.process(reader, BufWriter::new(file))
    }

    /// Transform lines from `reader` into `writer`.
    ///
    /// # Errors
    ///
    /// Fails on any read or write error; the processor is then `Failed`.
    pub fn process<R: BufRead, W: Write>(
        &mut self,
        reader: R,
        writer: W,
    ) -> Result<ProcessSummary> {
        let started = Instant::now();
        let diagnostics_before = self.diagnostics.count();
        let result = self.run(reader, writer);
        match result {
            Ok(mut summary) => {
                summary.diagnostics = self.diagnostics.count() - diagnostics_before;
                summary.elapsed = started.elapsed();
                self.transition(ProcessorState::Done);
                info!(
                    data_lines = summary.data_lines,
                    written = summary.written,
                    skipped = summary.skipped,
                    passed_through = summary.passed_through,
                    diagnostics = summary.diagnostics,
                    elapsed_ms = summary.elapsed.as_millis() as u64,
                    "processing complete"
                );
                Ok(summary)
            }
            Err(err) => {
                self.transition(ProcessorState::Failed);
                Err(err)
            }
        }
    }

    fn run<R: BufRead, W: Write>(&mut self, reader: R, mut writer: W) -> Result<ProcessSummary> {
        let mut summary = ProcessSummary::default();
        let delimiter = self.options.delimiter;
        let mut lines = LineReader::new(reader);

        let header_line = lines
            .read_header(delimiter)
            .map_err(|source| ProcessError::Read { source })?;
        let Some(header_line) = header_line else {
            debug!("input is empty; writing empty output");
            writer
                .flush()
                .map_err(|source| ProcessError::Write { source })?;
            return Ok(summary);
        };
        write_line(&mut writer, header_line.raw.as_bytes())?;
        let header = Arc::new(header_line.header);
        self.transition(ProcessorState::HeaderRead);
        debug!(fields = header.len(), "header read");

        let workers = self.options.workers.unwrap_or_else(available_parallelism);
        let pool = WorkerPool::new(workers);
        self.transition(ProcessorState::Dispatching);

        let policy = self.options.mismatch_policy;
        let mut pending: Vec<(usize, Slot)> = Vec::new();
        while let Some(line) = lines
            .next_line()
            .map_err(|source| ProcessError::Read { source })?
        {
            let line_number = lines.line_number();
            let slot = match line {
                InputLine::Text(line) => {
                    let unit = LineUnit {
                        transform: Arc::clone(&self.transform),
                        header: Arc::clone(&header),
                        diagnostics: Arc::clone(&self.diagnostics),
                        delimiter,
                        policy,
                        line_number,
                        line,
                    };
                    Slot::Queued(pool.submit(move || unit.run()))
                }
                InputLine::NotUtf8 { bytes, valid_up_to } => {
                    self.diagnostics.record(&format!(
                        "line {line_number}: not valid UTF-8 (invalid byte at offset \
                         {valid_up_to}); {}",
                        rejection_action(policy)
                    ));
                    Slot::Ready(LineOutcome::rejected(policy, bytes))
                }
            };
            pending.push((line_number, slot));
        }
        summary.data_lines = pending.len();
        debug!(
            lines = summary.data_lines,
            workers = pool.size(),
            "all lines submitted"
        );

        self.transition(ProcessorState::Draining);
        for (line_number, slot) in pending {
            let result = match slot {
                Slot::Queued(result) => result.wait(),
                Slot::Ready(outcome) => Ok(outcome),
            };
            match result {
                Ok(LineOutcome::Transformed(out)) => {
                    write_line(&mut writer, out.as_bytes())?;
                    summary.written += 1;
                }
                Ok(LineOutcome::PassedThrough(out)) => {
                    write_line(&mut writer, &out)?;
                    summary.written += 1;
                    summary.passed_through += 1;
                }
                Ok(LineOutcome::Skipped) => summary.skipped += 1,
                Err(failure) => {
                    self.diagnostics
                        .record(&format!("line {line_number}: {failure}; line dropped"));
                    summary.skipped += 1;
                }
            }
        }
        writer
            .flush()
            .map_err(|source| ProcessError::Write { source })?;
        Ok(summary)
    }

    fn transition(&mut self, next: ProcessorState) {
        debug!(from = ?self.state, to = ?next, "processor state");
        self.state = next;
    }
}

/// Everything a worker needs to handle one data line.
struct LineUnit<T> {
    transform: Arc<T>,
    header: Arc<Header>,
    diagnostics: Arc<DiagnosticsSink>,
    delimiter: Delimiter,
    policy: MismatchPolicy,
    line_number: usize,
    line: String,
}

impl<T: RecordTransform> LineUnit<T> {
    fn run(self) -> LineOutcome {
        let record = Record::parse(&self.line, self.delimiter);
        match self.transform.transform(&self.header, record) {
            Ok(out) => LineOutcome::Transformed(out.join(self.delimiter)),
            Err(err) => {
                self.diagnostics.record(&format!(
                    "line {}: {err}; {}: {}",
                    self.line_number,
                    rejection_action(self.policy),
                    self.line
                ));
                LineOutcome::rejected(self.policy, self.line.into_bytes())
            }
        }
    }
}

fn write_line<W: Write>(writer: &mut W, line: &[u8]) -> Result<()> {
    writer
        .write_all(line)
        .and_then(|()| writer.write_all(b"\n"))
        .map_err(|source| ProcessError::Write { source })
}
