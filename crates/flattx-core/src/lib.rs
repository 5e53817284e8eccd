//! Parallel execution of record transformations over delimited files.
//!
//! - **pool**: fixed-size worker pool returning per-task result handles
//! - **processor**: the header-echo, dispatch, ordered-drain line processor
//! - **diagnostics**: append-only log of per-record problems

pub mod diagnostics;
pub mod pool;
pub mod processor;

pub use diagnostics::{DEFAULT_ERROR_LOG, DIAGNOSTICS_TARGET, DiagnosticsSink};
pub use pool::{PendingResult, TaskFailure, WorkerPool, available_parallelism};
pub use processor::{LineProcessor, ProcessError, ProcessSummary, ProcessorState, Result};
