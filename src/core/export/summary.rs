//! Export summary and reporting
//!
//! This module defines structures for tracking and reporting export results.

use crate::domain::ExportError;
use std::time::Duration;
use thiserror::Error;

/// Summary of a completed export
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportSummary {
    /// Records written to the sink, excluding the index definition line
    pub exported: usize,

    /// Bytes of record payload written, excluding newlines
    pub bytes: u64,

    /// Search pages fetched
    pub pages: usize,

    /// Total hit count declared by the first page
    pub total_hits: u64,

    /// Duration of the export
    pub duration: Duration,
}

impl ExportSummary {
    /// Set the duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Log the summary
    pub fn log_summary(&self) {
        crate::log_export_complete!(self.exported, self.duration);
        tracing::debug!(
            total_hits = self.total_hits,
            bytes = self.bytes,
            pages = self.pages,
            "Export volume"
        );

        if self.exported as u64 != self.total_hits {
            tracing::warn!(
                exported = self.exported,
                total_hits = self.total_hits,
                "Exported record count differs from the declared total"
            );
        }
    }
}

/// A failed export
///
/// `exported` counts the complete record lines that reached the sink's output
/// after the definition line. A trailing partial line is not counted.
#[derive(Debug, Error)]
#[error("export failed after {exported} records: {error}")]
pub struct ExportFailure {
    /// Records written before the failure
    pub exported: usize,

    /// The fatal error
    #[source]
    pub error: ExportError,
}

impl ExportFailure {
    /// Create a failure record
    pub fn new(exported: usize, error: ExportError) -> Self {
        Self { exported, error }
    }
}
