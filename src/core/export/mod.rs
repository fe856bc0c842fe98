//! Index export
//!
//! This module provides the export pipeline and its collaborators:
//! - Search request construction from a user query
//! - Point-in-time snapshot lifecycle
//! - NDJSON record sink
//! - Progress reporting
//! - Summary and failure reporting

pub mod pipeline;
pub mod progress;
pub mod request;
pub mod sink;
pub mod snapshot;
pub mod summary;

pub use pipeline::{ExportPipeline, PaginationConfig};
pub use progress::{ConsoleProgress, ProgressReporter};
pub use request::{parse_query, QueryTemplate};
pub use sink::{JsonLinesSink, RecordSink};
pub use snapshot::Snapshot;
pub use summary::{ExportFailure, ExportSummary};
