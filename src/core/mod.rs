//! Core business logic for elastictl.
//!
//! # Modules
//!
//! - [`export`] - Index export pipeline, request building, output and progress
//!
//! # Export Workflow
//!
//! 1. **Definition**: Fetch the index mappings and settings, write them as the first line
//! 2. **Snapshot**: Open a point in time so pagination sees a stable view
//! 3. **Paginate**: Fetch pages with `search_after`, writing each hit as one line
//! 4. **Release**: Close the point in time, on success and on failure
//! 5. **Report**: Return an export summary with the record count
//!
//! # Example
//!
//! ```rust,no_run
//! use elastictl::adapters::search::HttpSearchBackend;
//! use elastictl::config::load_config;
//! use elastictl::core::export::{
//!     parse_query, ConsoleProgress, ExportPipeline, JsonLinesSink, PaginationConfig,
//! };
//! use elastictl::domain::IndexName;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("elastictl.toml")?;
//!
//! let backend = Arc::new(HttpSearchBackend::new(&config.backend)?);
//! let pipeline = ExportPipeline::new(backend, PaginationConfig::from_config(&config.export));
//!
//! let index = IndexName::new("logs-2024")?;
//! let query = parse_query(r#"{"query":{"term":{"level":"error"}}}"#)?;
//! let mut sink = JsonLinesSink::create("logs-2024.ndjson").await?;
//! let mut progress = ConsoleProgress::new(config.export.progress);
//!
//! let summary = pipeline.export(&index, query, &mut sink, &mut progress).await?;
//! println!("Exported: {}", summary.exported);
//! # Ok(())
//! # }
//! ```

pub mod export;
