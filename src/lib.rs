// elastictl - Elasticsearch Index Export Tool
// Copyright (c) 2025 elastictl Contributors
// Licensed under the MIT License

//! # elastictl - Elasticsearch index export
//!
//! elastictl streams an entire search index to newline-delimited JSON: the
//! index definition first, then every matching document, in a stable order.
//!
//! ## Overview
//!
//! This library provides the core functionality for:
//! - **Dumping** the index definition (mappings, settings, aliases) as the first line
//! - **Snapshotting** the index with a point in time so concurrent writes are invisible
//! - **Paginating** with `search_after` so result sets of any size can be exported
//! - **Releasing** the snapshot on every exit path, success or failure
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Export pipeline, request building, output and progress
//! - [`adapters`] - Search backend client over HTTP
//! - [`domain`] - Identifiers and error types
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging and observability
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use elastictl::adapters::search::HttpSearchBackend;
//! use elastictl::config::load_config_or_default;
//! use elastictl::core::export::{ConsoleProgress, ExportPipeline, JsonLinesSink, PaginationConfig};
//! use elastictl::domain::IndexName;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config_or_default("elastictl.toml")?;
//!
//!     let backend = Arc::new(HttpSearchBackend::new(&config.backend)?);
//!     let pipeline = ExportPipeline::new(backend, PaginationConfig::from_config(&config.export));
//!
//!     let index = IndexName::new("products")?;
//!     let mut sink = JsonLinesSink::create("products.ndjson").await?;
//!     let mut progress = ConsoleProgress::new(true);
//!
//!     let summary = pipeline
//!         .export(&index, serde_json::Map::new(), &mut sink, &mut progress)
//!         .await?;
//!
//!     println!("Exported {} documents", summary.exported);
//!     Ok(())
//! }
//! ```
//!
//! ## Output Format
//!
//! ```text
//! {"aliases":{},"mappings":{...},"settings":{...}}
//! {"_index":"products","_id":"1","_score":null,"_source":{...},"sort":["1"]}
//! {"_index":"products","_id":"2","_score":null,"_source":{...},"sort":["2"]}
//! ```
//!
//! Every line is passed through byte for byte as the backend returned it.
//!
//! ## Error Handling
//!
//! Setup and configuration use [`domain::ElastictlError`]. The export itself
//! fails with [`core::export::ExportFailure`], which carries the
//! [`domain::ExportError`] kind and the number of records already written.
//! No step is retried.
//!
//! ## Logging
//!
//! Logs use the `tracing` crate and go to stderr, leaving stdout to the
//! exported records:
//!
//! ```rust,no_run
//! use tracing::{info, warn};
//!
//! info!(index = "products", "Starting export");
//! warn!("Failed to release point in time");
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
