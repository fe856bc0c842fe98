//! Export pipeline - drives a full index export
//!
//! The pipeline runs three phases in order:
//!
//! 1. Fetch the index definition and write it as the first output line
//! 2. Open a point-in-time snapshot of the index
//! 3. Page through the snapshot with `search_after`, writing each hit as a line
//!
//! Pages are requested one at a time and written as they arrive, so memory
//! is bounded by a single page. A page shorter than the page size ends the
//! export; there is no separate "has more" query. The snapshot is released
//! once on every path out of phase 3.

use super::progress::ProgressReporter;
use super::request::QueryTemplate;
use super::sink::RecordSink;
use super::snapshot::Snapshot;
use super::summary::{ExportFailure, ExportSummary};
use crate::adapters::search::{extract_mapping, SearchBackend, SearchPage};
use crate::config::{ExportConfig, MAX_PAGE_SIZE};
use crate::domain::{ExportError, IndexName, KeepAlive, PitId};
use serde_json::{Map, Value};
use std::sync::Arc;
use std::time::Instant;

/// Pagination parameters shared by the request builder and the exhaustion check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationConfig {
    /// Hits requested per page. A shorter page ends the export.
    pub page_size: usize,

    /// Snapshot keep-alive sent with every request
    pub keep_alive: KeepAlive,

    /// Sort field injected when the query has none
    pub default_sort_field: String,
}

impl PaginationConfig {
    /// Build from the `[export]` configuration section
    pub fn from_config(config: &ExportConfig) -> Self {
        Self {
            page_size: config.page_size,
            keep_alive: config.keep_alive.clone(),
            default_sort_field: config.default_sort_field.clone(),
        }
    }
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self::from_config(&ExportConfig::default())
    }
}

/// Export pipeline
///
/// # Example
///
/// ```no_run
/// use elastictl::adapters::search::HttpSearchBackend;
/// use elastictl::config::BackendConfig;
/// use elastictl::core::export::{
///     ConsoleProgress, ExportPipeline, JsonLinesSink, PaginationConfig,
/// };
/// use elastictl::domain::IndexName;
/// use std::sync::Arc;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let backend = Arc::new(HttpSearchBackend::new(&BackendConfig::default())?);
/// let pipeline = ExportPipeline::new(backend, PaginationConfig::default());
///
/// let index = IndexName::new("products")?;
/// let mut sink = JsonLinesSink::stdout();
/// let mut progress = ConsoleProgress::new(true);
///
/// let summary = pipeline
///     .export(&index, serde_json::Map::new(), &mut sink, &mut progress)
///     .await?;
/// eprintln!("exported {} records", summary.exported);
/// # Ok(())
/// # }
/// ```
pub struct ExportPipeline {
    backend: Arc<dyn SearchBackend>,
    config: PaginationConfig,
}

impl ExportPipeline {
    /// Create a pipeline over a caller-owned backend client
    pub fn new(backend: Arc<dyn SearchBackend>, mut config: PaginationConfig) -> Self {
        config.page_size = config.page_size.clamp(1, MAX_PAGE_SIZE);
        Self { backend, config }
    }

    /// Pagination parameters in effect
    pub fn config(&self) -> &PaginationConfig {
        &self.config
    }

    /// Export every document of `index` matching `query` into `sink`
    ///
    /// An empty `query` matches everything. On success the summary counts the
    /// records written; on failure [`ExportFailure::exported`] counts the
    /// complete record lines that reached the sink's output before the error.
    ///
    /// # Errors
    ///
    /// Every [`ExportError`] is fatal. Failures before the snapshot exists
    /// leave nothing to clean up; later failures release the snapshot first.
    pub async fn export(
        &self,
        index: &IndexName,
        query: Map<String, Value>,
        sink: &mut dyn RecordSink,
        progress: &mut dyn ProgressReporter,
    ) -> Result<ExportSummary, ExportFailure> {
        let started = Instant::now();
        crate::log_export_start!(self.backend.base_url(), index);

        let body = self
            .backend
            .get_index(index)
            .await
            .map_err(|e| self.fail(0, e))?;
        let mapping = extract_mapping(&body, index).map_err(|e| self.fail(0, e))?;
        sink.write_record(&mapping)
            .await
            .map_err(|e| self.fail(0, e))?;

        let template = QueryTemplate::new(query, &self.config.default_sort_field);
        if let Some(sort) = template.default_sort() {
            tracing::debug!(sort = sort, "No sort in query, sorting by default field");
        }

        let snapshot = Snapshot::open(self.backend.as_ref(), index, &self.config.keep_alive)
            .await
            .map_err(|e| self.fail(0, e))?;

        let mut summary = ExportSummary::default();
        let paged = self
            .paginate(snapshot.pit(), &template, sink, progress, &mut summary)
            .await;

        progress.finish();
        snapshot.release().await;

        let outcome = match (paged, sink.flush().await) {
            (Err(e), Err(flush)) => {
                tracing::warn!(error = %flush, "Failed to flush output after export failure");
                Err(e)
            }
            (Err(e), Ok(())) | (Ok(()), Err(e)) => Err(e),
            (Ok(()), Ok(())) => Ok(()),
        };

        match outcome {
            Ok(()) => {
                let summary = summary.with_duration(started.elapsed());
                summary.log_summary();
                Ok(summary)
            }
            // The sink may have lost buffered lines; count only complete ones
            Err(e) => Err(self.fail(sink.committed().saturating_sub(1), e)),
        }
    }

    /// Page through the snapshot until a short or empty page
    async fn paginate(
        &self,
        pit: &PitId,
        template: &QueryTemplate,
        sink: &mut dyn RecordSink,
        progress: &mut dyn ProgressReporter,
        summary: &mut ExportSummary,
    ) -> Result<(), ExportError> {
        let page_size = self.config.page_size;
        let keep_alive = &self.config.keep_alive;
        let mut request = template.first_page(pit, keep_alive, page_size);

        loop {
            let body = self.backend.search(&request).await?;
            let page = SearchPage::parse(&body)?;
            summary.pages += 1;

            if summary.pages == 1 {
                let total = page.total().ok_or(ExportError::MissingTotal)?;
                summary.total_hits = total;
                progress.init(total);
                tracing::info!(total_hits = total, "Snapshot opened, exporting documents");
            }

            let hits = page.hits()?;
            crate::log_page_fetched!(summary.pages, hits.len(), summary.exported);

            let Some(last) = hits.last() else {
                return Ok(());
            };

            for hit in &hits {
                let bytes = hit.byte_len() as u64;
                sink.write_record(hit.raw()).await?;
                progress.advance(bytes);
                summary.exported += 1;
                summary.bytes += bytes;
            }

            if hits.len() < page_size {
                return Ok(());
            }

            let cursor = last.sort_values()?.ok_or_else(|| {
                ExportError::MalformedResponse(
                    "last hit of a full page carries no sort values".to_string(),
                )
            })?;
            request = template.next_page(pit, keep_alive, page_size, cursor.to_owned());
        }
    }

    fn fail(&self, exported: usize, error: ExportError) -> ExportFailure {
        tracing::error!(
            kind = error.kind(),
            error = %error,
            exported = exported,
            base_url = self.backend.base_url(),
            "Export failed"
        );
        ExportFailure::new(exported, error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_config_defaults() {
        let config = PaginationConfig::default();
        assert_eq!(config.page_size, 10_000);
        assert_eq!(config.keep_alive.as_str(), "1m");
        assert_eq!(config.default_sort_field, "_id");
    }

    #[test]
    fn test_pagination_config_from_export_section() {
        let export = ExportConfig {
            page_size: 250,
            keep_alive: KeepAlive::parse("30s").unwrap(),
            default_sort_field: "_shard_doc".to_string(),
            progress: false,
        };

        let config = PaginationConfig::from_config(&export);
        assert_eq!(config.page_size, 250);
        assert_eq!(config.keep_alive.as_str(), "30s");
        assert_eq!(config.default_sort_field, "_shard_doc");
    }
}
