//! Export command implementation
//!
//! This module implements the `export` command: the index definition and
//! every matching document are written as NDJSON to stdout or a file.

use crate::adapters::search::HttpSearchBackend;
use crate::config::ElastictlConfig;
use crate::core::export::{
    parse_query, ConsoleProgress, ExportPipeline, ExportSummary, JsonLinesSink, PaginationConfig,
};
use crate::domain::{ElastictlError, ExportError, IndexName, KeepAlive, Result};
use clap::Args;
use indicatif::HumanBytes;
use serde_json::{Map, Value};
use std::path::PathBuf;
use std::sync::Arc;

/// Arguments for the export command
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Backend address, `host:port` or a full URL (overrides backend.base_url)
    #[arg(long, env = "ELASTICTL_HOST")]
    pub host: Option<String>,

    /// Index (or alias) to export
    #[arg(short, long)]
    pub index: String,

    /// Search body as inline JSON or `@path`; `-` or absent matches everything
    #[arg(short, long)]
    pub query: Option<String>,

    /// Output file, created or truncated; stdout when absent
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Override hits per page (overrides export.page_size)
    #[arg(long)]
    pub page_size: Option<usize>,

    /// Override snapshot keep-alive such as `30s` or `5m` (overrides export.keep_alive)
    #[arg(long)]
    pub keep_alive: Option<String>,

    /// Disable the progress bar
    #[arg(long)]
    pub no_progress: bool,
}

impl ExportArgs {
    /// Execute the export command
    pub async fn execute(&self, mut config: ElastictlConfig) -> anyhow::Result<i32> {
        tracing::info!("Starting export command");

        if let Err(e) = self.apply_overrides(&mut config) {
            tracing::error!(error = %e, "Invalid command line override");
            eprintln!("Invalid argument: {e}");
            return Ok(2);
        }

        if let Err(e) = config.validate() {
            tracing::error!(error = %e, "Configuration validation failed");
            eprintln!("Configuration validation failed: {e}");
            return Ok(2);
        }

        let index = match IndexName::new(self.index.as_str()) {
            Ok(index) => index,
            Err(e) => {
                eprintln!("Invalid index name: {e}");
                return Ok(2);
            }
        };

        let query = match self.read_query().await {
            Ok(query) => query,
            Err(e) => {
                crate::log_error_with_context!(&e, "Failed to read search query");
                eprintln!("Invalid query: {e}");
                return Ok(2);
            }
        };

        let backend = match HttpSearchBackend::new(&config.backend) {
            Ok(backend) => backend,
            Err(e) => {
                crate::log_error_with_context!(&e, "Failed to create search client");
                eprintln!("Failed to initialize export: {e}");
                return Ok(2);
            }
        };

        let pipeline = ExportPipeline::new(
            Arc::new(backend),
            PaginationConfig::from_config(&config.export),
        );
        let mut progress = ConsoleProgress::new(config.export.progress);

        let result = match &self.output {
            Some(path) => {
                let mut sink = match JsonLinesSink::create(path).await {
                    Ok(sink) => sink,
                    Err(e) => {
                        eprintln!("Failed to open output: {e}");
                        return Ok(exit_code(&e));
                    }
                };
                pipeline
                    .export(&index, query, &mut sink, &mut progress)
                    .await
            }
            None => {
                let mut sink = JsonLinesSink::stdout();
                pipeline
                    .export(&index, query, &mut sink, &mut progress)
                    .await
            }
        };

        match result {
            Ok(summary) => {
                print_summary(&index, &summary);
                Ok(0)
            }
            Err(failure) => {
                eprintln!();
                eprintln!("❌ Export of '{index}' failed: {}", failure.error);
                eprintln!("   Records written before the failure: {}", failure.exported);
                Ok(exit_code(&failure.error))
            }
        }
    }

    /// Apply command line overrides on top of the loaded configuration
    fn apply_overrides(&self, config: &mut ElastictlConfig) -> std::result::Result<(), String> {
        if let Some(host) = &self.host {
            let base_url = normalize_host(host);
            tracing::info!(base_url = %base_url, "Overriding backend URL from CLI");
            config.backend.base_url = base_url;
        }

        if let Some(page_size) = self.page_size {
            tracing::info!(page_size = page_size, "Overriding page size from CLI");
            config.export.page_size = page_size;
        }

        if let Some(keep_alive) = &self.keep_alive {
            config.export.keep_alive = KeepAlive::parse(keep_alive.as_str())?;
        }

        if self.no_progress {
            config.export.progress = false;
        }

        Ok(())
    }

    /// Resolve `--query` into a search body
    async fn read_query(&self) -> Result<Map<String, Value>> {
        match self.query.as_deref() {
            None | Some("-") => Ok(Map::new()),
            Some(arg) => match arg.strip_prefix('@') {
                Some(path) => {
                    let content = tokio::fs::read_to_string(path).await.map_err(|e| {
                        ElastictlError::Validation(format!("cannot read query file {path}: {e}"))
                    })?;
                    parse_query(&content)
                }
                None => parse_query(arg),
            },
        }
    }
}

/// Turn `host:port` into a base URL; full URLs pass through
pub fn normalize_host(host: &str) -> String {
    let host = host.trim();
    if host.starts_with("http://") || host.starts_with("https://") {
        host.to_string()
    } else {
        format!("http://{host}")
    }
}

/// Process exit code for a failed export
pub fn exit_code(error: &ExportError) -> i32 {
    match error {
        ExportError::BackendUnreachable(_) => 4,
        _ => 5,
    }
}

fn print_summary(index: &IndexName, summary: &ExportSummary) {
    eprintln!();
    eprintln!("📊 Export Summary ({index}):");
    eprintln!("  Records: {}", summary.exported);
    eprintln!("  Declared total: {}", summary.total_hits);
    eprintln!("  Bytes: {}", HumanBytes(summary.bytes));
    eprintln!("  Pages: {}", summary.pages);
    eprintln!("  Duration: {:.2}s", summary.duration.as_secs_f64());
    eprintln!();
    eprintln!("✅ Export completed successfully!");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;
    use tempfile::TempDir;

    fn parse(args: &[&str]) -> ExportArgs {
        let mut argv = vec!["elastictl", "export"];
        argv.extend_from_slice(args);
        match Cli::parse_from(argv).command {
            Commands::Export(args) => args,
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_export_args_defaults() {
        let args = parse(&["--index", "products"]);

        assert_eq!(args.index, "products");
        assert!(args.query.is_none());
        assert!(args.output.is_none());
        assert!(args.page_size.is_none());
        assert!(args.keep_alive.is_none());
        assert!(!args.no_progress);
    }

    #[test]
    fn test_export_args_with_overrides() {
        let args = parse(&[
            "--host",
            "localhost:9201",
            "-i",
            "logs",
            "-q",
            r#"{"query":{"match_all":{}}}"#,
            "-o",
            "out.ndjson",
            "--page-size",
            "500",
            "--keep-alive",
            "5m",
            "--no-progress",
        ]);

        let mut config = ElastictlConfig::default();
        args.apply_overrides(&mut config).unwrap();

        assert_eq!(config.backend.base_url, "http://localhost:9201");
        assert_eq!(config.export.page_size, 500);
        assert_eq!(config.export.keep_alive.as_str(), "5m");
        assert!(!config.export.progress);
        assert_eq!(args.output, Some(PathBuf::from("out.ndjson")));
    }

    #[test]
    fn test_invalid_keep_alive_override() {
        let args = parse(&["-i", "logs", "--keep-alive", "forever"]);
        let mut config = ElastictlConfig::default();
        assert!(args.apply_overrides(&mut config).is_err());
    }

    #[test]
    fn test_normalize_host() {
        assert_eq!(normalize_host("localhost:9200"), "http://localhost:9200");
        assert_eq!(normalize_host(" es:9200 "), "http://es:9200");
        assert_eq!(normalize_host("https://es.example.com"), "https://es.example.com");
        assert_eq!(normalize_host("http://10.0.0.1:9200"), "http://10.0.0.1:9200");
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(exit_code(&ExportError::BackendUnreachable("refused".into())), 4);
        assert_eq!(exit_code(&ExportError::MissingTotal), 5);
        assert_eq!(exit_code(&ExportError::SinkWriteFailed("full".into())), 5);
    }

    #[tokio::test]
    async fn test_read_query_match_all() {
        assert!(parse(&["-i", "a"]).read_query().await.unwrap().is_empty());
        assert!(parse(&["-i", "a", "-q", "-"]).read_query().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_read_query_inline_and_file() {
        let inline = parse(&["-i", "a", "-q", r#"{"sort":["ts"]}"#]);
        assert!(inline.read_query().await.unwrap().contains_key("sort"));

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("query.json");
        std::fs::write(&path, r#"{"query":{"term":{"level":"error"}}}"#).unwrap();

        let arg = format!("@{}", path.display());
        let from_file = parse(&["-i", "a", "-q", &arg]);
        assert!(from_file.read_query().await.unwrap().contains_key("query"));
    }

    #[tokio::test]
    async fn test_read_query_rejects_bad_input() {
        let not_object = parse(&["-i", "a", "-q", "[1]"]);
        assert!(matches!(
            not_object.read_query().await,
            Err(ElastictlError::Validation(_))
        ));

        let missing = parse(&["-i", "a", "-q", "@/nonexistent/query.json"]);
        assert!(missing.read_query().await.is_err());
    }
}
