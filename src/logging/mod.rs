//! Logging and observability
//!
//! This module provides structured logging with support for:
//! - Console logs on stderr, keeping stdout free for exported records
//! - Configurable log levels, overridable with `RUST_LOG`
//! - Local JSON log files with rotation
//!
//! # Example
//!
//! ```no_run
//! use elastictl::logging::init_logging;
//! use elastictl::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};

/// Log the start of an export operation
///
/// # Example
///
/// ```no_run
/// use elastictl::log_export_start;
/// use elastictl::domain::IndexName;
///
/// let index = IndexName::new("products").unwrap();
/// log_export_start!("http://localhost:9200/", &index);
/// ```
#[macro_export]
macro_rules! log_export_start {
    ($base_url:expr, $index:expr) => {
        tracing::info!(
            base_url = %$base_url,
            index = %$index,
            "Starting export"
        );
    };
}

/// Log the completion of an export operation
///
/// # Example
///
/// ```no_run
/// use elastictl::log_export_complete;
/// use std::time::Duration;
///
/// let count = 42;
/// let duration = Duration::from_secs(10);
/// log_export_complete!(count, duration);
/// ```
#[macro_export]
macro_rules! log_export_complete {
    ($count:expr, $duration:expr) => {
        tracing::info!(
            count = $count,
            duration_ms = $duration.as_millis() as u64,
            "Export completed"
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use elastictl::log_error_with_context;
/// use elastictl::domain::ElastictlError;
///
/// let error = ElastictlError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}

/// Log a fetched search page
///
/// # Example
///
/// ```no_run
/// use elastictl::log_page_fetched;
///
/// log_page_fetched!(3, 10000, 20000);
/// ```
#[macro_export]
macro_rules! log_page_fetched {
    ($page:expr, $hits:expr, $exported:expr) => {
        tracing::debug!(
            page = $page,
            hits = $hits,
            exported = $exported,
            "Fetched page"
        );
    };
}
