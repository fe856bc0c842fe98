//! Configuration management for elastictl.
//!
//! TOML-based configuration loading, parsing, and validation.
//!
//! # Overview
//!
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `ELASTICTL_<SECTION>_<KEY>` environment overrides
//! - Default values for every setting, so the file itself is optional
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Application settings (log level)
//! - [`BackendConfig`] - Search backend URL, credentials, timeouts
//! - [`ExportConfig`] - Page size, snapshot keep-alive, default sort field
//! - [`LoggingConfig`] - Log file settings
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [backend]
//! base_url = "https://search.example.com:9200"
//! username = "elastic"
//! password = "${ES_PASSWORD}"
//!
//! [export]
//! page_size = 10000
//! keep_alive = "1m"
//! default_sort_field = "_id"
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::{load_config, load_config_or_default};
pub use schema::{
    ApplicationConfig, BackendConfig, ElastictlConfig, ExportConfig, LoggingConfig, MAX_PAGE_SIZE,
};
pub use secret::{secret_string, secret_string_opt, SecretString, SecretValue};
