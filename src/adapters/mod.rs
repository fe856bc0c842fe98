//! External system integrations for elastictl.
//!
//! - [`search`] - Search backend client (index, point-in-time and search endpoints)
//!
//! # Design Pattern
//!
//! Adapters isolate external dependencies behind traits so the export
//! pipeline can be driven by test doubles:
//!
//! ```rust,no_run
//! use elastictl::adapters::search::{HttpSearchBackend, SearchBackend};
//! use elastictl::config::BackendConfig;
//! use std::sync::Arc;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = BackendConfig {
//!     base_url: "https://search.example.com:9200".to_string(),
//!     ..Default::default()
//! };
//!
//! let backend: Arc<dyn SearchBackend> = Arc::new(HttpSearchBackend::new(&config)?);
//! # Ok(())
//! # }
//! ```

pub mod search;
