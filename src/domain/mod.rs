//! Domain models and types for elastictl.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`IndexName`], [`PitId`], [`KeepAlive`])
//! - **Error types** ([`ElastictlError`], [`ExportError`])
//! - **Result type alias** ([`Result`])
//!
//! # Error Handling
//!
//! All fallible operations outside the export pipeline return
//! [`Result<T, ElastictlError>`]:
//!
//! ```rust
//! use elastictl::domain::{IndexName, ElastictlError, Result};
//!
//! fn example(name: &str) -> Result<IndexName> {
//!     IndexName::new(name).map_err(ElastictlError::Validation)
//! }
//! ```

pub mod errors;
pub mod ids;
pub mod result;

// Re-export commonly used types for convenience
pub use errors::{ElastictlError, ExportError};
pub use ids::{IndexName, KeepAlive, PitId};
pub use result::Result;
