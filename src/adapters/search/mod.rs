//! Search backend adapter
//!
//! Client and wire models for Elasticsearch/OpenSearch-compatible backends.

pub mod client;
pub mod models;

pub use client::{HttpSearchBackend, SearchBackend};
pub use models::{
    extract_mapping, Hit, PitReference, PitResponse, SearchBody, SearchPage, SearchRequest,
};
