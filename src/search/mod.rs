//! Search layer
//!
//! This module provides search abstraction for the Inkdex blog platform.
//! It supports:
//! - Elasticsearch (default, for production deployments)
//! - An in-process index (for development and tests)
//!
//! The backend is selected based on configuration. Query construction is
//! shared: the API layer builds a [`QueryExpression`] per entity and the
//! backend executes it against the entity's index, returning the total hit
//! count plus one page of raw hits.

pub mod documents;
pub mod elastic;
pub mod memory;
pub mod query;

pub use documents::{
    ArticleDocument, CategoryDocument, UserDocument, ARTICLES_INDEX, CATEGORIES_INDEX, USERS_INDEX,
};
pub use elastic::ElasticBackend;
pub use memory::MemoryBackend;
pub use query::{Fuzziness, QueryExpression};

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

use crate::config::{SearchConfig, SearchDriver};

/// One page of search hits
#[derive(Debug, Clone)]
pub struct SearchPage {
    /// Total number of hits for the query across all pages
    pub total: i64,
    /// Raw hit documents for the requested page, in ranking order
    pub hits: Vec<Value>,
}

/// Trait for search index operations, enabling the in-process backend and
/// mock testing.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Create the indices with their field mappings if missing.
    /// Called once on startup.
    async fn ensure_indices(&self) -> Result<()>;

    /// Add or update a document in an index
    async fn index_document(&self, index: &str, id: i64, document: &Value) -> Result<()>;

    /// Remove a document from an index (missing documents are not an error)
    async fn delete_document(&self, index: &str, id: i64) -> Result<()>;

    /// Execute a query expression, slicing by limit/offset
    async fn search(
        &self,
        index: &str,
        expression: &QueryExpression,
        limit: i64,
        offset: i64,
    ) -> Result<SearchPage>;
}

/// Type alias for a shared search backend
pub type DynSearchBackend = Arc<dyn SearchBackend>;

/// Create a search backend based on configuration.
pub fn create_backend(config: &SearchConfig) -> Result<DynSearchBackend> {
    match config.driver {
        SearchDriver::Elastic => {
            let backend = ElasticBackend::new(&config.url)?;
            Ok(Arc::new(backend))
        }
        SearchDriver::Memory => Ok(Arc::new(MemoryBackend::new())),
    }
}
