//! Elasticsearch backend
//!
//! Production implementation of [`SearchBackend`] over the official
//! Elasticsearch client. Queries are rendered to the query DSL by
//! [`QueryExpression::to_query_dsl`] and pagination is pushed down as
//! `from`/`size`.

use anyhow::{Context, Result};
use async_trait::async_trait;
use elasticsearch::{
    http::transport::Transport,
    http::StatusCode,
    indices::{IndicesCreateParts, IndicesExistsParts},
    DeleteParts, Elasticsearch, IndexParts, SearchParts,
};
use serde_json::{json, Value};

use super::{documents, QueryExpression, SearchBackend, SearchPage};

/// Elasticsearch implementation of the search backend
pub struct ElasticBackend {
    client: Elasticsearch,
}

impl ElasticBackend {
    /// Create a backend talking to a single Elasticsearch node
    pub fn new(url: &str) -> Result<Self> {
        let transport = Transport::single_node(url)
            .with_context(|| format!("Failed to create Elasticsearch transport for {}", url))?;
        Ok(Self {
            client: Elasticsearch::new(transport),
        })
    }
}

#[async_trait]
impl SearchBackend for ElasticBackend {
    async fn ensure_indices(&self) -> Result<()> {
        for (index, body) in documents::index_definitions() {
            let exists = self
                .client
                .indices()
                .exists(IndicesExistsParts::Index(&[index]))
                .send()
                .await
                .with_context(|| format!("Failed to check index: {}", index))?;

            if exists.status_code().is_success() {
                continue;
            }

            let response = self
                .client
                .indices()
                .create(IndicesCreateParts::Index(index))
                .body(body)
                .send()
                .await
                .with_context(|| format!("Failed to create index: {}", index))?;

            if !response.status_code().is_success() {
                let detail = response.text().await.unwrap_or_default();
                anyhow::bail!("Index creation rejected for {}: {}", index, detail);
            }

            tracing::info!("Created search index: {}", index);
        }

        Ok(())
    }

    async fn index_document(&self, index: &str, id: i64, document: &Value) -> Result<()> {
        let response = self
            .client
            .index(IndexParts::IndexId(index, &id.to_string()))
            .body(document)
            .send()
            .await
            .with_context(|| format!("Failed to index document {} in {}", id, index))?;

        if !response.status_code().is_success() {
            let detail = response.text().await.unwrap_or_default();
            anyhow::bail!("Indexing rejected for {}/{}: {}", index, id, detail);
        }

        Ok(())
    }

    async fn delete_document(&self, index: &str, id: i64) -> Result<()> {
        let response = self
            .client
            .delete(DeleteParts::IndexId(index, &id.to_string()))
            .send()
            .await
            .with_context(|| format!("Failed to delete document {} from {}", id, index))?;

        let status = response.status_code();
        if !status.is_success() && status != StatusCode::NOT_FOUND {
            let detail = response.text().await.unwrap_or_default();
            anyhow::bail!("Deletion rejected for {}/{}: {}", index, id, detail);
        }

        Ok(())
    }

    async fn search(
        &self,
        index: &str,
        expression: &QueryExpression,
        limit: i64,
        offset: i64,
    ) -> Result<SearchPage> {
        let response = self
            .client
            .search(SearchParts::Index(&[index]))
            .body(json!({
                "query": expression.to_query_dsl(),
                "from": offset,
                "size": limit,
            }))
            .send()
            .await
            .with_context(|| format!("Search request against {} failed", index))?
            .error_for_status_code()
            .with_context(|| format!("Search against {} returned an error", index))?;

        let body: Value = response
            .json()
            .await
            .context("Failed to parse search response")?;

        let total = body["hits"]["total"]["value"].as_i64().unwrap_or(0);
        let hits = body["hits"]["hits"]
            .as_array()
            .map(|hits| {
                hits.iter()
                    .filter_map(|hit| hit.get("_source").cloned())
                    .collect()
            })
            .unwrap_or_default();

        Ok(SearchPage { total, hits })
    }
}
