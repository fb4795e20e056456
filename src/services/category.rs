//! Category service
//!
//! Implements business logic for category management:
//! - Create, read, update, delete categories
//! - Name validation
//! - Search index synchronization

use crate::db::repositories::CategoryRepository;
use crate::models::{Category, CreateCategoryInput, ListParams, PagedResult, UpdateCategoryInput};
use crate::search::{CategoryDocument, DynSearchBackend, CATEGORIES_INDEX};
use std::sync::Arc;

/// Maximum category name length, mirroring the column width
const MAX_NAME_LEN: usize = 32;

/// Error types for category service operations
#[derive(Debug, thiserror::Error)]
pub enum CategoryServiceError {
    /// Category not found
    #[error("Category not found: {0}")]
    NotFound(i64),

    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// Category service for managing blog categories
pub struct CategoryService {
    repo: Arc<dyn CategoryRepository>,
    search: DynSearchBackend,
}

impl CategoryService {
    /// Create a new category service
    pub fn new(repo: Arc<dyn CategoryRepository>, search: DynSearchBackend) -> Self {
        Self { repo, search }
    }

    /// Create a new category
    pub async fn create_category(
        &self,
        input: CreateCategoryInput,
    ) -> Result<Category, CategoryServiceError> {
        let name = input.name.trim().to_string();
        validate_name(&name)?;

        let category = self
            .repo
            .create(&Category::new(name, input.description))
            .await?;

        self.sync_document(&category).await;
        Ok(category)
    }

    /// Get a category by ID
    pub async fn get_category(&self, id: i64) -> Result<Category, CategoryServiceError> {
        self.repo
            .get_by_id(id)
            .await?
            .ok_or(CategoryServiceError::NotFound(id))
    }

    /// List categories with pagination
    pub async fn list_categories(
        &self,
        params: &ListParams,
    ) -> Result<PagedResult<Category>, CategoryServiceError> {
        let items = self.repo.list(params).await?;
        let total = self.repo.count().await?;
        Ok(PagedResult::new(items, total, params))
    }

    /// Update a category
    pub async fn update_category(
        &self,
        id: i64,
        input: UpdateCategoryInput,
    ) -> Result<Category, CategoryServiceError> {
        let mut category = self.get_category(id).await?;
        if !input.has_changes() {
            return Ok(category);
        }

        if let Some(name) = input.name {
            let name = name.trim().to_string();
            validate_name(&name)?;
            category.name = name;
        }
        if let Some(description) = input.description {
            category.description = Some(description);
        }

        let updated = self.repo.update(&category).await?;
        self.sync_document(&updated).await;
        Ok(updated)
    }

    /// Delete a category; junction rows cascade in the relational store.
    pub async fn delete_category(&self, id: i64) -> Result<(), CategoryServiceError> {
        let _category = self.get_category(id).await?;
        self.repo.delete(id).await?;

        if let Err(e) = self.search.delete_document(CATEGORIES_INDEX, id).await {
            tracing::warn!("Failed to remove category {} from index: {}", id, e);
        }
        Ok(())
    }

    /// Write the category's document to the index, logging on failure.
    async fn sync_document(&self, category: &Category) {
        let doc = match serde_json::to_value(CategoryDocument::from(category)) {
            Ok(doc) => doc,
            Err(e) => {
                tracing::warn!(
                    "Failed to serialize category document {}: {}",
                    category.id,
                    e
                );
                return;
            }
        };
        if let Err(e) = self
            .search
            .index_document(CATEGORIES_INDEX, category.id, &doc)
            .await
        {
            tracing::warn!("Failed to index category {}: {}", category.id, e);
        }
    }
}

fn validate_name(name: &str) -> Result<(), CategoryServiceError> {
    if name.is_empty() {
        return Err(CategoryServiceError::ValidationError(
            "Category name must not be empty".to_string(),
        ));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(CategoryServiceError::ValidationError(format!(
            "Category name exceeds {} characters",
            MAX_NAME_LEN
        )));
    }
    Ok(())
}
