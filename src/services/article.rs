//! Article service
//!
//! Implements business logic for article management:
//! - Create, read, update, delete articles
//! - Author and category reference validation
//! - Category set management through the junction table
//! - Search index synchronization (the article document denormalizes the
//!   author's username and the type label)

use crate::db::repositories::{ArticleRepository, CategoryRepository, UserRepository};
use crate::models::{
    Article, CreateArticleInput, ListParams, PagedResult, UpdateArticleInput, User,
};
use crate::search::{ArticleDocument, DynSearchBackend, ARTICLES_INDEX};
use std::sync::Arc;

/// Error types for article service operations
#[derive(Debug, thiserror::Error)]
pub enum ArticleServiceError {
    /// Article not found
    #[error("Article not found: {0}")]
    NotFound(i64),

    /// Referenced author does not exist
    #[error("Author not found: {0}")]
    AuthorNotFound(i64),

    /// Referenced category does not exist
    #[error("Category not found: {0}")]
    CategoryNotFound(i64),

    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// An article together with the IDs of its attached categories
#[derive(Debug, Clone)]
pub struct ArticleRecord {
    pub article: Article,
    pub category_ids: Vec<i64>,
}

/// Article service for managing blog articles
pub struct ArticleService {
    repo: Arc<dyn ArticleRepository>,
    user_repo: Arc<dyn UserRepository>,
    category_repo: Arc<dyn CategoryRepository>,
    search: DynSearchBackend,
}

impl ArticleService {
    /// Create a new article service
    pub fn new(
        repo: Arc<dyn ArticleRepository>,
        user_repo: Arc<dyn UserRepository>,
        category_repo: Arc<dyn CategoryRepository>,
        search: DynSearchBackend,
    ) -> Self {
        Self {
            repo,
            user_repo,
            category_repo,
            search,
        }
    }

    /// Create a new article
    pub async fn create_article(
        &self,
        input: CreateArticleInput,
    ) -> Result<ArticleRecord, ArticleServiceError> {
        let title = input.title.trim().to_string();
        if title.is_empty() {
            return Err(ArticleServiceError::ValidationError(
                "Article title must not be empty".to_string(),
            ));
        }

        let author = self
            .user_repo
            .get_by_id(input.author_id)
            .await?
            .ok_or(ArticleServiceError::AuthorNotFound(input.author_id))?;
        self.check_categories(&input.category_ids).await?;

        let article = self
            .repo
            .create(&Article::new(
                title,
                author.id,
                input.article_type,
                input.content,
            ))
            .await?;
        self.repo
            .set_categories(article.id, &input.category_ids)
            .await?;

        self.sync_document(&article, &author).await;

        Ok(ArticleRecord {
            article,
            category_ids: input.category_ids,
        })
    }

    /// Get an article with its category IDs
    pub async fn get_article(&self, id: i64) -> Result<ArticleRecord, ArticleServiceError> {
        let article = self
            .repo
            .get_by_id(id)
            .await?
            .ok_or(ArticleServiceError::NotFound(id))?;
        let category_ids = self.repo.category_ids(id).await?;
        Ok(ArticleRecord {
            article,
            category_ids,
        })
    }

    /// List articles with pagination, including their category IDs
    pub async fn list_articles(
        &self,
        params: &ListParams,
    ) -> Result<PagedResult<ArticleRecord>, ArticleServiceError> {
        let articles = self.repo.list(params).await?;
        let total = self.repo.count().await?;

        let mut items = Vec::with_capacity(articles.len());
        for article in articles {
            let category_ids = self.repo.category_ids(article.id).await?;
            items.push(ArticleRecord {
                article,
                category_ids,
            });
        }

        Ok(PagedResult::new(items, total, params))
    }

    /// Update an article
    pub async fn update_article(
        &self,
        id: i64,
        input: UpdateArticleInput,
    ) -> Result<ArticleRecord, ArticleServiceError> {
        let mut article = self
            .repo
            .get_by_id(id)
            .await?
            .ok_or(ArticleServiceError::NotFound(id))?;

        if !input.has_changes() {
            let category_ids = self.repo.category_ids(id).await?;
            return Ok(ArticleRecord {
                article,
                category_ids,
            });
        }

        if let Some(title) = input.title {
            let title = title.trim().to_string();
            if title.is_empty() {
                return Err(ArticleServiceError::ValidationError(
                    "Article title must not be empty".to_string(),
                ));
            }
            article.title = title;
        }
        if let Some(article_type) = input.article_type {
            article.article_type = article_type;
        }
        if let Some(content) = input.content {
            article.content = content;
        }
        if let Some(ref category_ids) = input.category_ids {
            self.check_categories(category_ids).await?;
        }

        let updated = self.repo.update(&article).await?;

        let category_ids = match input.category_ids {
            Some(category_ids) => {
                self.repo.set_categories(id, &category_ids).await?;
                category_ids
            }
            None => self.repo.category_ids(id).await?,
        };

        match self.user_repo.get_by_id(updated.author_id).await? {
            Some(author) => self.sync_document(&updated, &author).await,
            None => tracing::warn!(
                "Author {} missing while re-indexing article {}",
                updated.author_id,
                updated.id
            ),
        }

        Ok(ArticleRecord {
            article: updated,
            category_ids,
        })
    }

    /// Delete an article
    pub async fn delete_article(&self, id: i64) -> Result<(), ArticleServiceError> {
        self.repo
            .get_by_id(id)
            .await?
            .ok_or(ArticleServiceError::NotFound(id))?;
        self.repo.delete(id).await?;

        if let Err(e) = self.search.delete_document(ARTICLES_INDEX, id).await {
            tracing::warn!("Failed to remove article {} from index: {}", id, e);
        }
        Ok(())
    }

    /// Verify that every referenced category exists
    async fn check_categories(&self, category_ids: &[i64]) -> Result<(), ArticleServiceError> {
        for &category_id in category_ids {
            if self.category_repo.get_by_id(category_id).await?.is_none() {
                return Err(ArticleServiceError::CategoryNotFound(category_id));
            }
        }
        Ok(())
    }

    /// Write the article's document to the index, logging on failure.
    async fn sync_document(&self, article: &Article, author: &User) {
        let doc = match serde_json::to_value(ArticleDocument::new(article, author)) {
            Ok(doc) => doc,
            Err(e) => {
                tracing::warn!("Failed to serialize article document {}: {}", article.id, e);
                return;
            }
        };
        if let Err(e) = self
            .search
            .index_document(ARTICLES_INDEX, article.id, &doc)
            .await
        {
            tracing::warn!("Failed to index article {}: {}", article.id, e);
        }
    }
}
