//! Article repository
//!
//! Database operations for articles, including the article/category
//! many-to-many junction.
//!
//! This module provides:
//! - `ArticleRepository` trait defining the interface for article data access
//! - `SqlxArticleRepository` implementing the trait for SQLite and MySQL

use crate::config::DatabaseDriver;
use crate::db::DynDatabasePool;
use crate::models::{Article, ArticleType, ListParams};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{MySqlPool, Row, SqlitePool};
use std::sync::Arc;

/// Article repository trait
#[async_trait]
pub trait ArticleRepository: Send + Sync {
    /// Create a new article
    async fn create(&self, article: &Article) -> Result<Article>;

    /// Get article by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<Article>>;

    /// List articles ordered by id
    async fn list(&self, params: &ListParams) -> Result<Vec<Article>>;

    /// Count all articles
    async fn count(&self) -> Result<i64>;

    /// List all articles written by the given author
    async fn list_by_author(&self, author_id: i64) -> Result<Vec<Article>>;

    /// Update an article, refreshing its `updated_at` timestamp
    async fn update(&self, article: &Article) -> Result<Article>;

    /// Delete an article (junction rows cascade)
    async fn delete(&self, id: i64) -> Result<()>;

    /// Replace the category set attached to an article
    async fn set_categories(&self, article_id: i64, category_ids: &[i64]) -> Result<()>;

    /// Get the IDs of categories attached to an article
    async fn category_ids(&self, article_id: i64) -> Result<Vec<i64>>;
}

/// SQLx-based article repository implementation
///
/// Supports both SQLite and MySQL databases.
pub struct SqlxArticleRepository {
    pool: DynDatabasePool,
}

impl SqlxArticleRepository {
    /// Create a new SQLx article repository
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    /// Create a shared repository for use with dependency injection
    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn ArticleRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl ArticleRepository for SqlxArticleRepository {
    async fn create(&self, article: &Article) -> Result<Article> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                create_article_sqlite(self.pool.as_sqlite().unwrap(), article).await
            }
            DatabaseDriver::Mysql => {
                create_article_mysql(self.pool.as_mysql().unwrap(), article).await
            }
        }
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Article>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                get_article_by_id_sqlite(self.pool.as_sqlite().unwrap(), id).await
            }
            DatabaseDriver::Mysql => {
                get_article_by_id_mysql(self.pool.as_mysql().unwrap(), id).await
            }
        }
    }

    async fn list(&self, params: &ListParams) -> Result<Vec<Article>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                list_articles_sqlite(self.pool.as_sqlite().unwrap(), params).await
            }
            DatabaseDriver::Mysql => {
                list_articles_mysql(self.pool.as_mysql().unwrap(), params).await
            }
        }
    }

    async fn count(&self) -> Result<i64> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => count_articles_sqlite(self.pool.as_sqlite().unwrap()).await,
            DatabaseDriver::Mysql => count_articles_mysql(self.pool.as_mysql().unwrap()).await,
        }
    }

    async fn list_by_author(&self, author_id: i64) -> Result<Vec<Article>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                list_by_author_sqlite(self.pool.as_sqlite().unwrap(), author_id).await
            }
            DatabaseDriver::Mysql => {
                list_by_author_mysql(self.pool.as_mysql().unwrap(), author_id).await
            }
        }
    }

    async fn update(&self, article: &Article) -> Result<Article> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                update_article_sqlite(self.pool.as_sqlite().unwrap(), article).await
            }
            DatabaseDriver::Mysql => {
                update_article_mysql(self.pool.as_mysql().unwrap(), article).await
            }
        }
    }

    async fn delete(&self, id: i64) -> Result<()> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                delete_article_sqlite(self.pool.as_sqlite().unwrap(), id).await
            }
            DatabaseDriver::Mysql => delete_article_mysql(self.pool.as_mysql().unwrap(), id).await,
        }
    }

    async fn set_categories(&self, article_id: i64, category_ids: &[i64]) -> Result<()> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                set_categories_sqlite(self.pool.as_sqlite().unwrap(), article_id, category_ids)
                    .await
            }
            DatabaseDriver::Mysql => {
                set_categories_mysql(self.pool.as_mysql().unwrap(), article_id, category_ids).await
            }
        }
    }

    async fn category_ids(&self, article_id: i64) -> Result<Vec<i64>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                category_ids_sqlite(self.pool.as_sqlite().unwrap(), article_id).await
            }
            DatabaseDriver::Mysql => {
                category_ids_mysql(self.pool.as_mysql().unwrap(), article_id).await
            }
        }
    }
}

// ============================================================================
// SQLite implementations
// ============================================================================

async fn create_article_sqlite(pool: &SqlitePool, article: &Article) -> Result<Article> {
    let now = Utc::now();

    let result = sqlx::query(
        r#"
        INSERT INTO articles (title, author_id, article_type, content, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&article.title)
    .bind(article.author_id)
    .bind(article.article_type.code())
    .bind(&article.content)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await
    .context("Failed to create article")?;

    let id = result.last_insert_rowid();

    Ok(Article {
        id,
        title: article.title.clone(),
        author_id: article.author_id,
        article_type: article.article_type,
        content: article.content.clone(),
        created_at: now,
        updated_at: now,
    })
}

async fn get_article_by_id_sqlite(pool: &SqlitePool, id: i64) -> Result<Option<Article>> {
    let row = sqlx::query(
        r#"
        SELECT id, title, author_id, article_type, content, created_at, updated_at
        FROM articles
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
    .context("Failed to get article by ID")?;

    match row {
        Some(row) => Ok(Some(row_to_article_sqlite(&row)?)),
        None => Ok(None),
    }
}

async fn list_articles_sqlite(pool: &SqlitePool, params: &ListParams) -> Result<Vec<Article>> {
    let rows = sqlx::query(
        r#"
        SELECT id, title, author_id, article_type, content, created_at, updated_at
        FROM articles
        ORDER BY id
        LIMIT ? OFFSET ?
        "#,
    )
    .bind(params.limit)
    .bind(params.offset)
    .fetch_all(pool)
    .await
    .context("Failed to list articles")?;

    let mut articles = Vec::with_capacity(rows.len());
    for row in &rows {
        articles.push(row_to_article_sqlite(row)?);
    }
    Ok(articles)
}

async fn count_articles_sqlite(pool: &SqlitePool) -> Result<i64> {
    let row = sqlx::query("SELECT COUNT(*) as count FROM articles")
        .fetch_one(pool)
        .await
        .context("Failed to count articles")?;
    Ok(row.get("count"))
}

async fn list_by_author_sqlite(pool: &SqlitePool, author_id: i64) -> Result<Vec<Article>> {
    let rows = sqlx::query(
        r#"
        SELECT id, title, author_id, article_type, content, created_at, updated_at
        FROM articles
        WHERE author_id = ?
        ORDER BY id
        "#,
    )
    .bind(author_id)
    .fetch_all(pool)
    .await
    .context("Failed to list articles by author")?;

    let mut articles = Vec::with_capacity(rows.len());
    for row in &rows {
        articles.push(row_to_article_sqlite(row)?);
    }
    Ok(articles)
}

async fn update_article_sqlite(pool: &SqlitePool, article: &Article) -> Result<Article> {
    let now = Utc::now();

    sqlx::query(
        r#"
        UPDATE articles
        SET title = ?, author_id = ?, article_type = ?, content = ?, updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(&article.title)
    .bind(article.author_id)
    .bind(article.article_type.code())
    .bind(&article.content)
    .bind(now)
    .bind(article.id)
    .execute(pool)
    .await
    .context("Failed to update article")?;

    get_article_by_id_sqlite(pool, article.id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Article not found after update"))
}

async fn delete_article_sqlite(pool: &SqlitePool, id: i64) -> Result<()> {
    sqlx::query("DELETE FROM articles WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await
        .context("Failed to delete article")?;

    Ok(())
}

async fn set_categories_sqlite(
    pool: &SqlitePool,
    article_id: i64,
    category_ids: &[i64],
) -> Result<()> {
    let mut tx = pool.begin().await.context("Failed to start transaction")?;

    sqlx::query("DELETE FROM article_categories WHERE article_id = ?")
        .bind(article_id)
        .execute(&mut *tx)
        .await
        .context("Failed to clear article categories")?;

    for category_id in category_ids {
        sqlx::query("INSERT INTO article_categories (article_id, category_id) VALUES (?, ?)")
            .bind(article_id)
            .bind(category_id)
            .execute(&mut *tx)
            .await
            .context("Failed to attach category")?;
    }

    tx.commit().await.context("Failed to commit transaction")?;
    Ok(())
}

async fn category_ids_sqlite(pool: &SqlitePool, article_id: i64) -> Result<Vec<i64>> {
    let rows = sqlx::query(
        "SELECT category_id FROM article_categories WHERE article_id = ? ORDER BY category_id",
    )
    .bind(article_id)
    .fetch_all(pool)
    .await
    .context("Failed to get article categories")?;

    Ok(rows.iter().map(|row| row.get("category_id")).collect())
}

fn row_to_article_sqlite(row: &sqlx::sqlite::SqliteRow) -> Result<Article> {
    let code: String = row.get("article_type");
    let article_type = ArticleType::from_code(&code)
        .ok_or_else(|| anyhow::anyhow!("Unknown article type code: {}", code))?;

    Ok(Article {
        id: row.get("id"),
        title: row.get("title"),
        author_id: row.get("author_id"),
        article_type,
        content: row.get("content"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

// ============================================================================
// MySQL implementations
// ============================================================================

async fn create_article_mysql(pool: &MySqlPool, article: &Article) -> Result<Article> {
    let now = Utc::now();

    let result = sqlx::query(
        r#"
        INSERT INTO articles (title, author_id, article_type, content, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&article.title)
    .bind(article.author_id)
    .bind(article.article_type.code())
    .bind(&article.content)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await
    .context("Failed to create article")?;

    let id = result.last_insert_id() as i64;

    Ok(Article {
        id,
        title: article.title.clone(),
        author_id: article.author_id,
        article_type: article.article_type,
        content: article.content.clone(),
        created_at: now,
        updated_at: now,
    })
}

async fn get_article_by_id_mysql(pool: &MySqlPool, id: i64) -> Result<Option<Article>> {
    let row = sqlx::query(
        r#"
        SELECT id, title, author_id, article_type, content, created_at, updated_at
        FROM articles
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
    .context("Failed to get article by ID")?;

    match row {
        Some(row) => Ok(Some(row_to_article_mysql(&row)?)),
        None => Ok(None),
    }
}

async fn list_articles_mysql(pool: &MySqlPool, params: &ListParams) -> Result<Vec<Article>> {
    let rows = sqlx::query(
        r#"
        SELECT id, title, author_id, article_type, content, created_at, updated_at
        FROM articles
        ORDER BY id
        LIMIT ? OFFSET ?
        "#,
    )
    .bind(params.limit)
    .bind(params.offset)
    .fetch_all(pool)
    .await
    .context("Failed to list articles")?;

    let mut articles = Vec::with_capacity(rows.len());
    for row in &rows {
        articles.push(row_to_article_mysql(row)?);
    }
    Ok(articles)
}

async fn count_articles_mysql(pool: &MySqlPool) -> Result<i64> {
    let row = sqlx::query("SELECT COUNT(*) as count FROM articles")
        .fetch_one(pool)
        .await
        .context("Failed to count articles")?;
    Ok(row.get("count"))
}

async fn list_by_author_mysql(pool: &MySqlPool, author_id: i64) -> Result<Vec<Article>> {
    let rows = sqlx::query(
        r#"
        SELECT id, title, author_id, article_type, content, created_at, updated_at
        FROM articles
        WHERE author_id = ?
        ORDER BY id
        "#,
    )
    .bind(author_id)
    .fetch_all(pool)
    .await
    .context("Failed to list articles by author")?;

    let mut articles = Vec::with_capacity(rows.len());
    for row in &rows {
        articles.push(row_to_article_mysql(row)?);
    }
    Ok(articles)
}

async fn update_article_mysql(pool: &MySqlPool, article: &Article) -> Result<Article> {
    let now = Utc::now();

    sqlx::query(
        r#"
        UPDATE articles
        SET title = ?, author_id = ?, article_type = ?, content = ?, updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(&article.title)
    .bind(article.author_id)
    .bind(article.article_type.code())
    .bind(&article.content)
    .bind(now)
    .bind(article.id)
    .execute(pool)
    .await
    .context("Failed to update article")?;

    get_article_by_id_mysql(pool, article.id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Article not found after update"))
}

async fn delete_article_mysql(pool: &MySqlPool, id: i64) -> Result<()> {
    sqlx::query("DELETE FROM articles WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await
        .context("Failed to delete article")?;

    Ok(())
}

async fn set_categories_mysql(
    pool: &MySqlPool,
    article_id: i64,
    category_ids: &[i64],
) -> Result<()> {
    let mut tx = pool.begin().await.context("Failed to start transaction")?;

    sqlx::query("DELETE FROM article_categories WHERE article_id = ?")
        .bind(article_id)
        .execute(&mut *tx)
        .await
        .context("Failed to clear article categories")?;

    for category_id in category_ids {
        sqlx::query("INSERT INTO article_categories (article_id, category_id) VALUES (?, ?)")
            .bind(article_id)
            .bind(category_id)
            .execute(&mut *tx)
            .await
            .context("Failed to attach category")?;
    }

    tx.commit().await.context("Failed to commit transaction")?;
    Ok(())
}

async fn category_ids_mysql(pool: &MySqlPool, article_id: i64) -> Result<Vec<i64>> {
    let rows = sqlx::query(
        "SELECT category_id FROM article_categories WHERE article_id = ? ORDER BY category_id",
    )
    .bind(article_id)
    .fetch_all(pool)
    .await
    .context("Failed to get article categories")?;

    Ok(rows.iter().map(|row| row.get("category_id")).collect())
}

fn row_to_article_mysql(row: &sqlx::mysql::MySqlRow) -> Result<Article> {
    let code: String = row.get("article_type");
    let article_type = ArticleType::from_code(&code)
        .ok_or_else(|| anyhow::anyhow!("Unknown article type code: {}", code))?;

    Ok(Article {
        id: row.get("id"),
        title: row.get("title"),
        author_id: row.get("author_id"),
        article_type,
        content: row.get("content"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}
