//! Shared API response types
//!
//! This module contains common response structures used across multiple API
//! endpoints to ensure consistency and reduce code duplication. Every list
//! and search endpoint replies with the same paginated envelope.

use serde::Serialize;

use crate::models::{Category, User};
use crate::services::ArticleRecord;

// ============================================================================
// Pagination envelope
// ============================================================================

/// Paginated response envelope shared by list and search endpoints
#[derive(Debug, Serialize)]
pub struct PaginatedResponse<T> {
    /// Total number of matching items across all pages
    pub count: i64,
    /// Relative URL of the next page, if any
    pub next: Option<String>,
    /// Relative URL of the previous page, if any
    pub previous: Option<String>,
    /// Items in the current page
    pub results: Vec<T>,
}

impl<T> PaginatedResponse<T> {
    /// Create a response from a page of results and its navigation markers
    pub fn new(count: i64, links: (Option<String>, Option<String>), results: Vec<T>) -> Self {
        let (next, previous) = links;
        Self {
            count,
            next,
            previous,
            results,
        }
    }
}

// ============================================================================
// Entity responses
// ============================================================================

/// Full user response
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            created_at: user.created_at.to_rfc3339(),
            updated_at: user.updated_at.to_rfc3339(),
        }
    }
}

/// Full category response
#[derive(Debug, Serialize)]
pub struct CategoryResponse {
    pub id: i64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: String,
}

impl From<Category> for CategoryResponse {
    fn from(category: Category) -> Self {
        Self {
            id: category.id,
            name: category.name,
            description: category.description,
            created_at: category.created_at.to_rfc3339(),
        }
    }
}

/// Full article response with category IDs and the type label
#[derive(Debug, Serialize)]
pub struct ArticleResponse {
    pub id: i64,
    pub title: String,
    pub author_id: i64,
    pub article_type: String,
    pub article_type_label: String,
    pub categories: Vec<i64>,
    pub content: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<ArticleRecord> for ArticleResponse {
    fn from(record: ArticleRecord) -> Self {
        let article = record.article;
        Self {
            id: article.id,
            title: article.title,
            author_id: article.author_id,
            article_type: article.article_type.code().to_string(),
            article_type_label: article.article_type.label().to_string(),
            categories: record.category_ids,
            content: article.content,
            created_at: article.created_at.to_rfc3339(),
            updated_at: article.updated_at.to_rfc3339(),
        }
    }
}
