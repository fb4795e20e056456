//! Article model
//!
//! This module provides:
//! - `Article` entity representing a blog article
//! - `ArticleType` enum for the fixed article classification
//! - Input types for creating and updating articles
//! - Pagination types for list and search queries

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Article entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    /// Unique identifier
    pub id: i64,
    /// Article title
    pub title: String,
    /// Author user ID
    pub author_id: i64,
    /// Article classification
    pub article_type: ArticleType,
    /// Article body
    pub content: String,
    /// Creation timestamp (set once)
    pub created_at: DateTime<Utc>,
    /// Last update timestamp (refreshed on every mutation)
    pub updated_at: DateTime<Utc>,
}

impl Article {
    /// Create a new article with the given parameters
    pub fn new(title: String, author_id: i64, article_type: ArticleType, content: String) -> Self {
        let now = Utc::now();
        Self {
            id: 0, // Will be set by database
            title,
            author_id,
            article_type,
            content,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Article classification
///
/// Stored in the database as a two-letter code; `label()` yields the
/// human-readable name. Unknown codes fail at the parse boundary
/// (`from_code` returns `None`), keeping the enum itself closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ArticleType {
    /// No particular classification (default)
    #[default]
    #[serde(rename = "UN")]
    Unspecified,
    /// Step-by-step instructional content
    #[serde(rename = "TU")]
    Tutorial,
    /// Original research
    #[serde(rename = "RS")]
    Research,
    /// Product or paper review
    #[serde(rename = "RW")]
    Review,
}

impl ArticleType {
    /// Convert to the two-letter database code
    pub fn code(&self) -> &'static str {
        match self {
            ArticleType::Unspecified => "UN",
            ArticleType::Tutorial => "TU",
            ArticleType::Research => "RS",
            ArticleType::Review => "RW",
        }
    }

    /// Parse from a two-letter database code
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "UN" => Some(ArticleType::Unspecified),
            "TU" => Some(ArticleType::Tutorial),
            "RS" => Some(ArticleType::Research),
            "RW" => Some(ArticleType::Review),
            _ => None,
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            ArticleType::Unspecified => "Unspecified",
            ArticleType::Tutorial => "Tutorial",
            ArticleType::Research => "Research",
            ArticleType::Review => "Review",
        }
    }
}

impl std::fmt::Display for ArticleType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Input for creating a new article
#[derive(Debug, Clone)]
pub struct CreateArticleInput {
    /// Article title
    pub title: String,
    /// Author user ID
    pub author_id: i64,
    /// Article classification
    pub article_type: ArticleType,
    /// IDs of categories to attach (may be empty)
    pub category_ids: Vec<i64>,
    /// Article body
    pub content: String,
}

/// Input for updating an existing article
#[derive(Debug, Clone, Default)]
pub struct UpdateArticleInput {
    /// New title (optional)
    pub title: Option<String>,
    /// New classification (optional)
    pub article_type: Option<ArticleType>,
    /// Replacement category set (optional; empty vec clears)
    pub category_ids: Option<Vec<i64>>,
    /// New body (optional)
    pub content: Option<String>,
}

impl UpdateArticleInput {
    /// Check if any field is set
    pub fn has_changes(&self) -> bool {
        self.title.is_some()
            || self.article_type.is_some()
            || self.category_ids.is_some()
            || self.content.is_some()
    }
}

/// Limit/offset pagination parameters for list queries
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ListParams {
    /// Maximum number of items to return
    pub limit: i64,
    /// Number of items to skip
    pub offset: i64,
}

impl Default for ListParams {
    fn default() -> Self {
        Self {
            limit: 10,
            offset: 0,
        }
    }
}

impl ListParams {
    /// Create new pagination parameters, clamping out-of-range values
    pub fn new(limit: i64, offset: i64) -> Self {
        Self {
            limit: limit.max(1),
            offset: offset.max(0),
        }
    }
}

/// Paginated result container
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PagedResult<T> {
    /// Items in the current page
    pub items: Vec<T>,
    /// Total number of items across all pages
    pub total: i64,
    /// Limit the page was fetched with
    pub limit: i64,
    /// Offset the page was fetched with
    pub offset: i64,
}

impl<T> PagedResult<T> {
    /// Create a new paginated result
    pub fn new(items: Vec<T>, total: i64, params: &ListParams) -> Self {
        Self {
            items,
            total,
            limit: params.limit,
            offset: params.offset,
        }
    }

    /// Check if there are items after this page
    pub fn has_next(&self) -> bool {
        self.offset + self.limit < self.total
    }

    /// Check if there are items before this page
    pub fn has_prev(&self) -> bool {
        self.offset > 0
    }

    /// Check if the result is empty
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Get the number of items in the current page
    pub fn len(&self) -> usize {
        self.items.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_codes_map_to_exact_labels() {
        let cases = [
            ("UN", "Unspecified"),
            ("TU", "Tutorial"),
            ("RS", "Research"),
            ("RW", "Review"),
        ];
        for (code, label) in cases {
            let article_type = ArticleType::from_code(code).expect("known code");
            assert_eq!(article_type.label(), label);
            assert_eq!(article_type.code(), code);
        }
    }

    #[test]
    fn test_unrecognized_code_yields_no_label() {
        assert!(ArticleType::from_code("XX").is_none());
        assert!(ArticleType::from_code("").is_none());
        assert!(ArticleType::from_code("un").is_none());
    }

    #[test]
    fn test_default_type_is_unspecified() {
        assert_eq!(ArticleType::default(), ArticleType::Unspecified);
    }

    #[test]
    fn test_type_serializes_as_code() {
        let json = serde_json::to_string(&ArticleType::Tutorial).unwrap();
        assert_eq!(json, "\"TU\"");

        let parsed: ArticleType = serde_json::from_str("\"RW\"").unwrap();
        assert_eq!(parsed, ArticleType::Review);
    }

    #[test]
    fn test_list_params_clamp() {
        let params = ListParams::new(0, -5);
        assert_eq!(params.limit, 1);
        assert_eq!(params.offset, 0);
    }

    #[test]
    fn test_paged_result_navigation() {
        let params = ListParams::new(2, 0);
        let page = PagedResult::new(vec![1, 2], 5, &params);
        assert!(page.has_next());
        assert!(!page.has_prev());

        let params = ListParams::new(2, 4);
        let page = PagedResult::new(vec![5], 5, &params);
        assert!(!page.has_next());
        assert!(page.has_prev());
    }
}
