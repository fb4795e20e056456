//! Index documents
//!
//! Denormalized, search-optimized representations of the domain entities,
//! distinct from their relational rows. Each document type carries the name
//! and field mapping of its backing index; services rebuild and re-index
//! documents on every mutation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::models::{Article, Category, User};

/// Name of the users index
pub const USERS_INDEX: &str = "users";
/// Name of the categories index
pub const CATEGORIES_INDEX: &str = "categories";
/// Name of the articles index
pub const ARTICLES_INDEX: &str = "articles";

/// All indices with their creation bodies, in bootstrap order
pub fn index_definitions() -> Vec<(&'static str, Value)> {
    vec![
        (USERS_INDEX, UserDocument::mapping()),
        (CATEGORIES_INDEX, CategoryDocument::mapping()),
        (ARTICLES_INDEX, ArticleDocument::mapping()),
    ]
}

/// Search document for a user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserDocument {
    pub id: i64,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl From<&User> for UserDocument {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
        }
    }
}

impl UserDocument {
    /// Index creation body with field mappings
    pub fn mapping() -> Value {
        json!({
            "mappings": {
                "properties": {
                    "id": { "type": "long" },
                    "username": { "type": "text" },
                    "first_name": { "type": "text" },
                    "last_name": { "type": "text" },
                    "email": { "type": "keyword" },
                }
            }
        })
    }
}

/// Search document for a category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryDocument {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
}

impl From<&Category> for CategoryDocument {
    fn from(category: &Category) -> Self {
        Self {
            id: category.id,
            name: category.name.clone(),
            description: category.description.clone(),
        }
    }
}

impl CategoryDocument {
    /// Index creation body with field mappings
    pub fn mapping() -> Value {
        json!({
            "mappings": {
                "properties": {
                    "id": { "type": "long" },
                    "name": { "type": "text" },
                    "description": { "type": "text" },
                }
            }
        })
    }
}

/// Search document for an article
///
/// The author is denormalized to their username and the article type to its
/// label, matching what the search endpoints query against.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleDocument {
    pub id: i64,
    pub title: String,
    pub author: String,
    #[serde(rename = "type")]
    pub article_type: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl ArticleDocument {
    /// Build the document for an article and its author
    pub fn new(article: &Article, author: &User) -> Self {
        Self {
            id: article.id,
            title: article.title.clone(),
            author: author.username.clone(),
            article_type: article.article_type.label().to_string(),
            content: article.content.clone(),
            created_at: article.created_at,
        }
    }

    /// Index creation body with field mappings
    pub fn mapping() -> Value {
        json!({
            "mappings": {
                "properties": {
                    "id": { "type": "long" },
                    "title": { "type": "text" },
                    "author": { "type": "text" },
                    "type": { "type": "text" },
                    "content": { "type": "text" },
                    "created_at": { "type": "date" },
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ArticleType;

    #[test]
    fn test_article_document_denormalizes_author_and_type() {
        let author = User::new(
            "jdoe".to_string(),
            "Jane".to_string(),
            "Doe".to_string(),
            "jane@example.com".to_string(),
        );
        let mut article = Article::new(
            "Fuzzy search in practice".to_string(),
            7,
            ArticleType::Tutorial,
            "Lorem ipsum".to_string(),
        );
        article.id = 42;

        let doc = ArticleDocument::new(&article, &author);
        assert_eq!(doc.id, 42);
        assert_eq!(doc.author, "jdoe");
        assert_eq!(doc.article_type, "Tutorial");

        // The type field serializes under the name searched by the endpoints
        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(value["type"], "Tutorial");
        assert!(value.get("article_type").is_none());
    }

    #[test]
    fn test_index_definitions_cover_all_indices() {
        let defs = index_definitions();
        let names: Vec<&str> = defs.iter().map(|(name, _)| *name).collect();
        assert_eq!(names, vec!["users", "categories", "articles"]);

        for (_, body) in defs {
            assert!(body["mappings"]["properties"].is_object());
        }
    }
}
