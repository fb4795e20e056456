//! Category model
//!
//! This module defines the Category entity and related input types.
//! Categories are a flat taxonomy attached to articles through a
//! many-to-many relation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Category entity for organizing articles.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Category {
    /// Unique identifier
    pub id: i64,
    /// Category name
    pub name: String,
    /// Category description
    pub description: Option<String>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Category {
    /// Create a new Category with the given parameters.
    ///
    /// The ID will be set to 0 and should be assigned by the database.
    pub fn new(name: String, description: Option<String>) -> Self {
        Self {
            id: 0, // Will be set by the database
            name,
            description,
            created_at: Utc::now(),
        }
    }
}

/// Input for creating a new category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCategoryInput {
    /// Category name
    pub name: String,
    /// Category description (optional)
    #[serde(default)]
    pub description: Option<String>,
}

/// Input for updating an existing category
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateCategoryInput {
    /// New name (optional)
    pub name: Option<String>,
    /// New description (optional)
    pub description: Option<String>,
}

impl UpdateCategoryInput {
    /// Check if any field is set
    pub fn has_changes(&self) -> bool {
        self.name.is_some() || self.description.is_some()
    }
}
