//! User model
//!
//! This module defines the User entity and related input types.
//! Users are the authors referenced by articles; deleting a user
//! cascades to their articles.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User entity representing an article author.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier
    pub id: i64,
    /// Username (unique)
    pub username: String,
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// Email address (unique)
    pub email: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new User with the given parameters.
    ///
    /// The ID will be set to 0 and should be assigned by the database.
    pub fn new(username: String, first_name: String, last_name: String, email: String) -> Self {
        let now = Utc::now();
        Self {
            id: 0, // Will be set by the database
            username,
            first_name,
            last_name,
            email,
            created_at: now,
            updated_at: now,
        }
    }

    /// Full display name, falling back to the username when names are empty
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name, self.last_name);
        let full = full.trim();
        if full.is_empty() {
            self.username.clone()
        } else {
            full.to_string()
        }
    }
}

/// Input for creating a new user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserInput {
    /// Username (unique)
    pub username: String,
    /// Given name
    #[serde(default)]
    pub first_name: String,
    /// Family name
    #[serde(default)]
    pub last_name: String,
    /// Email address (unique)
    pub email: String,
}

/// Input for updating an existing user
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateUserInput {
    /// New username (optional)
    pub username: Option<String>,
    /// New given name (optional)
    pub first_name: Option<String>,
    /// New family name (optional)
    pub last_name: Option<String>,
    /// New email address (optional)
    pub email: Option<String>,
}

impl UpdateUserInput {
    /// Check if any field is set
    pub fn has_changes(&self) -> bool {
        self.username.is_some()
            || self.first_name.is_some()
            || self.last_name.is_some()
            || self.email.is_some()
    }
}
