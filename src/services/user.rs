//! User service
//!
//! Implements business logic for user management:
//! - Create, read, update, delete users
//! - Username and email uniqueness validation
//! - Search index synchronization, including re-indexing the author's
//!   articles when a username changes and dropping article documents when
//!   a deleted author's articles cascade away

use crate::db::repositories::{ArticleRepository, UserRepository};
use crate::models::{CreateUserInput, ListParams, PagedResult, UpdateUserInput, User};
use crate::search::{ArticleDocument, DynSearchBackend, UserDocument, ARTICLES_INDEX, USERS_INDEX};
use std::sync::Arc;

/// Error types for user service operations
#[derive(Debug, thiserror::Error)]
pub enum UserServiceError {
    /// User not found
    #[error("User not found: {0}")]
    NotFound(i64),

    /// Username already exists
    #[error("Username already exists: {0}")]
    DuplicateUsername(String),

    /// Email already registered
    #[error("Email already registered: {0}")]
    DuplicateEmail(String),

    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// User service for managing authors
pub struct UserService {
    repo: Arc<dyn UserRepository>,
    article_repo: Arc<dyn ArticleRepository>,
    search: DynSearchBackend,
}

impl UserService {
    /// Create a new user service
    pub fn new(
        repo: Arc<dyn UserRepository>,
        article_repo: Arc<dyn ArticleRepository>,
        search: DynSearchBackend,
    ) -> Self {
        Self {
            repo,
            article_repo,
            search,
        }
    }

    /// Create a new user
    pub async fn create_user(&self, input: CreateUserInput) -> Result<User, UserServiceError> {
        let username = input.username.trim().to_string();
        if username.is_empty() {
            return Err(UserServiceError::ValidationError(
                "Username must not be empty".to_string(),
            ));
        }
        if !input.email.contains('@') {
            return Err(UserServiceError::ValidationError(format!(
                "Invalid email address: {}",
                input.email
            )));
        }

        if self.repo.exists_by_username(&username).await? {
            return Err(UserServiceError::DuplicateUsername(username));
        }
        if self.repo.exists_by_email(&input.email).await? {
            return Err(UserServiceError::DuplicateEmail(input.email));
        }

        let user = self
            .repo
            .create(&User::new(
                username,
                input.first_name,
                input.last_name,
                input.email,
            ))
            .await?;

        self.sync_document(&user).await;
        Ok(user)
    }

    /// Get a user by ID
    pub async fn get_user(&self, id: i64) -> Result<User, UserServiceError> {
        self.repo
            .get_by_id(id)
            .await?
            .ok_or(UserServiceError::NotFound(id))
    }

    /// List users with pagination
    pub async fn list_users(
        &self,
        params: &ListParams,
    ) -> Result<PagedResult<User>, UserServiceError> {
        let items = self.repo.list(params).await?;
        let total = self.repo.count().await?;
        Ok(PagedResult::new(items, total, params))
    }

    /// Update a user
    pub async fn update_user(
        &self,
        id: i64,
        input: UpdateUserInput,
    ) -> Result<User, UserServiceError> {
        let mut user = self.get_user(id).await?;
        if !input.has_changes() {
            return Ok(user);
        }

        let mut username_changed = false;
        if let Some(username) = input.username {
            let username = username.trim().to_string();
            if username.is_empty() {
                return Err(UserServiceError::ValidationError(
                    "Username must not be empty".to_string(),
                ));
            }
            if username != user.username {
                if self.repo.exists_by_username(&username).await? {
                    return Err(UserServiceError::DuplicateUsername(username));
                }
                user.username = username;
                username_changed = true;
            }
        }
        if let Some(email) = input.email {
            if email != user.email {
                if !email.contains('@') {
                    return Err(UserServiceError::ValidationError(format!(
                        "Invalid email address: {}",
                        email
                    )));
                }
                if self.repo.exists_by_email(&email).await? {
                    return Err(UserServiceError::DuplicateEmail(email));
                }
                user.email = email;
            }
        }
        if let Some(first_name) = input.first_name {
            user.first_name = first_name;
        }
        if let Some(last_name) = input.last_name {
            user.last_name = last_name;
        }

        let updated = self.repo.update(&user).await?;

        self.sync_document(&updated).await;
        if username_changed {
            // Article documents denormalize the author's username
            self.reindex_articles(&updated).await;
        }

        Ok(updated)
    }

    /// Delete a user; their articles cascade in the relational store and
    /// the corresponding documents are dropped from the index.
    pub async fn delete_user(&self, id: i64) -> Result<(), UserServiceError> {
        let _user = self.get_user(id).await?;

        // Capture article IDs before the cascade removes the rows
        let articles = self.article_repo.list_by_author(id).await?;

        self.repo.delete(id).await?;

        if let Err(e) = self.search.delete_document(USERS_INDEX, id).await {
            tracing::warn!("Failed to remove user {} from index: {}", id, e);
        }
        for article in articles {
            if let Err(e) = self.search.delete_document(ARTICLES_INDEX, article.id).await {
                tracing::warn!("Failed to remove article {} from index: {}", article.id, e);
            }
        }

        Ok(())
    }

    /// Write the user's document to the index, logging on failure.
    async fn sync_document(&self, user: &User) {
        let doc = match serde_json::to_value(UserDocument::from(user)) {
            Ok(doc) => doc,
            Err(e) => {
                tracing::warn!("Failed to serialize user document {}: {}", user.id, e);
                return;
            }
        };
        if let Err(e) = self.search.index_document(USERS_INDEX, user.id, &doc).await {
            tracing::warn!("Failed to index user {}: {}", user.id, e);
        }
    }

    /// Rebuild the author's article documents after a username change.
    async fn reindex_articles(&self, author: &User) {
        let articles = match self.article_repo.list_by_author(author.id).await {
            Ok(articles) => articles,
            Err(e) => {
                tracing::warn!("Failed to load articles for re-indexing: {}", e);
                return;
            }
        };

        for article in articles {
            let doc = match serde_json::to_value(ArticleDocument::new(&article, author)) {
                Ok(doc) => doc,
                Err(e) => {
                    tracing::warn!("Failed to serialize article document {}: {}", article.id, e);
                    continue;
                }
            };
            if let Err(e) = self
                .search
                .index_document(ARTICLES_INDEX, article.id, &doc)
                .await
            {
                tracing::warn!("Failed to re-index article {}: {}", article.id, e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::{SqlxArticleRepository, SqlxUserRepository};
    use crate::db::{create_test_pool, migrations};
    use crate::search::{MemoryBackend, QueryExpression, SearchBackend};

    async fn setup() -> (UserService, DynSearchBackend) {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");

        let search: DynSearchBackend = Arc::new(MemoryBackend::new());
        let service = UserService::new(
            SqlxUserRepository::boxed(pool.clone()),
            SqlxArticleRepository::boxed(pool),
            search.clone(),
        );
        (service, search)
    }

    fn input(username: &str) -> CreateUserInput {
        CreateUserInput {
            username: username.to_string(),
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
            email: format!("{}@example.com", username),
        }
    }

    #[tokio::test]
    async fn test_create_user_indexes_document() {
        let (service, search) = setup().await;

        let user = service.create_user(input("jdoe")).await.expect("create");
        assert!(user.id > 0);

        let expr = QueryExpression::bool_should(
            "jdoe",
            vec!["username", "first_name", "last_name"],
            1,
        );
        let page = search.search(USERS_INDEX, &expr, 10, 0).await.unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.hits[0]["username"], "jdoe");
    }

    #[tokio::test]
    async fn test_create_user_rejects_duplicates() {
        let (service, _search) = setup().await;
        service.create_user(input("dup")).await.expect("create");

        let result = service.create_user(input("dup")).await;
        assert!(matches!(result, Err(UserServiceError::DuplicateUsername(_))));

        let mut other = input("dup2");
        other.email = "dup@example.com".to_string();
        let result = service.create_user(other).await;
        assert!(matches!(result, Err(UserServiceError::DuplicateEmail(_))));
    }

    #[tokio::test]
    async fn test_create_user_validates_input() {
        let (service, _search) = setup().await;

        let mut blank = input("blank");
        blank.username = "   ".to_string();
        assert!(matches!(
            service.create_user(blank).await,
            Err(UserServiceError::ValidationError(_))
        ));

        let mut bad_email = input("bademail");
        bad_email.email = "not-an-email".to_string();
        assert!(matches!(
            service.create_user(bad_email).await,
            Err(UserServiceError::ValidationError(_))
        ));
    }

    #[tokio::test]
    async fn test_get_user_not_found() {
        let (service, _search) = setup().await;
        assert!(matches!(
            service.get_user(404).await,
            Err(UserServiceError::NotFound(404))
        ));
    }

    #[tokio::test]
    async fn test_update_user_reindexes_document() {
        let (service, search) = setup().await;
        let user = service.create_user(input("old")).await.expect("create");

        let updated = service
            .update_user(
                user.id,
                UpdateUserInput {
                    username: Some("renamed".to_string()),
                    ..Default::default()
                },
            )
            .await
            .expect("update");
        assert_eq!(updated.username, "renamed");

        let expr = QueryExpression::bool_should(
            "renamed",
            vec!["username", "first_name", "last_name"],
            1,
        );
        let page = search.search(USERS_INDEX, &expr, 10, 0).await.unwrap();
        assert_eq!(page.total, 1);

        let stale = QueryExpression::bool_should("old", vec!["username"], 1);
        let page = search.search(USERS_INDEX, &stale, 10, 0).await.unwrap();
        assert_eq!(page.total, 0, "stale username should no longer hit");
    }

    #[tokio::test]
    async fn test_delete_user_removes_document() {
        let (service, search) = setup().await;
        let user = service.create_user(input("gone")).await.expect("create");

        service.delete_user(user.id).await.expect("delete");

        let expr = QueryExpression::bool_should("gone", vec!["username"], 1);
        let page = search.search(USERS_INDEX, &expr, 10, 0).await.unwrap();
        assert_eq!(page.total, 0);

        assert!(matches!(
            service.get_user(user.id).await,
            Err(UserServiceError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_list_users_pagination() {
        let (service, _search) = setup().await;
        for name in ["a", "b", "c"] {
            service.create_user(input(name)).await.expect("create");
        }

        let page = service
            .list_users(&ListParams::new(2, 0))
            .await
            .expect("list");
        assert_eq!(page.total, 3);
        assert_eq!(page.len(), 2);
        assert!(page.has_next());
    }
}
