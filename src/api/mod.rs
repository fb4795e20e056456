//! API layer - HTTP handlers and routing
//!
//! This module contains all HTTP API endpoints for the Inkdex blog platform.
//! It includes:
//! - User API endpoints
//! - Category API endpoints
//! - Article API endpoints
//! - Search API endpoints (index-backed, paginated)

pub mod articles;
pub mod categories;
pub mod common;
pub mod middleware;
pub mod responses;
pub mod search;
pub mod users;

use axum::{
    http::{header, HeaderValue, Method},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub use middleware::{ApiError, AppState};

/// Build the main API router
pub fn build_api_router() -> Router<AppState> {
    Router::new()
        .nest("/users", users::router())
        .nest("/categories", categories::router())
        .nest("/articles", articles::router())
        .nest("/search", search::router())
}

/// Build the complete router with middleware
pub fn build_router(state: AppState, cors_origin: &str) -> Router {
    let cors = match cors_origin.parse::<HeaderValue>() {
        Ok(origin) => CorsLayer::new().allow_origin(origin),
        Err(_) => CorsLayer::new().allow_origin(tower_http::cors::Any),
    };
    let cors = cors
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .nest("/api/v1", build_api_router())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
pub(crate) mod test_util {
    use super::AppState;
    use crate::config::PaginationConfig;
    use crate::db::repositories::{
        SqlxArticleRepository, SqlxCategoryRepository, SqlxUserRepository,
    };
    use crate::db::{create_test_pool, migrations};
    use crate::search::{DynSearchBackend, MemoryBackend};
    use crate::services::{ArticleService, CategoryService, UserService};
    use axum_test::TestServer;
    use std::sync::Arc;

    /// Application state over an in-memory database and the given backend
    pub(crate) async fn test_state(search: DynSearchBackend) -> AppState {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");

        let user_repo = SqlxUserRepository::boxed(pool.clone());
        let category_repo = SqlxCategoryRepository::boxed(pool.clone());
        let article_repo = SqlxArticleRepository::boxed(pool);

        AppState {
            user_service: Arc::new(UserService::new(
                user_repo.clone(),
                article_repo.clone(),
                search.clone(),
            )),
            category_service: Arc::new(CategoryService::new(
                category_repo.clone(),
                search.clone(),
            )),
            article_service: Arc::new(ArticleService::new(
                article_repo,
                user_repo,
                category_repo,
                search.clone(),
            )),
            search,
            pagination: Arc::new(PaginationConfig::default()),
        }
    }

    /// Test server over the in-process search backend
    pub(crate) async fn test_server() -> TestServer {
        test_server_with_backend(Arc::new(MemoryBackend::new())).await
    }

    /// Test server over an arbitrary search backend
    pub(crate) async fn test_server_with_backend(search: DynSearchBackend) -> TestServer {
        let state = test_state(search).await;
        let app = super::build_router(state, "http://localhost:3000");
        TestServer::try_new(app).expect("Failed to start test server")
    }

    /// Create an author through the API, returning its id
    pub(crate) async fn create_author(server: &TestServer, username: &str) -> i64 {
        let response = server
            .post("/api/v1/users")
            .json(&serde_json::json!({
                "username": username,
                "first_name": "Test",
                "last_name": "Author",
                "email": format!("{}@example.com", username),
            }))
            .await;
        response.assert_status(axum::http::StatusCode::CREATED);
        let body: serde_json::Value = response.json();
        body["id"].as_i64().expect("created user should have an id")
    }
}
