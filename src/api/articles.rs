//! Article API endpoints
//!
//! Handles HTTP requests for article management:
//! - GET /api/v1/articles - List articles with pagination
//! - POST /api/v1/articles - Create new article
//! - GET /api/v1/articles/:id - Get article by ID
//! - PUT /api/v1/articles/:id - Update article
//! - DELETE /api/v1/articles/:id - Delete article
//!
//! The article type travels over the wire as its two-letter code; unknown
//! codes are rejected before they reach the service layer.

use axum::{
    extract::{OriginalUri, Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::api::common::{page_links, PageQuery};
use crate::api::middleware::{ApiError, AppState};
use crate::api::responses::{ArticleResponse, PaginatedResponse};
use crate::models::{ArticleType, CreateArticleInput, ListParams, UpdateArticleInput};
use crate::services::ArticleServiceError;

/// Request body for creating an article
#[derive(Debug, Deserialize)]
pub struct CreateArticleRequest {
    pub title: String,
    pub author_id: i64,
    /// Two-letter type code; defaults to "UN"
    pub article_type: Option<String>,
    #[serde(default)]
    pub category_ids: Vec<i64>,
    pub content: String,
}

/// Request body for updating an article
#[derive(Debug, Default, Deserialize)]
pub struct UpdateArticleRequest {
    pub title: Option<String>,
    /// Two-letter type code
    pub article_type: Option<String>,
    pub category_ids: Option<Vec<i64>>,
    pub content: Option<String>,
}

/// Build the articles router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_articles_handler).post(create_article_handler))
        .route(
            "/{id}",
            get(get_article_handler)
                .put(update_article_handler)
                .delete(delete_article_handler),
        )
}

fn map_err(e: ArticleServiceError) -> ApiError {
    match e {
        ArticleServiceError::NotFound(_) => ApiError::not_found(e.to_string()),
        ArticleServiceError::AuthorNotFound(_)
        | ArticleServiceError::CategoryNotFound(_)
        | ArticleServiceError::ValidationError(_) => ApiError::validation_error(e.to_string()),
        ArticleServiceError::InternalError(_) => ApiError::internal_error(e.to_string()),
    }
}

fn parse_type_code(code: &str) -> Result<ArticleType, ApiError> {
    ArticleType::from_code(code)
        .ok_or_else(|| ApiError::validation_error(format!("Unknown article type code: {}", code)))
}

/// GET /api/v1/articles - List articles with pagination
async fn list_articles_handler(
    State(state): State<AppState>,
    Query(page): Query<PageQuery>,
    OriginalUri(uri): OriginalUri,
) -> Result<Json<PaginatedResponse<ArticleResponse>>, ApiError> {
    let (limit, offset) = state.pagination.resolve(page.limit, page.offset);
    let result = state
        .article_service
        .list_articles(&ListParams::new(limit, offset))
        .await
        .map_err(map_err)?;

    let links = page_links(uri.path(), limit, offset, result.total);
    let results = result.items.into_iter().map(Into::into).collect();
    Ok(Json(PaginatedResponse::new(result.total, links, results)))
}

/// POST /api/v1/articles - Create new article
async fn create_article_handler(
    State(state): State<AppState>,
    Json(request): Json<CreateArticleRequest>,
) -> Result<(StatusCode, Json<ArticleResponse>), ApiError> {
    let article_type = match request.article_type.as_deref() {
        Some(code) => parse_type_code(code)?,
        None => ArticleType::default(),
    };

    let record = state
        .article_service
        .create_article(CreateArticleInput {
            title: request.title,
            author_id: request.author_id,
            article_type,
            category_ids: request.category_ids,
            content: request.content,
        })
        .await
        .map_err(map_err)?;

    Ok((StatusCode::CREATED, Json(record.into())))
}

/// GET /api/v1/articles/:id - Get article by ID
async fn get_article_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ArticleResponse>, ApiError> {
    let record = state
        .article_service
        .get_article(id)
        .await
        .map_err(map_err)?;
    Ok(Json(record.into()))
}

/// PUT /api/v1/articles/:id - Update article
async fn update_article_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateArticleRequest>,
) -> Result<Json<ArticleResponse>, ApiError> {
    let article_type = match request.article_type.as_deref() {
        Some(code) => Some(parse_type_code(code)?),
        None => None,
    };

    let record = state
        .article_service
        .update_article(
            id,
            UpdateArticleInput {
                title: request.title,
                article_type,
                category_ids: request.category_ids,
                content: request.content,
            },
        )
        .await
        .map_err(map_err)?;
    Ok(Json(record.into()))
}

/// DELETE /api/v1/articles/:id - Delete article
async fn delete_article_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state
        .article_service
        .delete_article(id)
        .await
        .map_err(map_err)?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use crate::api::test_util::{create_author, test_server};
    use serde_json::{json, Value};

    #[tokio::test]
    async fn test_article_crud_roundtrip() {
        let server = test_server().await;
        let author_id = create_author(&server, "writer").await;

        let response = server
            .post("/api/v1/articles")
            .json(&json!({
                "title": "Hello Inkdex",
                "author_id": author_id,
                "article_type": "TU",
                "content": "First post",
            }))
            .await;
        response.assert_status(axum::http::StatusCode::CREATED);
        let created: Value = response.json();
        let id = created["id"].as_i64().unwrap();
        assert_eq!(created["article_type"], "TU");
        assert_eq!(created["article_type_label"], "Tutorial");
        assert_eq!(created["categories"], json!([]));

        let response = server
            .put(&format!("/api/v1/articles/{}", id))
            .json(&json!({ "article_type": "RS" }))
            .await;
        response.assert_status_ok();
        let updated: Value = response.json();
        assert_eq!(updated["article_type_label"], "Research");
        assert_eq!(updated["title"], "Hello Inkdex");

        let response = server.delete(&format!("/api/v1/articles/{}", id)).await;
        response.assert_status(axum::http::StatusCode::NO_CONTENT);

        let response = server.get(&format!("/api/v1/articles/{}", id)).await;
        response.assert_status_not_found();
    }

    #[tokio::test]
    async fn test_create_article_defaults_to_unspecified_type() {
        let server = test_server().await;
        let author_id = create_author(&server, "defaults").await;

        let response = server
            .post("/api/v1/articles")
            .json(&json!({
                "title": "No type given",
                "author_id": author_id,
                "content": "Body",
            }))
            .await;
        response.assert_status(axum::http::StatusCode::CREATED);
        let created: Value = response.json();
        assert_eq!(created["article_type"], "UN");
        assert_eq!(created["article_type_label"], "Unspecified");
    }

    #[tokio::test]
    async fn test_create_article_rejects_unknown_type_code() {
        let server = test_server().await;
        let author_id = create_author(&server, "typo").await;

        let response = server
            .post("/api/v1/articles")
            .json(&json!({
                "title": "Bad type",
                "author_id": author_id,
                "article_type": "XX",
                "content": "Body",
            }))
            .await;
        response.assert_status_bad_request();
        let error: Value = response.json();
        assert_eq!(error["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_create_article_rejects_unknown_author() {
        let server = test_server().await;

        let response = server
            .post("/api/v1/articles")
            .json(&json!({
                "title": "Ghost written",
                "author_id": 4040,
                "content": "Body",
            }))
            .await;
        response.assert_status_bad_request();
    }

    #[tokio::test]
    async fn test_article_category_set_update() {
        let server = test_server().await;
        let author_id = create_author(&server, "curator").await;

        let category: Value = server
            .post("/api/v1/categories")
            .json(&json!({ "name": "Archive" }))
            .await
            .json();
        let category_id = category["id"].as_i64().unwrap();

        let created: Value = server
            .post("/api/v1/articles")
            .json(&json!({
                "title": "Curated",
                "author_id": author_id,
                "category_ids": [category_id],
                "content": "Body",
            }))
            .await
            .json();
        assert_eq!(created["categories"], json!([category_id]));

        let id = created["id"].as_i64().unwrap();
        let updated: Value = server
            .put(&format!("/api/v1/articles/{}", id))
            .json(&json!({ "category_ids": [] }))
            .await
            .json();
        assert_eq!(updated["categories"], json!([]));
    }
}
