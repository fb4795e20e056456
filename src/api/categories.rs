//! Category API endpoints
//!
//! Handles HTTP requests for category management:
//! - GET /api/v1/categories - List categories with pagination
//! - POST /api/v1/categories - Create new category
//! - GET /api/v1/categories/:id - Get category by ID
//! - PUT /api/v1/categories/:id - Update category
//! - DELETE /api/v1/categories/:id - Delete category

use axum::{
    extract::{OriginalUri, Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};

use crate::api::common::{page_links, PageQuery};
use crate::api::middleware::{ApiError, AppState};
use crate::api::responses::{CategoryResponse, PaginatedResponse};
use crate::models::{CreateCategoryInput, ListParams, UpdateCategoryInput};
use crate::services::CategoryServiceError;

/// Build the categories router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_categories_handler).post(create_category_handler))
        .route(
            "/{id}",
            get(get_category_handler)
                .put(update_category_handler)
                .delete(delete_category_handler),
        )
}

fn map_err(e: CategoryServiceError) -> ApiError {
    match e {
        CategoryServiceError::NotFound(_) => ApiError::not_found(e.to_string()),
        CategoryServiceError::ValidationError(_) => ApiError::validation_error(e.to_string()),
        CategoryServiceError::InternalError(_) => ApiError::internal_error(e.to_string()),
    }
}

/// GET /api/v1/categories - List categories with pagination
async fn list_categories_handler(
    State(state): State<AppState>,
    Query(page): Query<PageQuery>,
    OriginalUri(uri): OriginalUri,
) -> Result<Json<PaginatedResponse<CategoryResponse>>, ApiError> {
    let (limit, offset) = state.pagination.resolve(page.limit, page.offset);
    let result = state
        .category_service
        .list_categories(&ListParams::new(limit, offset))
        .await
        .map_err(map_err)?;

    let links = page_links(uri.path(), limit, offset, result.total);
    let results = result.items.into_iter().map(Into::into).collect();
    Ok(Json(PaginatedResponse::new(result.total, links, results)))
}

/// POST /api/v1/categories - Create new category
async fn create_category_handler(
    State(state): State<AppState>,
    Json(input): Json<CreateCategoryInput>,
) -> Result<(StatusCode, Json<CategoryResponse>), ApiError> {
    let category = state
        .category_service
        .create_category(input)
        .await
        .map_err(map_err)?;
    Ok((StatusCode::CREATED, Json(category.into())))
}

/// GET /api/v1/categories/:id - Get category by ID
async fn get_category_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<CategoryResponse>, ApiError> {
    let category = state
        .category_service
        .get_category(id)
        .await
        .map_err(map_err)?;
    Ok(Json(category.into()))
}

/// PUT /api/v1/categories/:id - Update category
async fn update_category_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<UpdateCategoryInput>,
) -> Result<Json<CategoryResponse>, ApiError> {
    let category = state
        .category_service
        .update_category(id, input)
        .await
        .map_err(map_err)?;
    Ok(Json(category.into()))
}

/// DELETE /api/v1/categories/:id - Delete category
async fn delete_category_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state
        .category_service
        .delete_category(id)
        .await
        .map_err(map_err)?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use crate::api::test_util::test_server;
    use serde_json::{json, Value};

    #[tokio::test]
    async fn test_category_crud_roundtrip() {
        let server = test_server().await;

        let response = server
            .post("/api/v1/categories")
            .json(&json!({ "name": "Rust", "description": "Systems programming" }))
            .await;
        response.assert_status(axum::http::StatusCode::CREATED);
        let created: Value = response.json();
        let id = created["id"].as_i64().unwrap();

        let response = server
            .put(&format!("/api/v1/categories/{}", id))
            .json(&json!({ "name": "Rustlang" }))
            .await;
        response.assert_status_ok();
        let updated: Value = response.json();
        assert_eq!(updated["name"], "Rustlang");
        assert_eq!(updated["description"], "Systems programming");

        let response = server.delete(&format!("/api/v1/categories/{}", id)).await;
        response.assert_status(axum::http::StatusCode::NO_CONTENT);

        let response = server.get(&format!("/api/v1/categories/{}", id)).await;
        response.assert_status_not_found();
    }

    #[tokio::test]
    async fn test_create_category_rejects_blank_name() {
        let server = test_server().await;

        let response = server
            .post("/api/v1/categories")
            .json(&json!({ "name": "   " }))
            .await;
        response.assert_status_bad_request();
        let error: Value = response.json();
        assert_eq!(error["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_category_without_description_omits_field() {
        let server = test_server().await;

        let response = server
            .post("/api/v1/categories")
            .json(&json!({ "name": "Bare" }))
            .await;
        response.assert_status(axum::http::StatusCode::CREATED);
        let created: Value = response.json();
        assert!(created.get("description").is_none());
    }
}
