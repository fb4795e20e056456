//! User API endpoints
//!
//! Handles HTTP requests for author management:
//! - GET /api/v1/users - List users with pagination
//! - POST /api/v1/users - Create new user
//! - GET /api/v1/users/:id - Get user by ID
//! - PUT /api/v1/users/:id - Update user
//! - DELETE /api/v1/users/:id - Delete user (articles cascade)

use axum::{
    extract::{OriginalUri, Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};

use crate::api::common::{page_links, PageQuery};
use crate::api::middleware::{ApiError, AppState};
use crate::api::responses::{PaginatedResponse, UserResponse};
use crate::models::{CreateUserInput, ListParams, UpdateUserInput};
use crate::services::UserServiceError;

/// Build the users router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users_handler).post(create_user_handler))
        .route(
            "/{id}",
            get(get_user_handler)
                .put(update_user_handler)
                .delete(delete_user_handler),
        )
}

fn map_err(e: UserServiceError) -> ApiError {
    match e {
        UserServiceError::NotFound(_) => ApiError::not_found(e.to_string()),
        UserServiceError::DuplicateUsername(_) | UserServiceError::DuplicateEmail(_) => {
            ApiError::conflict(e.to_string())
        }
        UserServiceError::ValidationError(_) => ApiError::validation_error(e.to_string()),
        UserServiceError::InternalError(_) => ApiError::internal_error(e.to_string()),
    }
}

/// GET /api/v1/users - List users with pagination
async fn list_users_handler(
    State(state): State<AppState>,
    Query(page): Query<PageQuery>,
    OriginalUri(uri): OriginalUri,
) -> Result<Json<PaginatedResponse<UserResponse>>, ApiError> {
    let (limit, offset) = state.pagination.resolve(page.limit, page.offset);
    let result = state
        .user_service
        .list_users(&ListParams::new(limit, offset))
        .await
        .map_err(map_err)?;

    let links = page_links(uri.path(), limit, offset, result.total);
    let results = result.items.into_iter().map(Into::into).collect();
    Ok(Json(PaginatedResponse::new(result.total, links, results)))
}

/// POST /api/v1/users - Create new user
async fn create_user_handler(
    State(state): State<AppState>,
    Json(input): Json<CreateUserInput>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let user = state
        .user_service
        .create_user(input)
        .await
        .map_err(map_err)?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

/// GET /api/v1/users/:id - Get user by ID
async fn get_user_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state.user_service.get_user(id).await.map_err(map_err)?;
    Ok(Json(user.into()))
}

/// PUT /api/v1/users/:id - Update user
async fn update_user_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<UpdateUserInput>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state
        .user_service
        .update_user(id, input)
        .await
        .map_err(map_err)?;
    Ok(Json(user.into()))
}

/// DELETE /api/v1/users/:id - Delete user
async fn delete_user_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.user_service.delete_user(id).await.map_err(map_err)?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use crate::api::test_util::test_server;
    use serde_json::{json, Value};

    #[tokio::test]
    async fn test_user_crud_roundtrip() {
        let server = test_server().await;

        let response = server
            .post("/api/v1/users")
            .json(&json!({
                "username": "jdoe",
                "first_name": "Jane",
                "last_name": "Doe",
                "email": "jane@example.com",
            }))
            .await;
        response.assert_status(axum::http::StatusCode::CREATED);
        let created: Value = response.json();
        let id = created["id"].as_i64().unwrap();
        assert_eq!(created["username"], "jdoe");

        let response = server.get(&format!("/api/v1/users/{}", id)).await;
        response.assert_status_ok();
        let fetched: Value = response.json();
        assert_eq!(fetched["email"], "jane@example.com");

        let response = server
            .put(&format!("/api/v1/users/{}", id))
            .json(&json!({ "first_name": "Janet" }))
            .await;
        response.assert_status_ok();
        let updated: Value = response.json();
        assert_eq!(updated["first_name"], "Janet");

        let response = server.delete(&format!("/api/v1/users/{}", id)).await;
        response.assert_status(axum::http::StatusCode::NO_CONTENT);

        let response = server.get(&format!("/api/v1/users/{}", id)).await;
        response.assert_status_not_found();
    }

    #[tokio::test]
    async fn test_duplicate_username_conflicts() {
        let server = test_server().await;
        let body = json!({ "username": "dup", "email": "dup@example.com" });

        server.post("/api/v1/users").json(&body).await.assert_status(
            axum::http::StatusCode::CREATED,
        );

        let response = server
            .post("/api/v1/users")
            .json(&json!({ "username": "dup", "email": "other@example.com" }))
            .await;
        response.assert_status(axum::http::StatusCode::CONFLICT);
        let error: Value = response.json();
        assert_eq!(error["error"]["code"], "CONFLICT");
    }

    #[tokio::test]
    async fn test_list_users_paginated_envelope() {
        let server = test_server().await;
        for name in ["a", "b", "c"] {
            server
                .post("/api/v1/users")
                .json(&json!({
                    "username": name,
                    "email": format!("{}@example.com", name),
                }))
                .await
                .assert_status(axum::http::StatusCode::CREATED);
        }

        let response = server.get("/api/v1/users?limit=2&offset=0").await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["count"], 3);
        assert_eq!(body["results"].as_array().unwrap().len(), 2);
        assert_eq!(body["next"], "/api/v1/users?limit=2&offset=2");
        assert_eq!(body["previous"], Value::Null);
    }
}
